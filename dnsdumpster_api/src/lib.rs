mod client;
mod config;
mod errors;
pub mod types;
pub mod user_agent;
pub use self::client::Client;
pub use self::config::ClientConfig;
pub use self::errors::Error;
