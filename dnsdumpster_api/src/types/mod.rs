mod record;
mod result;
mod token;

pub use record::{DnsRecords, DnsRow, NOT_AVAILABLE};
pub use result::QueryResult;
pub use token::AuthToken;
