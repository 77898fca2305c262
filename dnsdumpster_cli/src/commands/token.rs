use anyhow::{bail, Result};
use dnsdumpster_lib::DnsDumpster;

/// Prints the session token the client picked up from the landing page.
pub fn run(client: &DnsDumpster) -> Result<()> {
    match client.token() {
        Some(token) => {
            println!("{}", token);
            Ok(())
        }
        None => bail!("Authorization token not found (re-run with --verbose for details)"),
    }
}
