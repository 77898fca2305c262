use serde::{Deserialize, Serialize};

use super::DnsRecords;

/// Parsed outcome of a single domain search.
///
/// Built fresh per search and never mutated afterwards. The asset fields hold
/// base64 (standard alphabet, padded) and are independently optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    /// The domain the caller asked for, not anything read back from the page.
    pub domain: String,
    pub dns_records: DnsRecords,
    /// Network-map PNG.
    pub image_data: Option<String>,
    /// Hosts spreadsheet (XLSX).
    pub xls_data: Option<String>,
}
