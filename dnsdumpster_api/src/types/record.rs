use serde::{Deserialize, Serialize};

/// Value of [`DnsRow::open_service`] when the report has no services column.
pub const NOT_AVAILABLE: &str = "N/A";

/// One host line from an A, MX or NS table of the report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRow {
    pub host: String,
    /// Dotted-quad IPv4 address.
    pub ip: String,
    pub reverse_dns: String,
    /// Autonomous system number, e.g. `AS15169`.
    #[serde(rename = "as")]
    pub asn: String,
    pub asn_range: String,
    pub asn_name: String,
    pub asn_country: String,
    /// Newline-separated service banners, `""` when the column is empty,
    /// or [`NOT_AVAILABLE`] when the column is missing altogether.
    pub open_service: String,
}

impl DnsRow {
    /// Whether the services column was present in the source row.
    pub fn has_service_column(&self) -> bool {
        self.open_service != NOT_AVAILABLE
    }
}

/// Record tables of a report, keyed by record type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecords {
    pub a: Vec<DnsRow>,
    pub mx: Vec<DnsRow>,
    pub ns: Vec<DnsRow>,
    pub txt: Vec<String>,
}

impl DnsRecords {
    /// Total number of entries across all four record types.
    pub fn len(&self) -> usize {
        self.a.len() + self.mx.len() + self.ns.len() + self.txt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
