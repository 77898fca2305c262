//! Record parser for the HTML report returned by the `/htmld/` endpoint.
//!
//! The report has no stable ids, so tables are located by position:
//!
//! | index | content                  |
//! |-------|--------------------------|
//! | 0     | summary (not consumed)   |
//! | 1     | A records                |
//! | 2     | MX records               |
//! | 3     | NS records               |
//! | 4     | TXT records              |
//!
//! A page with fewer than five tables is treated as a layout change and
//! rejected as a whole.

use regex::Regex;
use scraper::{ElementRef, Html};

use dnsdumpster_api::types::DnsRecords;

use crate::extract::{extract_rows, extract_txt, selector, RowSelectors};

/// Number of tables a report must contain to be parsed.
pub const MIN_TABLES: usize = 5;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    /// The report does not have the expected table layout.
    #[error("expected at least 5 tables in report, found {found}")]
    MissingTables { found: usize },
    #[error("invalid selector: {0}")]
    Selector(String),
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// The report's tables in document order, with one accessor per record type.
struct ReportTables<'a> {
    tables: Vec<ElementRef<'a>>,
}

impl<'a> ReportTables<'a> {
    fn locate(document: &'a Html) -> Result<Self, ParseError> {
        let tables: Vec<ElementRef<'a>> = document.select(&selector("table")?).collect();
        if tables.len() < MIN_TABLES {
            return Err(ParseError::MissingTables {
                found: tables.len(),
            });
        }
        Ok(Self { tables })
    }

    /// Table 1.
    fn a_table(&self) -> ElementRef<'a> {
        self.tables[1]
    }

    /// Table 2.
    fn mx_table(&self) -> ElementRef<'a> {
        self.tables[2]
    }

    /// Table 3.
    fn ns_table(&self) -> ElementRef<'a> {
        self.tables[3]
    }

    /// Table 4.
    fn txt_table(&self) -> ElementRef<'a> {
        self.tables[4]
    }
}

/// Parses the A, MX, NS and TXT tables out of a report.
pub fn parse_records(html: &str) -> Result<DnsRecords, ParseError> {
    let document = Html::parse_document(html);
    let tables = ReportTables::locate(&document)?;
    let sel = RowSelectors::new()?;

    let records = DnsRecords {
        a: extract_rows(tables.a_table(), &sel),
        mx: extract_rows(tables.mx_table(), &sel),
        ns: extract_rows(tables.ns_table(), &sel),
        txt: extract_txt(tables.txt_table(), &sel),
    };
    tracing::debug!(
        "Parsed {} A, {} MX, {} NS and {} TXT records",
        records.a.len(),
        records.mx.len(),
        records.ns.len(),
        records.txt.len()
    );
    Ok(records)
}

/// Side-channel downloads linked from a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    /// PNG graph of the domain's hosts, under `/static/maps/`.
    NetworkMap,
    /// XLSX export of the host list, under `/static/xlsx/`.
    HostsSpreadsheet,
}

impl AssetKind {
    fn directory(self) -> &'static str {
        match self {
            AssetKind::NetworkMap => "maps",
            AssetKind::HostsSpreadsheet => "xlsx",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            AssetKind::NetworkMap => "png",
            AssetKind::HostsSpreadsheet => "xlsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssetKind::NetworkMap => "network map",
            AssetKind::HostsSpreadsheet => "hosts spreadsheet",
        }
    }
}

/// Finds the first `<api_url>/static/<dir>/<domain>-<hex>.<ext>` link in the raw HTML.
pub fn find_asset_url(
    html: &str,
    api_url: &str,
    domain: &str,
    kind: AssetKind,
) -> Result<Option<String>, ParseError> {
    let pattern = format!(
        r"{}/static/{}/{}-[a-f0-9-]+\.{}",
        regex::escape(api_url.trim_end_matches('/')),
        kind.directory(),
        regex::escape(domain),
        kind.extension()
    );
    let re = Regex::new(&pattern)?;
    Ok(re.find(html).map(|m| m.as_str().to_string()))
}
