//! Per-row field extraction for the A, MX and NS report tables.
//!
//! Each table row is a `<tr>` whose `<td>` cells are read by position:
//!
//! | position | content                                              | required |
//! |----------|------------------------------------------------------|----------|
//! | 0        | hostname, then `<br>` and an annotation              | yes      |
//! | 1        | IPv4 address, reverse DNS in a `<span>`              | yes      |
//! | 2        | ASN and range on separate lines                      | no       |
//! | 3        | `span.sm-text` owner name and country                | no       |
//! | 4        | open services, one per line                          | no       |
//!
//! Required fields fail the row with a [`RowError`]; optional fields fall back
//! to `""` (or [`NOT_AVAILABLE`] for the services column). [`extract_rows`]
//! drops failed rows and keeps the rest, so one odd row never voids a table.

use regex::Regex;
use scraper::{ElementRef, Selector};

use dnsdumpster_api::types::{DnsRow, NOT_AVAILABLE};

use crate::parse::ParseError;

const IPV4_PATTERN: &str = r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}";

/// Why a single row could not be turned into a [`DnsRow`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("row has no cell at position {index}")]
    MissingCell { index: usize },
    #[error("no IPv4 address in address cell")]
    MissingIp,
    #[error("ASN cell has a line break but no range line")]
    MalformedAsn,
}

/// Compiled selectors and patterns shared by every row of a report.
pub struct RowSelectors {
    row: Selector,
    cell: Selector,
    span: Selector,
    sm_text: Selector,
    ipv4: Regex,
}

impl RowSelectors {
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            row: selector("tr")?,
            cell: selector("td")?,
            span: selector("span")?,
            sm_text: selector("span.sm-text")?,
            ipv4: Regex::new(IPV4_PATTERN)?,
        })
    }
}

pub(crate) fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector(format!("{}: {:?}", css, e)))
}

/// Extracts every well-formed host row of `table`, in document order.
///
/// Rows that fail extraction (header rows, rows without an address) are
/// skipped and logged at debug level.
pub fn extract_rows(table: ElementRef<'_>, sel: &RowSelectors) -> Vec<DnsRow> {
    table
        .select(&sel.row)
        .enumerate()
        .filter_map(|(idx, row)| match extract_row(row, sel) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping table row {}: {}", idx, e);
                None
            }
        })
        .collect()
}

/// Extracts one host row.
pub fn extract_row(row: ElementRef<'_>, sel: &RowSelectors) -> Result<DnsRow, RowError> {
    let cells: Vec<ElementRef<'_>> = row.select(&sel.cell).collect();

    let host = host_text(host_cell(&cells)?);
    let address = address_cell(&cells)?;
    let ip = ipv4(address, &sel.ipv4)?;
    let reverse_dns = reverse_dns(address, &sel.span);
    let (asn, asn_range) = asn_lines(asn_cell(&cells))?;
    let (asn_name, asn_country) = owner_spans(owner_cell(&cells), &sel.sm_text);
    let open_service = services(services_cell(&cells));

    Ok(DnsRow {
        host,
        ip,
        reverse_dns,
        asn,
        asn_range,
        asn_name,
        asn_country,
        open_service,
    })
}

/// Every `<td>` of the TXT table as one trimmed entry, in document order.
pub fn extract_txt(table: ElementRef<'_>, sel: &RowSelectors) -> Vec<String> {
    table
        .select(&sel.cell)
        .map(|td| element_text(td).trim().to_string())
        .collect()
}

// -- Cell accessors --

/// Position 0: hostname.
fn host_cell<'a>(cells: &[ElementRef<'a>]) -> Result<ElementRef<'a>, RowError> {
    cells
        .first()
        .copied()
        .ok_or(RowError::MissingCell { index: 0 })
}

/// Position 1: address and reverse DNS.
fn address_cell<'a>(cells: &[ElementRef<'a>]) -> Result<ElementRef<'a>, RowError> {
    cells
        .get(1)
        .copied()
        .ok_or(RowError::MissingCell { index: 1 })
}

/// Position 2: ASN and announced range.
fn asn_cell<'a>(cells: &[ElementRef<'a>]) -> Option<ElementRef<'a>> {
    cells.get(2).copied()
}

/// Position 3: owner name and country.
fn owner_cell<'a>(cells: &[ElementRef<'a>]) -> Option<ElementRef<'a>> {
    cells.get(3).copied()
}

/// Position 4: open services.
fn services_cell<'a>(cells: &[ElementRef<'a>]) -> Option<ElementRef<'a>> {
    cells.get(4).copied()
}

// -- Field readers --

/// Text before the first child element, i.e. the hostname without the
/// annotation that follows the `<br>`.
fn host_text(cell: ElementRef<'_>) -> String {
    let leading: String = cell
        .children()
        .map_while(|node| node.value().as_text().map(|t| &**t))
        .collect();
    leading.trim().to_string()
}

fn ipv4(cell: ElementRef<'_>, re: &Regex) -> Result<String, RowError> {
    let text = element_text(cell);
    re.find(&text)
        .map(|m| m.as_str().to_string())
        .ok_or(RowError::MissingIp)
}

fn reverse_dns(cell: ElementRef<'_>, span: &Selector) -> String {
    cell.select(span)
        .next()
        .map(|s| element_text(s).trim().to_string())
        .unwrap_or_default()
}

/// Second and third line of the ASN cell. The first line is the whitespace
/// before the ASN, so a cell without any line break yields nothing. A cell
/// that breaks once but has no third line fails the row.
fn asn_lines(cell: Option<ElementRef<'_>>) -> Result<(String, String), RowError> {
    let Some(cell) = cell else {
        return Ok((String::new(), String::new()));
    };
    let text = element_text(cell);
    if !text.contains('\n') {
        return Ok((String::new(), String::new()));
    }
    let mut lines = text.split('\n').skip(1).map(|l| l.trim().to_string());
    match (lines.next(), lines.next()) {
        (Some(asn), Some(range)) => Ok((asn, range)),
        _ => Err(RowError::MalformedAsn),
    }
}

fn owner_spans(cell: Option<ElementRef<'_>>, sm_text: &Selector) -> (String, String) {
    let Some(cell) = cell else {
        return (String::new(), String::new());
    };
    let mut spans = cell
        .select(sm_text)
        .map(|s| element_text(s).trim().to_string());
    let name = spans.next().unwrap_or_default();
    let country = spans.next().unwrap_or_default();
    (name, country)
}

fn services(cell: Option<ElementRef<'_>>) -> String {
    match cell {
        Some(cell) => element_text(cell)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn table(rows: &str) -> Html {
        Html::parse_document(&format!("<table><tbody>{}</tbody></table>", rows))
    }

    fn first_row(doc: &Html) -> ElementRef<'_> {
        doc.select(&selector("tr").unwrap()).next().unwrap()
    }

    fn first_table(doc: &Html) -> ElementRef<'_> {
        doc.select(&selector("table").unwrap()).next().unwrap()
    }

    const FULL_ROW: &str = r#"<tr>
<td class="col-md-4">mail.example.com<br><a class="external nounderline" href="https://mail.example.com">HTTP</a></td>
<td class="col-md-3">192.0.2.25<br><span style="font-size: 0.9em; color: #eee;">mx1.provider.net</span></td>
<td class="col-md-3">
AS64500
192.0.2.0/24
</td>
<td><span class="sm-text">EXAMPLE-NET</span><br><span class="sm-text">Netherlands</span></td>
<td>
  smtp: Postfix

  imap: Dovecot
</td>
</tr>"#;

    #[test]
    fn full_row_extracts_every_field() {
        let sel = RowSelectors::new().unwrap();
        let doc = table(FULL_ROW);
        let row = extract_row(first_row(&doc), &sel).unwrap();

        assert_eq!(row.host, "mail.example.com");
        assert_eq!(row.ip, "192.0.2.25");
        assert_eq!(row.reverse_dns, "mx1.provider.net");
        assert_eq!(row.asn, "AS64500");
        assert_eq!(row.asn_range, "192.0.2.0/24");
        assert_eq!(row.asn_name, "EXAMPLE-NET");
        assert_eq!(row.asn_country, "Netherlands");
        assert_eq!(row.open_service, "smtp: Postfix\nimap: Dovecot");
    }

    #[test]
    fn two_cell_row_uses_fallbacks() {
        let sel = RowSelectors::new().unwrap();
        let doc = table(
            "<tr><td>ns1.example.com</td><td>192.0.2.1 AS1234\nRANGE 192.0.2.0/24</td></tr>",
        );
        let row = extract_row(first_row(&doc), &sel).unwrap();

        assert_eq!(
            row,
            DnsRow {
                host: "ns1.example.com".into(),
                ip: "192.0.2.1".into(),
                reverse_dns: String::new(),
                asn: String::new(),
                asn_range: String::new(),
                asn_name: String::new(),
                asn_country: String::new(),
                open_service: "N/A".into(),
            }
        );
    }

    #[test]
    fn missing_ip_fails_row() {
        let sel = RowSelectors::new().unwrap();
        let doc = table("<tr><td>host.example.com</td><td>no address here</td></tr>");
        let err = extract_row(first_row(&doc), &sel).unwrap_err();
        assert_eq!(err, RowError::MissingIp);
    }

    #[test]
    fn header_row_fails_with_missing_cell() {
        let sel = RowSelectors::new().unwrap();
        let doc = table("<tr><th>Host</th><th>IP</th></tr>");
        let err = extract_row(first_row(&doc), &sel).unwrap_err();
        assert_eq!(err, RowError::MissingCell { index: 0 });
    }

    #[test]
    fn single_cell_row_fails_on_address() {
        let sel = RowSelectors::new().unwrap();
        let doc = table("<tr><td>lonely.example.com</td></tr>");
        let err = extract_row(first_row(&doc), &sel).unwrap_err();
        assert_eq!(err, RowError::MissingCell { index: 1 });
    }

    #[test]
    fn host_ignores_annotation_after_break() {
        let sel = RowSelectors::new().unwrap();
        let doc = table(
            "<tr><td>www.example.com<br>cloudflare</td><td>198.51.100.7</td></tr>",
        );
        let row = extract_row(first_row(&doc), &sel).unwrap();
        assert_eq!(row.host, "www.example.com");
    }

    #[test]
    fn host_is_empty_when_cell_starts_with_element() {
        let sel = RowSelectors::new().unwrap();
        let doc = table("<tr><td><b>bold.example.com</b></td><td>198.51.100.7</td></tr>");
        let row = extract_row(first_row(&doc), &sel).unwrap();
        assert_eq!(row.host, "");
        assert_eq!(row.ip, "198.51.100.7");
    }

    #[test]
    fn first_ip_wins() {
        let sel = RowSelectors::new().unwrap();
        let doc = table("<tr><td>h</td><td>10.0.0.1 and 10.0.0.2</td></tr>");
        let row = extract_row(first_row(&doc), &sel).unwrap();
        assert_eq!(row.ip, "10.0.0.1");
    }

    #[test]
    fn asn_cell_without_line_break_is_empty() {
        let sel = RowSelectors::new().unwrap();
        let doc = table("<tr><td>h</td><td>10.0.0.1</td><td>AS64500 10.0.0.0/8</td></tr>");
        let row = extract_row(first_row(&doc), &sel).unwrap();
        assert_eq!(row.asn, "");
        assert_eq!(row.asn_range, "");
        assert_eq!(row.open_service, "N/A");
    }

    #[test]
    fn asn_cell_with_single_break_fails_row() {
        let sel = RowSelectors::new().unwrap();
        let doc = table("<tr><td>h</td><td>10.0.0.1</td><td>\nAS64500</td></tr>");
        let err = extract_row(first_row(&doc), &sel).unwrap_err();
        assert_eq!(err, RowError::MalformedAsn);
    }

    #[test]
    fn extract_rows_drops_row_with_truncated_asn() {
        let sel = RowSelectors::new().unwrap();
        let doc = table(
            "<tr><td>h</td><td>10.0.0.1</td><td>\nAS64500</td></tr>\
             <tr><td>ok.example.com</td><td>10.0.0.2</td><td>\nAS64501\n10.0.0.0/8\n</td></tr>",
        );
        let rows = extract_rows(first_table(&doc), &sel);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].host, "ok.example.com");
        assert_eq!(rows[0].asn, "AS64501");
        assert_eq!(rows[0].asn_range, "10.0.0.0/8");
    }

    #[test]
    fn host_reverse_dns_and_asn_are_trimmed() {
        let sel = RowSelectors::new().unwrap();
        let doc = table(
            "<tr><td>  spaced.example.com  <br>x</td>\
             <td>10.0.0.3<br><span>  rev.example.net </span></td>\
             <td>\n  AS64502  \n  10.0.0.0/8  </td></tr>",
        );
        let row = extract_row(first_row(&doc), &sel).unwrap();
        assert_eq!(row.host, "spaced.example.com");
        assert_eq!(row.reverse_dns, "rev.example.net");
        assert_eq!(row.asn, "AS64502");
        assert_eq!(row.asn_range, "10.0.0.0/8");
    }

    #[test]
    fn owner_cell_with_one_span() {
        let sel = RowSelectors::new().unwrap();
        let doc = table(
            r#"<tr><td>h</td><td>10.0.0.1</td><td></td><td><span class="sm-text"> ACME </span><span>ignored</span></td></tr>"#,
        );
        let row = extract_row(first_row(&doc), &sel).unwrap();
        assert_eq!(row.asn_name, "ACME");
        assert_eq!(row.asn_country, "");
        assert_eq!(row.open_service, "N/A");
    }

    #[test]
    fn empty_services_cell_is_not_na() {
        let sel = RowSelectors::new().unwrap();
        let doc = table("<tr><td>h</td><td>10.0.0.1</td><td></td><td></td><td>  \n </td></tr>");
        let row = extract_row(first_row(&doc), &sel).unwrap();
        assert_eq!(row.open_service, "");
        assert!(row.has_service_column());
    }

    #[test]
    fn extract_rows_isolates_bad_rows() {
        let sel = RowSelectors::new().unwrap();
        let doc = table(
            "<tr><th>Host</th><th>IP</th></tr>\
             <tr><td>a.example.com</td><td>192.0.2.1</td></tr>\
             <tr><td>broken.example.com</td><td>pending</td></tr>\
             <tr><td>b.example.com</td><td>192.0.2.2</td></tr>",
        );
        let rows = extract_rows(first_table(&doc), &sel);
        let hosts: Vec<&str> = rows.iter().map(|r| r.host.as_str()).collect();
        assert_eq!(hosts, vec!["a.example.com", "b.example.com"]);
    }

    #[test]
    fn extract_txt_keeps_every_cell_in_order() {
        let sel = RowSelectors::new().unwrap();
        let doc = table(
            "<tr><td> \"v=spf1 include:_spf.example.com ~all\" </td></tr>\
             <tr><td>\"google-site-verification=abc\"</td><td></td></tr>",
        );
        let txt = extract_txt(first_table(&doc), &sel);
        assert_eq!(
            txt,
            vec![
                "\"v=spf1 include:_spf.example.com ~all\"".to_string(),
                "\"google-site-verification=abc\"".to_string(),
                String::new(),
            ]
        );
    }
}
