use anyhow::Result;
use dnsdumpster_lib::types::{DnsRow, QueryResult};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::xml_output;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
    Xml,
}

impl OutputFormat {
    pub fn from_arg(raw: &str) -> Self {
        match raw {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            "xml" => OutputFormat::Xml,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct HostRow {
    #[tabled(rename = "Host")]
    #[serde(rename = "Host")]
    host: String,
    #[tabled(rename = "IP")]
    #[serde(rename = "IP")]
    ip: String,
    #[tabled(rename = "Reverse DNS")]
    #[serde(rename = "Reverse DNS")]
    reverse_dns: String,
    #[tabled(rename = "AS")]
    #[serde(rename = "AS")]
    asn: String,
    #[tabled(rename = "Range")]
    #[serde(rename = "Range")]
    asn_range: String,
    #[tabled(rename = "ASN Name")]
    #[serde(rename = "ASN Name")]
    asn_name: String,
    #[tabled(rename = "Country")]
    #[serde(rename = "Country")]
    asn_country: String,
    #[tabled(rename = "Services")]
    #[serde(rename = "Services")]
    open_service: String,
}

#[derive(Tabled, Serialize)]
struct TxtRow {
    #[tabled(rename = "TXT")]
    #[serde(rename = "TXT")]
    value: String,
}

/// Flat row for CSV, where every record type shares one header.
#[derive(Serialize)]
struct CsvRow {
    #[serde(rename = "Type")]
    record_type: &'static str,
    #[serde(rename = "Host")]
    host: String,
    #[serde(rename = "IP")]
    ip: String,
    #[serde(rename = "Reverse DNS")]
    reverse_dns: String,
    #[serde(rename = "AS")]
    asn: String,
    #[serde(rename = "Range")]
    asn_range: String,
    #[serde(rename = "ASN Name")]
    asn_name: String,
    #[serde(rename = "Country")]
    asn_country: String,
    #[serde(rename = "Services")]
    open_service: String,
}

// -- Row builders --

fn build_host_rows(rows: &[DnsRow]) -> Vec<HostRow> {
    rows.iter().map(host_row).collect()
}

fn host_row(r: &DnsRow) -> HostRow {
    HostRow {
        host: r.host.clone(),
        ip: r.ip.clone(),
        reverse_dns: r.reverse_dns.clone(),
        asn: r.asn.clone(),
        asn_range: r.asn_range.clone(),
        asn_name: r.asn_name.clone(),
        asn_country: r.asn_country.clone(),
        open_service: format_services(&r.open_service),
    }
}

fn build_txt_rows(txt: &[String]) -> Vec<TxtRow> {
    txt.iter().map(|v| TxtRow { value: v.clone() }).collect()
}

fn build_csv_rows(result: &QueryResult) -> Vec<CsvRow> {
    let records = &result.dns_records;
    let mut rows = Vec::with_capacity(records.len());
    for (record_type, entries) in [("A", &records.a), ("MX", &records.mx), ("NS", &records.ns)] {
        rows.extend(entries.iter().map(|r| CsvRow {
            record_type,
            host: r.host.clone(),
            ip: r.ip.clone(),
            reverse_dns: r.reverse_dns.clone(),
            asn: r.asn.clone(),
            asn_range: r.asn_range.clone(),
            asn_name: r.asn_name.clone(),
            asn_country: r.asn_country.clone(),
            open_service: format_services(&r.open_service),
        }));
    }
    // TXT entries carry their text in the Host column.
    rows.extend(records.txt.iter().map(|v| CsvRow {
        record_type: "TXT",
        host: v.clone(),
        ip: String::new(),
        reverse_dns: String::new(),
        asn: String::new(),
        asn_range: String::new(),
        asn_name: String::new(),
        asn_country: String::new(),
        open_service: String::new(),
    }));
    rows
}

// -- Table / Markdown output --

fn render_sections(result: &QueryResult, style_markdown: bool) -> String {
    let records = &result.dns_records;
    let mut out = String::new();
    for (title, entries) in [("A", &records.a), ("MX", &records.mx), ("NS", &records.ns)] {
        if entries.is_empty() {
            continue;
        }
        let mut table = Table::new(build_host_rows(entries));
        if style_markdown {
            table.with(Style::markdown());
        }
        out.push_str(&section_heading(title, entries.len(), style_markdown));
        out.push_str(&table.to_string());
        out.push_str("\n\n");
    }
    if !records.txt.is_empty() {
        let mut table = Table::new(build_txt_rows(&records.txt));
        if style_markdown {
            table.with(Style::markdown());
        }
        out.push_str(&section_heading("TXT", records.txt.len(), style_markdown));
        out.push_str(&table.to_string());
        out.push('\n');
    }
    out
}

fn section_heading(title: &str, count: usize, markdown: bool) -> String {
    if markdown {
        format!("## {} records ({})\n\n", title, count)
    } else {
        format!("{} records ({})\n", title, count)
    }
}

pub fn print_result_table(result: &QueryResult) {
    print!("{}", render_sections(result, false));
}

pub fn print_result_markdown(result: &QueryResult) {
    print!("{}", render_sections(result, true));
}

// -- CSV output --

pub fn print_result_csv(result: &QueryResult) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_csv_rows(result) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- XML output --

pub fn print_result_xml(result: &QueryResult) -> Result<()> {
    println!("{}", xml_output::result_to_xml(result)?);
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Services on one line for tabular output.
fn format_services(raw: &str) -> String {
    raw.lines().collect::<Vec<_>>().join(", ")
}
