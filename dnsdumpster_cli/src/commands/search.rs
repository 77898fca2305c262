use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use dnsdumpster_lib::DnsDumpster;

use crate::artifacts::{save_artifacts, SaveTargets};
use crate::output::{
    print_json, print_result_csv, print_result_markdown, print_result_table, print_result_xml,
    OutputFormat,
};

#[derive(Args)]
pub struct SearchArgs {
    /// Domain to look up (e.g. example.com)
    pub domain: String,

    /// Write the full result as JSON to this file
    #[arg(long)]
    pub save_json: Option<PathBuf>,

    /// Write the decoded network map PNG to this file
    #[arg(long)]
    pub save_image: Option<PathBuf>,

    /// Write the decoded hosts spreadsheet to this file
    #[arg(long)]
    pub save_xlsx: Option<PathBuf>,

    /// Write JSON, map and spreadsheet with default names into this directory
    #[arg(long)]
    pub save_all: Option<PathBuf>,
}

impl SearchArgs {
    fn save_targets(&self) -> SaveTargets {
        let explicit = SaveTargets {
            json: self.save_json.clone(),
            image: self.save_image.clone(),
            xlsx: self.save_xlsx.clone(),
        };
        match &self.save_all {
            Some(dir) => explicit.or(SaveTargets::all_in(dir, &self.domain)),
            None => explicit,
        }
    }
}

pub async fn run(args: &SearchArgs, client: &DnsDumpster, format: &OutputFormat) -> Result<()> {
    let result = match client.search(&args.domain).await {
        Ok(result) => result,
        Err(e) if e.is_structural() => bail!(
            "DNSDumpster returned a report this client does not recognise ({}); the page layout may have changed",
            e
        ),
        Err(e) => bail!("No DNS records found for {}: {}", args.domain, e),
    };

    let records = &result.dns_records;
    eprintln!(
        "{}: {} A, {} MX, {} NS, {} TXT (map: {}, spreadsheet: {})",
        result.domain,
        records.a.len(),
        records.mx.len(),
        records.ns.len(),
        records.txt.len(),
        if result.image_data.is_some() { "yes" } else { "no" },
        if result.xls_data.is_some() { "yes" } else { "no" },
    );

    match format {
        OutputFormat::Table => print_result_table(&result),
        OutputFormat::Json => print_json(&result),
        OutputFormat::Csv => print_result_csv(&result)?,
        OutputFormat::Markdown => print_result_markdown(&result),
        OutputFormat::Xml => print_result_xml(&result)?,
    }

    let targets = args.save_targets();
    if !targets.is_empty() {
        if let Some(dir) = &args.save_all {
            std::fs::create_dir_all(dir)?;
        }
        for path in save_artifacts(&result, &targets)? {
            eprintln!("Saved {}", path.display());
        }
    }

    Ok(())
}
