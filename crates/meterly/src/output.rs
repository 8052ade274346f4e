//! Output formatting: JSON, table, YAML, plain.
//!
//! The default is the compact `{"meters":[...]}` document, one line on
//! stdout. Everything else is for humans and scripts.

use std::io::{self, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use meterly_core::{MeterListing, MeterRecord};

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Table row ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct MeterRow {
    #[tabled(rename = "Meter ID")]
    id: String,
    #[tabled(rename = "Type")]
    meter_type: String,
    #[tabled(rename = "Address")]
    address: String,
}

impl From<&MeterRecord> for MeterRow {
    fn from(m: &MeterRecord) -> Self {
        Self {
            id: m.meter_id.clone(),
            meter_type: m.meter_type.to_string(),
            address: m.meter_address.clone(),
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a meter listing in the chosen format.
pub fn render_listing(format: OutputFormat, listing: &MeterListing) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<MeterRow> = listing.meters.iter().map(MeterRow::from).collect();
            Ok(Table::new(rows).with(Style::rounded()).to_string())
        }
        OutputFormat::Plain => Ok(listing
            .meters
            .iter()
            .map(|m| m.meter_id.as_str())
            .collect::<Vec<_>>()
            .join("\n")),
        structured => render_document(structured, listing),
    }
}

/// Render an arbitrary serde document. `table` and `plain` fall back to
/// pretty JSON since there is no row shape to project onto.
pub fn render_document<T: Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string(data).map_err(|e| CliError::Render(e.to_string()))
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
        }
        OutputFormat::JsonPretty | OutputFormat::Table | OutputFormat::Plain => {
            serde_json::to_string_pretty(data).map_err(|e| CliError::Render(e.to_string()))
        }
    }
}

/// Write the rendered output to stdout followed by a newline.
pub fn print_output(output: &str) -> Result<(), CliError> {
    if output.is_empty() {
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    stdout.flush()?;
    Ok(())
}
