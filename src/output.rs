use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::DanceEvent;

const CSV_HEADER: [&str; 7] = [
    "Start", "End", "Name", "Description", "Price (cents)", "School", "Website",
];

/// Writes the event list as CSV. Descriptions regularly contain commas,
/// quotes and literal newlines, so fields are quoted RFC-4180 style.
pub fn write_csv(writer: &mut impl Write, events: &[DanceEvent]) -> io::Result<()> {
    write_row(writer, CSV_HEADER.iter().map(|cell| cell.to_string()))?;
    for event in events {
        write_row(
            writer,
            [
                event.starts_at.to_string(),
                event
                    .ends_at
                    .map(|ends_at| ends_at.to_string())
                    .unwrap_or_default(),
                event.name.clone(),
                event.description.clone(),
                event
                    .price_euro_cent
                    .map(|price| price.to_string())
                    .unwrap_or_default(),
                event.dancing_school.clone(),
                event.website.clone(),
            ]
            .into_iter(),
        )?;
    }
    Ok(())
}

pub fn write_csv_file(path: &Path, events: &[DanceEvent]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("unable to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_csv(&mut writer, events)
        .with_context(|| format!("unable to write {}", path.display()))
}

pub fn write_json_file(path: &Path, events: &[DanceEvent]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("unable to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), events)
        .with_context(|| format!("unable to write {}", path.display()))
}

fn write_row(writer: &mut impl Write, row: impl Iterator<Item = String>) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(writer, ",")?;
        }
        first = false;
        if needs_quotes(&cell) {
            write!(writer, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(writer, "{cell}")?;
        }
    }
    writeln!(writer)
}

fn needs_quotes(cell: &str) -> bool {
    cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r')
}
