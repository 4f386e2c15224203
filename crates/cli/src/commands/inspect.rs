use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use cuecard_kernel::verify::{catalog_digest, to_hex};

use super::{format_offset, load_catalog};

pub fn run(catalog_path: &str) -> anyhow::Result<()> {
    let (catalog, report) = load_catalog(catalog_path)?;

    println!("\nCatalog Report");
    println!("--------------");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Check", "Status", "Details"]);

    table.add_row(vec![
        "Slots".to_string(),
        catalog.len().to_string(),
        format!("{} revealable", catalog.present_count()),
    ]);

    let skip_status = if report.skipped() == 0 { "OK" } else { "HOLES" };
    table.add_row(vec![
        "Skipped".to_string(),
        skip_status.to_string(),
        format!("{} null, {} malformed", report.nulls, report.malformed),
    ]);

    match catalog.first_out_of_order() {
        None => table.add_row(vec!["Ordering", "OK", "non-decreasing"]),
        Some(index) => table.add_row(vec![
            "Ordering".to_string(),
            "UNSORTED".to_string(),
            format!("slot {} is earlier than its predecessor; reveals will stall there", index),
        ]),
    };

    match catalog.span() {
        Some((first, last)) => table.add_row(vec![
            "Span".to_string(),
            "OK".to_string(),
            format!("{} .. {}", format_offset(first.as_secs()), format_offset(last.as_secs())),
        ]),
        None => table.add_row(vec!["Span", "EMPTY", ""]),
    };

    let digest = catalog_digest(&catalog).map_err(|e| anyhow::anyhow!("{}", e))?;
    table.add_row(vec!["Digest".to_string(), "BLAKE3".to_string(), to_hex(&digest)]);

    println!("{table}\n");

    Ok(())
}
