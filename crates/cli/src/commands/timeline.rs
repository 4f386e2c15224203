use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use cuecard_kernel::Timestamped;

use super::{format_offset, load_catalog};

pub fn run(catalog_path: &str) -> anyhow::Result<()> {
    let (catalog, _) = load_catalog(catalog_path)?;

    // Displayed in catalog order, which is reveal order. Not re-sorted.
    if !catalog.is_time_ordered() {
        println!("\n⚠️  WARNING: Catalog is not sorted by time. Entries after the first regression reveal late.\n");
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "At", "Label"]);

    for (index, slot) in catalog.slots().iter().enumerate() {
        match slot {
            Some(entity) => table.add_row(vec![
                index.to_string(),
                format_offset(entity.timestamp().as_secs()),
                entity.label().unwrap_or("-").to_string(),
            ]),
            None => table.add_row(vec![index.to_string(), "--:--.---".to_string(), "(skipped)".to_string()]),
        };
    }

    println!("\nReveal Timeline\n");
    println!("{table}\n");

    Ok(())
}
