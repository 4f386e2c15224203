use anyhow::bail;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use cuecard_kernel::replay::replay;
use cuecard_kernel::verify::{store_digest, to_hex};
use cuecard_kernel::ClockSample;

use super::load_catalog;

/// Parses `0,5,1,null` into clock samples. `null` (or an empty item) is an
/// unstarted reading.
pub fn parse_samples(raw: &str) -> anyhow::Result<Vec<ClockSample>> {
    raw.split(',')
        .map(str::trim)
        .map(|item| match item {
            "" | "null" => Ok(ClockSample::Unstarted),
            secs => match secs.parse::<f64>() {
                Ok(v) => Ok(ClockSample::from_reading(Some(v))),
                Err(_) => bail!("bad sample {:?}, expected seconds or null", secs),
            },
        })
        .collect()
}

/// Replays the samples and returns the hex digest of the reveal log.
pub fn run(catalog_path: &str, samples: &str) -> anyhow::Result<String> {
    let (catalog, _) = load_catalog(catalog_path)?;
    let samples = parse_samples(samples)?;

    println!("Replaying {} samples against {} slots...", samples.len(), catalog.len());
    let report = replay(catalog, &samples);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Sample", "Clock", "Cursor", "Revealed", "Skipped"]);

    for (i, (sample, batch)) in samples.iter().zip(&report.batches).enumerate() {
        let clock = sample.seconds().map_or("null".to_string(), |s| format!("{}", s));
        table.add_row(vec![
            i.to_string(),
            clock,
            format!("{}..{}", batch.cursor.start, batch.cursor.end),
            batch.revealed().to_string(),
            batch.skipped().to_string(),
        ]);
    }
    println!("{table}");

    let digest = store_digest(report.store.read()).map_err(|e| anyhow::anyhow!("{}", e))?;
    let hex = to_hex(&digest);
    println!("\nExposed: {} entities, cursor at {}", report.store.len(), report.cursor);
    println!("Store digest: {}\n", hex);

    Ok(hex)
}
