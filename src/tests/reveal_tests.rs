// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use super::{catalog_of, ids};
use crate::clock::ClockSample;
use crate::cursor::RevealCursor;
use crate::store::ExposedStore;
use crate::replay::replay;

fn at(secs: f64) -> ClockSample {
    ClockSample::At(secs)
}

#[test]
fn test_monotonic_samples_reveal_prefix() {
    let times = [Some(0.5), Some(1.0), Some(1.0), Some(2.5), Some(4.0), Some(9.0)];
    let catalog = catalog_of(&times);

    let coarse = replay(catalog.clone(), &[at(4.5)]);
    let fine = replay(catalog.clone(), &[at(0.0), at(0.6), at(1.0), at(1.1), at(3.0), at(4.0), at(4.5)]);

    // Exactly the entries strictly before 4.5, in catalog order.
    assert_eq!(ids(coarse.store.read()), vec![0, 1, 2, 3, 4]);
    assert_eq!(coarse.store.read(), fine.store.read());
    assert_eq!(coarse.cursor, 5);
    assert_eq!(fine.cursor, 5);
}

#[test]
fn test_order_preserved_across_granularity() {
    let catalog = catalog_of(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    let step = replay(catalog.clone(), &[at(1.5), at(2.5), at(3.5), at(4.5)]);
    assert_eq!(ids(step.store.read()), vec![0, 1, 2, 3]);
    for batch in &step.batches {
        assert_eq!(batch.revealed(), 1);
    }
}

#[test]
fn test_backward_seek_keeps_reveals() {
    let catalog = catalog_of(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    let mut cursor = RevealCursor::new();
    let mut store = ExposedStore::new();

    cursor.advance(&catalog, at(5.0), &mut store);
    assert_eq!(ids(store.read()), vec![0, 1, 2, 3]);

    let batch = cursor.advance(&catalog, at(1.0), &mut store);
    assert!(batch.is_empty());
    assert_eq!(ids(store.read()), vec![0, 1, 2, 3]);
    assert_eq!(cursor.position(), 4);
}

#[test]
fn test_backward_seek_mid_catalog_does_not_rewind() {
    let catalog = catalog_of(&[Some(1.0), Some(2.0), Some(3.0)]);
    let report = replay(catalog, &[at(2.5), at(0.5), at(2.6), at(3.5)]);

    assert_eq!(report.batches[0].revealed(), 2);
    assert_eq!(report.batches[1].revealed(), 0);
    assert_eq!(report.batches[2].revealed(), 0);
    assert_eq!(report.batches[3].revealed(), 1);
    assert_eq!(ids(report.store.read()), vec![0, 1, 2]);
}

#[test]
fn test_burst_reveal_single_batch() {
    let catalog = catalog_of(&[Some(1.0), Some(2.0), Some(3.0)]);
    let report = replay(catalog, &[at(0.0), at(5.0)]);

    assert!(report.batches[0].is_empty());
    assert_eq!(report.batches[1].revealed(), 3);
    assert_eq!(report.batches[1].exposed, 0..3);
    assert_eq!(ids(report.store.read()), vec![0, 1, 2]);
}

#[test]
fn test_boundary_is_strict() {
    let catalog = catalog_of(&[Some(2.0)]);
    let mut cursor = RevealCursor::new();
    let mut store = ExposedStore::new();

    cursor.advance(&catalog, at(2.0), &mut store);
    cursor.advance(&catalog, at(2.0), &mut store);
    assert!(store.is_empty());
    assert_eq!(cursor.position(), 0);

    cursor.advance(&catalog, at(2.0001), &mut store);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_null_slots_skipped() {
    let catalog = catalog_of(&[None, Some(1.0), None, Some(2.0)]);
    let report = replay(catalog, &[at(3.0)]);

    assert_eq!(ids(report.store.read()), vec![1, 3]);
    assert_eq!(report.cursor, 4);
    assert_eq!(report.batches[0].skipped(), 2);
}

#[test]
fn test_leading_null_does_not_hold_cursor() {
    let catalog = catalog_of(&[None, Some(1.0)]);
    let report = replay(catalog, &[at(0.5)]);
    assert!(report.store.is_empty());
    assert_eq!(report.cursor, 1);
}

#[test]
fn test_identical_timestamps_reveal_together() {
    let catalog = catalog_of(&[Some(1.0), Some(3.0), Some(3.0), Some(3.0), Some(6.0)]);
    let report = replay(catalog, &[at(2.0), at(3.0), at(3.5)]);

    assert_eq!(report.batches[1].revealed(), 0);
    assert_eq!(report.batches[2].revealed(), 3);
    assert_eq!(ids(report.store.read()), vec![0, 1, 2, 3]);
}

#[test]
fn test_undefined_samples_are_noops() {
    let catalog = catalog_of(&[None, Some(0.0)]);
    let report = replay(catalog, &[ClockSample::Unstarted, ClockSample::Unstarted]);
    assert_eq!(report.cursor, 0);
    assert!(report.store.is_empty());
}

#[test]
fn test_exhausted_cursor_stays_put() {
    let catalog = catalog_of(&[Some(1.0)]);
    let mut cursor = RevealCursor::new();
    let mut store = ExposedStore::new();

    cursor.advance(&catalog, at(2.0), &mut store);
    assert!(cursor.is_exhausted(&catalog));
    let batch = cursor.advance(&catalog, at(100.0), &mut store);
    assert!(batch.is_empty());
    assert_eq!(store.len(), 1);
}
