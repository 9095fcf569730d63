//! Mirror ops emitted across session boundaries.
//!
//! A logged-in session attaches a mirror when it hydrates, so the ops it
//! emits reference line ids minted in earlier sessions. These tests pair
//! the file-backed storage with a recording mirror to check those
//! sequences.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use atelier_cart::storage::JsonFileStorage;
use atelier_cart::{CartStore, MirrorOp};
use atelier_core::LineId;
use chrono::NaiveDate;

use atelier_integration_tests::{RecordingMirror, tasting, tote};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn test_mirror_sees_hydrated_line_ids() {
    let dir = tempfile::tempdir().unwrap();

    // Anonymous session: no mirror.
    {
        let mut store = CartStore::new(JsonFileStorage::in_dir(dir.path()));
        store.add_item(tote(1)).unwrap();
        store.add_item(tasting(date("2026-09-12"), 2)).unwrap();
    }

    // Logged-in session over the same snapshot.
    let mirror = RecordingMirror::default();
    let mut store =
        CartStore::hydrate(JsonFileStorage::in_dir(dir.path())).with_mirror(mirror.clone());
    store.update_quantity(LineId::new(1), 4).unwrap();
    store.remove_item(LineId::new(2)).unwrap();

    let ops = mirror.ops();
    assert_eq!(ops.len(), 2);
    assert!(matches!(
        ops[0],
        MirrorOp::UpdateQuantity { line_id, quantity: 4 } if line_id == LineId::new(1)
    ));
    assert!(matches!(
        ops[1],
        MirrorOp::Remove { line_id } if line_id == LineId::new(2)
    ));
}

#[test]
fn test_merge_after_hydration_mirrors_as_update() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut store = CartStore::new(JsonFileStorage::in_dir(dir.path()));
        store.add_item(tote(2)).unwrap();
    }

    let mirror = RecordingMirror::default();
    let mut store =
        CartStore::hydrate(JsonFileStorage::in_dir(dir.path())).with_mirror(mirror.clone());
    store.add_item(tote(1)).unwrap();

    // The backend already has line 1, so the merge goes out as an update.
    let ops = mirror.ops();
    assert_eq!(ops.len(), 1);
    assert!(matches!(
        ops[0],
        MirrorOp::UpdateQuantity { line_id, quantity: 3 } if line_id == LineId::new(1)
    ));
}

#[test]
fn test_noop_dispatch_emits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mirror = RecordingMirror::default();
    let mut store =
        CartStore::hydrate(JsonFileStorage::in_dir(dir.path())).with_mirror(mirror.clone());

    store.remove_item(LineId::new(42)).unwrap();

    assert!(mirror.ops().is_empty());
    assert!(!dir.path().join("cart.json").exists());
}
