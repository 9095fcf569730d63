//! Shared fixtures for the Atelier Verde integration tests.
//!
//! The tests in `tests/` drive whole flows across crates: cart dispatch
//! through snapshot persistence, hydration into a fresh process, and the
//! order payloads built from a priced cart. Everything here runs against
//! the real file-backed storage (in a temp dir) and a recording mirror;
//! no backend is required.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::{Arc, Mutex, PoisonError};

use atelier_cart::{CartMirror, MirrorOp, NewItem, StayDates};
use atelier_core::{ExperienceId, Money, ProductId, RoomId};
use chrono::NaiveDate;

/// A mirror that records every op instead of sending it anywhere.
///
/// Clones share the same log, so a test can hand one clone to the store
/// and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingMirror {
    ops: Arc<Mutex<Vec<MirrorOp>>>,
}

impl RecordingMirror {
    /// The ops applied so far, in dispatch order.
    #[must_use]
    pub fn ops(&self) -> Vec<MirrorOp> {
        self.ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CartMirror for RecordingMirror {
    fn apply(&self, op: MirrorOp) {
        self.ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(op);
    }
}

/// A product line: linen tote at 49.99, catalog stock 10.
#[must_use]
pub fn tote(quantity: u32) -> NewItem {
    NewItem::product(
        ProductId::new(1),
        "Linen Tote",
        Money::from_cents(4999),
        quantity,
    )
    .with_stock(10)
}

/// An experience booking: olive oil tasting at 60.00 per person.
#[must_use]
pub fn tasting(date: NaiveDate, guests: u32) -> NewItem {
    NewItem::experience(
        ExperienceId::new(2),
        "Olive Oil Tasting",
        Money::from_cents(6000),
        date,
        guests,
    )
}

/// A room stay: garden suite at 120.00 per night, sleeps 2.
#[must_use]
pub fn suite(stay: StayDates) -> NewItem {
    NewItem::room(
        RoomId::new(3),
        "Garden Suite",
        Money::from_cents(12_000),
        stay,
        2,
    )
}
