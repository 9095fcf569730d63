//! The cart store.
//!
//! All cart mutation funnels through [`CartStore::dispatch`] with a typed
//! [`CartAction`], replacing the scattered ad hoc storage reads and writes
//! this design consolidates. The dispatch order for every action is:
//!
//! 1. apply the mutation to the in-memory [`Cart`] (synchronous, the
//!    source of truth for rendering),
//! 2. save the serialized cart through the [`CartStorage`] port,
//! 3. mirror the mutation to the backend through the [`CartMirror`] port,
//!    fire-and-forget.
//!
//! A mirror failure is logged and reported out-of-band by the mirror
//! implementation; the local mutation is never rolled back. The cart is
//! deliberately eventually consistent with the backend copy.

use atelier_core::{LineId, Money, ProductId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CartError;
use crate::item::{LineItem, LineItemKind, NewItem};
use crate::pricing;
use crate::storage::CartStorage;

// =============================================================================
// Cart
// =============================================================================

/// An ordered collection of line items, oldest first.
///
/// Duplicate references are allowed as separate entries; only the
/// product merge-on-add policy in [`CartStore::dispatch`] collapses them.
/// The line-ID counter is persisted with the items so IDs are never
/// reused within one cart's lifetime, even across reloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<LineItem>,
    next_line_id: LineId,
}

impl Default for Cart {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_line_id: LineId::new(1),
        }
    }
}

impl Cart {
    /// The line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a line by its ID.
    #[must_use]
    pub fn line(&self, line_id: LineId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.line_id == line_id)
    }

    /// Append a draft as a new line, minting its ID. Positional append
    /// only: the merge-on-add policy lives in [`CartStore::dispatch`].
    pub fn push(&mut self, item: NewItem) -> LineId {
        let line_id = self.next_line_id;
        self.next_line_id = line_id.next();
        self.items.push(item.into_line(line_id));
        line_id
    }

    fn position(&self, selector: LineSelector) -> Option<usize> {
        match selector {
            LineSelector::Id(line_id) => {
                self.items.iter().position(|item| item.line_id == line_id)
            }
            LineSelector::Index(index) => (index < self.items.len()).then_some(index),
        }
    }

    fn merge_position(&self, product_id: ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.merge_key() == Some(product_id))
    }
}

// =============================================================================
// Actions and outcomes
// =============================================================================

/// How a mutation names the line it targets.
///
/// Views that render positional lists address by index; everything else
/// addresses by the stable line ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSelector {
    Id(LineId),
    Index(usize),
}

impl From<LineId> for LineSelector {
    fn from(line_id: LineId) -> Self {
        Self::Id(line_id)
    }
}

/// A cart mutation. The only way state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Append an item; same-product lines merge by incrementing quantity.
    /// A merge keeps the existing line's unit price and extras; the
    /// incoming item contributes only its quantity and a fresher stock
    /// figure. A product whose known stock is zero is rejected.
    Add(NewItem),
    /// Remove a line. A no-op when the line does not exist.
    Remove(LineSelector),
    /// Replace a line's quantity (product) or guest count (experience).
    /// Zero behaves exactly like `Remove`. Quantities above known stock
    /// are clamped and the adjustment is reported.
    UpdateQuantity {
        selector: LineSelector,
        quantity: u32,
    },
    /// Empty the cart unconditionally.
    Clear,
}

/// What a dispatched action did, for the caller to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A line was appended, or (`merged`) an existing product line's
    /// quantity was incremented instead.
    Added { line_id: LineId, merged: bool },
    /// The line was removed.
    Removed { line_id: LineId },
    /// The line's quantity is now `quantity`. `clamped` is set when the
    /// requested value exceeded known stock and was adjusted down.
    Updated {
        line_id: LineId,
        quantity: u32,
        clamped: bool,
    },
    /// The cart was emptied.
    Cleared,
    /// The targeted line does not exist; nothing changed.
    NoOp,
}

/// The mirrored form of a mutation, sent to the backend cart resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOp {
    Add { line: LineItem },
    UpdateQuantity { line_id: LineId, quantity: u32 },
    Remove { line_id: LineId },
    Clear,
}

/// Fire-and-forget mirror of cart mutations to the backend.
///
/// Implementations must not block: send in the background, log failures,
/// and never feed a result back into the store. The local cart is the
/// source of truth either way.
pub trait CartMirror {
    fn apply(&self, op: MirrorOp);
}

impl<M: CartMirror + ?Sized> CartMirror for std::sync::Arc<M> {
    fn apply(&self, op: MirrorOp) {
        (**self).apply(op);
    }
}

// =============================================================================
// CartStore
// =============================================================================

/// The cart state container.
///
/// Owned by a single client session and mutated only on that session's
/// event flow; the storage port is the only thing shared with other
/// sessions, and the last writer wins there.
pub struct CartStore<S: CartStorage> {
    cart: Cart,
    storage: S,
    mirror: Option<Box<dyn CartMirror>>,
}

impl<S: CartStorage> CartStore<S> {
    /// A store with an empty cart, ignoring any persisted snapshot.
    pub fn new(storage: S) -> Self {
        Self {
            cart: Cart::default(),
            storage,
            mirror: None,
        }
    }

    /// A store hydrated from the persisted snapshot.
    ///
    /// A missing snapshot yields an empty cart. So does a corrupt one:
    /// that is logged and discarded rather than treated as fatal, because
    /// a stale cart is an inconvenience and a crash loop is not.
    pub fn hydrate(storage: S) -> Self {
        let cart = match storage.load() {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::default(),
            Err(err) => {
                warn!(error = %err, "discarding unreadable cart snapshot");
                Cart::default()
            }
        };
        Self {
            cart,
            storage,
            mirror: None,
        }
    }

    /// Attach a backend mirror. Mutations dispatched from here on are
    /// also sent to the backend cart resource, fire-and-forget.
    #[must_use]
    pub fn with_mirror(mut self, mirror: impl CartMirror + 'static) -> Self {
        self.mirror = Some(Box::new(mirror));
        self
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Grand total, recomputed from scratch.
    #[must_use]
    pub fn total(&self) -> Money {
        pricing::cart_total(&self.cart)
    }

    /// Apply one action: mutate, persist, mirror.
    ///
    /// # Errors
    ///
    /// [`CartError::OutOfStock`] when an add targets a product with no
    /// remaining stock, [`CartError::QuantityImmutable`] when a quantity
    /// update targets a room stay, and [`CartError::Storage`] when the
    /// snapshot write fails - in the latter case the in-memory mutation
    /// is kept and only the snapshot is stale.
    pub fn dispatch(&mut self, action: CartAction) -> Result<Outcome, CartError> {
        let (outcome, mirror_op) = match action {
            CartAction::Add(item) => self.apply_add(item)?,
            CartAction::Remove(selector) => self.apply_remove(selector),
            CartAction::UpdateQuantity { selector, quantity } => {
                self.apply_update(selector, quantity)?
            }
            CartAction::Clear => {
                self.cart = Cart::default();
                (Outcome::Cleared, Some(MirrorOp::Clear))
            }
        };

        if matches!(outcome, Outcome::NoOp) {
            return Ok(outcome);
        }

        self.persist(outcome == Outcome::Cleared)?;
        if let (Some(mirror), Some(op)) = (self.mirror.as_ref(), mirror_op) {
            mirror.apply(op);
        }
        Ok(outcome)
    }

    /// Convenience wrapper for [`CartAction::Add`].
    pub fn add_item(&mut self, item: NewItem) -> Result<Outcome, CartError> {
        self.dispatch(CartAction::Add(item))
    }

    /// Convenience wrapper for [`CartAction::Remove`].
    pub fn remove_item(&mut self, selector: impl Into<LineSelector>) -> Result<Outcome, CartError> {
        self.dispatch(CartAction::Remove(selector.into()))
    }

    /// Convenience wrapper for [`CartAction::UpdateQuantity`].
    pub fn update_quantity(
        &mut self,
        selector: impl Into<LineSelector>,
        quantity: u32,
    ) -> Result<Outcome, CartError> {
        self.dispatch(CartAction::UpdateQuantity {
            selector: selector.into(),
            quantity,
        })
    }

    /// Convenience wrapper for [`CartAction::Clear`].
    pub fn clear(&mut self) -> Result<Outcome, CartError> {
        self.dispatch(CartAction::Clear)
    }

    fn apply_add(&mut self, item: NewItem) -> Result<(Outcome, Option<MirrorOp>), CartError> {
        // Merge-on-add applies to plain products only; bookings are
        // distinct even for the same catalog entry.
        if let LineItemKind::Product {
            product_id,
            quantity: added,
            available_stock: added_stock,
        } = item.kind
        {
            // A catalog figure of zero blocks the add outright; it never
            // enters the cart at a floor quantity.
            if added_stock == Some(0) {
                return Err(CartError::OutOfStock { product_id });
            }
            if let Some(position) = self.cart.merge_position(product_id) {
                if let Some(line) = self.cart.items.get_mut(position) {
                    if let LineItemKind::Product {
                        quantity,
                        available_stock,
                        ..
                    } = &mut line.kind
                    {
                        let stock = if added_stock.is_some() {
                            added_stock
                        } else {
                            *available_stock
                        };
                        let merged = clamp_to_stock(quantity.saturating_add(added), stock);
                        if merged == 0 {
                            return Err(CartError::OutOfStock { product_id });
                        }
                        // The incoming stock figure is fresher than the
                        // one captured when the line was first added.
                        *available_stock = stock;
                        *quantity = merged;
                        let line_id = line.line_id;
                        debug!(%line_id, quantity = merged, "merged product into existing cart line");
                        return Ok((
                            Outcome::Added {
                                line_id,
                                merged: true,
                            },
                            Some(MirrorOp::UpdateQuantity {
                                line_id,
                                quantity: merged,
                            }),
                        ));
                    }
                }
            }
        }

        let mut item = item;
        if let LineItemKind::Product {
            quantity,
            available_stock,
            ..
        } = &mut item.kind
        {
            *quantity = clamp_to_stock(*quantity, *available_stock);
        }

        let line_id = self.cart.push(item);
        let line = self
            .cart
            .line(line_id)
            .cloned()
            .unwrap_or_else(|| unreachable!("line {line_id} was just pushed"));
        Ok((
            Outcome::Added {
                line_id,
                merged: false,
            },
            Some(MirrorOp::Add { line }),
        ))
    }

    fn apply_remove(&mut self, selector: LineSelector) -> (Outcome, Option<MirrorOp>) {
        // Removing a non-existent line is a no-op, not an error.
        let Some(position) = self.cart.position(selector) else {
            return (Outcome::NoOp, None);
        };
        let line = self.cart.items.remove(position);
        (
            Outcome::Removed {
                line_id: line.line_id,
            },
            Some(MirrorOp::Remove {
                line_id: line.line_id,
            }),
        )
    }

    fn apply_update(
        &mut self,
        selector: LineSelector,
        requested: u32,
    ) -> Result<(Outcome, Option<MirrorOp>), CartError> {
        if requested == 0 {
            return Ok(self.apply_remove(selector));
        }
        let Some(position) = self.cart.position(selector) else {
            return Ok((Outcome::NoOp, None));
        };
        let Some(line) = self.cart.items.get_mut(position) else {
            return Ok((Outcome::NoOp, None));
        };
        let line_id = line.line_id;

        let (slot, stock) = match &mut line.kind {
            LineItemKind::Product {
                quantity,
                available_stock,
                ..
            } => (quantity, *available_stock),
            LineItemKind::Experience { guests, .. } => (guests, None),
            LineItemKind::Room { .. } => {
                return Err(CartError::QuantityImmutable { line_id });
            }
        };

        let quantity = clamp_to_stock(requested, stock);
        // A clamp down to zero means the catalog has no stock left for
        // this line; the line leaves the cart, same as an explicit zero.
        if quantity == 0 {
            return Ok(self.apply_remove(LineSelector::Index(position)));
        }
        *slot = quantity;
        Ok((
            Outcome::Updated {
                line_id,
                quantity,
                clamped: quantity != requested,
            },
            Some(MirrorOp::UpdateQuantity { line_id, quantity }),
        ))
    }

    fn persist(&self, cleared: bool) -> Result<(), CartError> {
        if cleared {
            self.storage.clear()?;
        } else {
            self.storage.save(&self.cart)?;
        }
        Ok(())
    }
}

/// Clamp a requested quantity to known stock.
///
/// Unknown stock passes the request through. Can return zero when the
/// known stock is zero; callers decide whether that rejects the action
/// or removes the line.
const fn clamp_to_stock(requested: u32, stock: Option<u32>) -> u32 {
    match stock {
        Some(stock) if requested > stock => stock,
        _ => requested,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::item::{Extra, ExtraScaling, StayDates};
    use crate::storage::MemoryStorage;
    use atelier_core::{ExperienceId, ExtraId, RoomId};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn tote(quantity: u32) -> NewItem {
        NewItem::product(ProductId::new(1), "Tote", Money::from_cents(4999), quantity)
    }

    fn tour(guests: u32) -> NewItem {
        NewItem::experience(
            ExperienceId::new(9),
            "Vineyard tour",
            Money::from_cents(8000),
            date("2025-07-10"),
            guests,
        )
    }

    fn suite() -> NewItem {
        let stay = StayDates::new(date("2025-06-01"), date("2025-06-04")).unwrap();
        NewItem::room(RoomId::new(4), "Garden suite", Money::from_cents(10000), stay, 2)
    }

    /// Mirror double that records every op it receives.
    #[derive(Clone, Default)]
    struct RecordingMirror(Arc<Mutex<Vec<MirrorOp>>>);

    impl RecordingMirror {
        fn ops(&self) -> Vec<MirrorOp> {
            self.0.lock().unwrap().clone()
        }
    }

    impl CartMirror for RecordingMirror {
        fn apply(&self, op: MirrorOp) {
            self.0.lock().unwrap().push(op);
        }
    }

    #[test]
    fn test_add_product_merges_by_incrementing_quantity() {
        let mut store = CartStore::new(MemoryStorage::default());
        let first = store.add_item(tote(1)).unwrap();
        let second = store.add_item(tote(1)).unwrap();

        let Outcome::Added { line_id, merged: false } = first else {
            panic!("first add should insert: {first:?}");
        };
        assert_eq!(
            second,
            Outcome::Added {
                line_id,
                merged: true
            }
        );
        assert_eq!(store.items().len(), 1);
        assert!(matches!(
            store.items()[0].kind,
            LineItemKind::Product { quantity: 2, .. }
        ));
    }

    #[test]
    fn test_bookings_never_merge() {
        let mut store = CartStore::new(MemoryStorage::default());
        store.add_item(tour(2)).unwrap();
        store.add_item(tour(2)).unwrap();
        store.add_item(suite()).unwrap();
        store.add_item(suite()).unwrap();
        assert_eq!(store.items().len(), 4);
    }

    #[test]
    fn test_add_then_remove_roundtrips() {
        // Policy under test: removing a merged product line deletes the
        // whole line, not one unit; update_quantity exists to decrement.
        let mut store = CartStore::new(MemoryStorage::default());
        store.add_item(tour(2)).unwrap();
        let before = store.cart().clone();

        let Outcome::Added { line_id, .. } = store.add_item(suite()).unwrap() else {
            panic!("expected add outcome");
        };
        store.remove_item(line_id).unwrap();
        assert_eq!(store.cart().items(), before.items());
    }

    #[test]
    fn test_remove_missing_line_is_noop() {
        let mut store = CartStore::new(MemoryStorage::default());
        store.add_item(tote(1)).unwrap();
        assert_eq!(store.remove_item(LineId::new(99)).unwrap(), Outcome::NoOp);
        assert_eq!(store.remove_item(LineSelector::Index(5)).unwrap(), Outcome::NoOp);
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn test_remove_by_index_preserves_order() {
        let mut store = CartStore::new(MemoryStorage::default());
        store.add_item(tour(1)).unwrap();
        store.add_item(tour(2)).unwrap();
        store.add_item(tour(3)).unwrap();

        store.remove_item(LineSelector::Index(1)).unwrap();
        let guests: Vec<u32> = store
            .items()
            .iter()
            .map(|item| match item.kind {
                LineItemKind::Experience { guests, .. } => guests,
                _ => panic!("expected experiences"),
            })
            .collect();
        assert_eq!(guests, [1, 3]);
    }

    #[test]
    fn test_update_quantity_zero_equals_remove() {
        let mut a = CartStore::new(MemoryStorage::default());
        let mut b = CartStore::new(MemoryStorage::default());
        for store in [&mut a, &mut b] {
            store.add_item(tote(2)).unwrap();
            store.add_item(tour(2)).unwrap();
        }
        let line_id = a.items()[0].line_id;

        a.update_quantity(line_id, 0).unwrap();
        b.remove_item(line_id).unwrap();
        assert_eq!(a.cart().items(), b.cart().items());
    }

    #[test]
    fn test_update_quantity_clamps_to_stock() {
        let mut store = CartStore::new(MemoryStorage::default());
        store.add_item(tote(1).with_stock(5)).unwrap();
        let line_id = store.items()[0].line_id;

        let outcome = store.update_quantity(line_id, 12).unwrap();
        assert_eq!(
            outcome,
            Outcome::Updated {
                line_id,
                quantity: 5,
                clamped: true
            }
        );
    }

    #[test]
    fn test_fresh_add_clamps_to_stock() {
        let mut store = CartStore::new(MemoryStorage::default());
        store.add_item(tote(9).with_stock(5)).unwrap();
        assert!(matches!(
            store.items()[0].kind,
            LineItemKind::Product { quantity: 5, .. }
        ));
    }

    #[test]
    fn test_merge_on_add_respects_stock() {
        let mut store = CartStore::new(MemoryStorage::default());
        store.add_item(tote(3).with_stock(4)).unwrap();
        store.add_item(tote(3).with_stock(4)).unwrap();
        assert!(matches!(
            store.items()[0].kind,
            LineItemKind::Product {
                quantity: 4,
                available_stock: Some(4),
                ..
            }
        ));
    }

    #[test]
    fn test_out_of_stock_add_rejected() {
        let storage = MemoryStorage::default();
        let mut store = CartStore::new(&storage);
        let err = store.add_item(tote(1).with_stock(0)).unwrap_err();
        assert!(
            matches!(err, CartError::OutOfStock { product_id } if product_id == ProductId::new(1))
        );
        assert!(store.cart().is_empty());
        assert!(!storage.has_snapshot());
    }

    #[test]
    fn test_out_of_stock_readd_leaves_existing_line_alone() {
        let mut store = CartStore::new(MemoryStorage::default());
        store.add_item(tote(3).with_stock(4)).unwrap();

        // The catalog ran dry between adds; the merge is rejected and
        // the line already in the cart keeps its quantity.
        store.add_item(tote(1).with_stock(0)).unwrap_err();
        assert!(matches!(
            store.items()[0].kind,
            LineItemKind::Product { quantity: 3, .. }
        ));
    }

    #[test]
    fn test_update_clamped_to_zero_stock_removes_line() {
        // A persisted line can carry a zero stock figure from a snapshot
        // written before the catalog sold out.
        let storage = MemoryStorage::default();
        let mut cart = Cart::default();
        cart.push(tote(1).with_stock(0));
        storage.save(&cart).unwrap();

        let mut store = CartStore::hydrate(storage);
        let line_id = store.items()[0].line_id;
        let outcome = store.update_quantity(line_id, 3).unwrap();
        assert_eq!(outcome, Outcome::Removed { line_id });
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_merge_keeps_existing_price_and_extras() {
        let monogram = Extra::new(
            ExtraId::new(7),
            "Monogram",
            Money::from_cents(500),
            ExtraScaling::Flat,
        );
        let gift_wrap = Extra::new(
            ExtraId::new(8),
            "Gift wrap",
            Money::from_cents(300),
            ExtraScaling::Flat,
        );
        let mut store = CartStore::new(MemoryStorage::default());
        store
            .add_item(tote(1).with_extras(vec![monogram.clone()]))
            .unwrap();
        store.add_item(tote(1).with_extras(vec![gift_wrap])).unwrap();

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].extras, vec![monogram]);
        assert_eq!(store.items()[0].unit_price, Money::from_cents(4999));
    }

    #[test]
    fn test_update_room_quantity_rejected() {
        let mut store = CartStore::new(MemoryStorage::default());
        store.add_item(suite()).unwrap();
        let line_id = store.items()[0].line_id;

        let err = store.update_quantity(line_id, 2).unwrap_err();
        assert!(matches!(err, CartError::QuantityImmutable { .. }));
    }

    #[test]
    fn test_update_experience_guests_changes_subtotal() {
        let mut store = CartStore::new(MemoryStorage::default());
        store.add_item(tour(2)).unwrap();
        let line_id = store.items()[0].line_id;

        store.update_quantity(line_id, 5).unwrap();
        assert_eq!(store.total().amount(), dec!(400.00));
    }

    #[test]
    fn test_every_mutation_persists() {
        let storage = MemoryStorage::default();
        let mut store = CartStore::new(&storage);

        store.add_item(tote(1)).unwrap();
        assert_eq!(storage.load().unwrap().unwrap().len(), 1);

        store.add_item(tour(2)).unwrap();
        assert_eq!(storage.load().unwrap().unwrap().len(), 2);

        let line_id = store.items()[0].line_id;
        store.remove_item(line_id).unwrap();
        assert_eq!(storage.load().unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_clear_then_hydrate_is_empty() {
        let storage = MemoryStorage::default();
        let mut store = CartStore::new(&storage);
        store.add_item(tote(1)).unwrap();
        store.clear().unwrap();

        let reloaded = CartStore::hydrate(&storage);
        assert!(reloaded.cart().is_empty());
        assert!(!storage.has_snapshot());
    }

    #[test]
    fn test_hydrate_reconstructs_cart_and_line_ids() {
        let storage = MemoryStorage::default();
        let mut store = CartStore::new(&storage);
        store.add_item(tote(1)).unwrap();
        store.add_item(tour(2)).unwrap();
        let saved = store.cart().clone();

        let mut reloaded = CartStore::hydrate(&storage);
        assert_eq!(reloaded.cart(), &saved);

        // Line IDs keep counting from where the snapshot left off.
        let Outcome::Added { line_id, .. } = reloaded.add_item(suite()).unwrap() else {
            panic!("expected add outcome");
        };
        assert_eq!(line_id, LineId::new(3));
    }

    #[test]
    fn test_mirror_sees_every_mutation() {
        let mirror = RecordingMirror::default();
        let mut store = CartStore::new(MemoryStorage::default()).with_mirror(mirror.clone());

        store.add_item(tote(1)).unwrap();
        let line_id = store.items()[0].line_id;
        store.update_quantity(line_id, 3).unwrap();
        store.remove_item(line_id).unwrap();
        store.clear().unwrap();

        let ops = mirror.ops();
        assert_eq!(ops.len(), 4);
        assert!(matches!(ops[0], MirrorOp::Add { .. }));
        assert_eq!(ops[1], MirrorOp::UpdateQuantity { line_id, quantity: 3 });
        assert_eq!(ops[2], MirrorOp::Remove { line_id });
        assert_eq!(ops[3], MirrorOp::Clear);
    }

    #[test]
    fn test_merge_mirrors_as_quantity_update() {
        let mirror = RecordingMirror::default();
        let mut store = CartStore::new(MemoryStorage::default()).with_mirror(mirror.clone());
        store.add_item(tote(1)).unwrap();
        store.add_item(tote(2)).unwrap();

        let ops = mirror.ops();
        assert!(matches!(ops[1], MirrorOp::UpdateQuantity { quantity: 3, .. }));
    }

    #[test]
    fn test_noop_does_not_persist_or_mirror() {
        let mirror = RecordingMirror::default();
        let storage = MemoryStorage::default();
        let mut store = CartStore::new(&storage).with_mirror(mirror.clone());

        store.remove_item(LineId::new(1)).unwrap();
        assert!(mirror.ops().is_empty());
        assert!(!storage.has_snapshot());
    }

    #[test]
    fn test_total_recomputes_with_extras() {
        let mut store = CartStore::new(MemoryStorage::default());
        store
            .add_item(suite().with_extras(vec![Extra::new(
                ExtraId::new(1),
                "Champagne",
                Money::from_cents(2000),
                ExtraScaling::PerGuest,
            )]))
            .unwrap();
        store.add_item(tote(2)).unwrap();

        // 420 for the stay (worked example) + 99.98 for the totes.
        assert_eq!(store.total().amount(), dec!(519.98));
    }
}
