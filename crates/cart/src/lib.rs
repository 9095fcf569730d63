//! Atelier Verde Cart - the client-held cart and pricing core.
//!
//! One canonical implementation of the cart model that every surface
//! (CLI today, web views tomorrow) renders from. The cart lives on the
//! client: mutations apply to in-memory state first, are snapshotted to
//! local storage synchronously, and are mirrored to the backend
//! fire-and-forget. The local copy is the source of truth for rendering.
//!
//! # Architecture
//!
//! - [`item`] - Line items as a tagged union over product / experience /
//!   room, with their extras and validated stay dates
//! - [`pricing`] - Pure subtotal and total calculators; callers re-derive
//!   totals on every render instead of trusting stored figures
//! - [`store`] - The [`CartStore`]: all mutation funnels through one typed
//!   [`CartAction`] dispatcher
//! - [`storage`] - The [`CartStorage`] port plus JSON-file and in-memory
//!   implementations
//!
//! # Example
//!
//! ```rust
//! use atelier_cart::{CartStore, NewItem, pricing};
//! use atelier_cart::storage::MemoryStorage;
//! use atelier_core::{Money, ProductId};
//!
//! let mut store = CartStore::new(MemoryStorage::default());
//! store.add_item(NewItem::product(
//!     ProductId::new(1),
//!     "Organic tote",
//!     Money::from_cents(4999),
//!     2,
//! ))?;
//! assert_eq!(pricing::cart_total(store.cart()).to_string(), "99.98");
//! # Ok::<(), atelier_cart::CartError>(())
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod item;
pub mod pricing;
pub mod storage;
pub mod store;

pub use error::CartError;
pub use item::{Extra, ExtraScaling, LineItem, LineItemKind, NewItem, StayDates};
pub use storage::{CartStorage, StorageError};
pub use store::{Cart, CartAction, CartMirror, CartStore, LineSelector, MirrorOp, Outcome};
