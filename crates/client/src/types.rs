//! Domain types for the storefront backend API.
//!
//! These mirror the backend's JSON resources. Prices arrive as decimal
//! strings and deserialize into [`Money`], which rejects negatives at the
//! boundary.

use atelier_cart::Extra;
use atelier_core::{
    ExperienceId, Money, OrderId, OrderStatus, PaymentStatus, ProductId, QuoteId, QuoteStatus,
    RoomId, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog
// =============================================================================

/// A plain catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price per unit.
    pub price: Money,
    /// Units currently in stock; quantity updates clamp against this.
    pub stock: u32,
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A bookable experience, priced per person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: ExperienceId,
    pub name: String,
    /// Price per person.
    pub price: Money,
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A bookable room, priced per night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub price_per_night: Money,
    /// Sleeping capacity; per-guest extras scale by it.
    pub capacity: u32,
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// =============================================================================
// Auth
// =============================================================================

/// Authenticated user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// `customer` or `business`.
    pub role: UserRole,
}

/// Portal a user belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    Business,
}

/// Successful login response: bearer token plus profile.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

// =============================================================================
// Orders, quotes, payments
// =============================================================================

/// One priced line inside an order or quote payload.
///
/// Subtotals here are display snapshots computed by the price calculator
/// at submission time; the cart never reads them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: u32,
    pub unit_price: Money,
    #[serde(default)]
    pub extras: Vec<Extra>,
    pub subtotal: Money,
}

impl OrderLine {
    /// Snapshot a cart line for an order or quote payload.
    ///
    /// The subtotal is computed by the price calculator at submission
    /// time; quantity carries units for products, guests for experiences,
    /// and nights for rooms.
    #[must_use]
    pub fn from_line(line: &atelier_cart::LineItem) -> Self {
        use atelier_cart::LineItemKind;

        let (kind, quantity) = match &line.kind {
            LineItemKind::Product { quantity, .. } => ("product", *quantity),
            LineItemKind::Experience { guests, .. } => ("experience", *guests),
            LineItemKind::Room { stay, .. } => ("room", stay.nights()),
        };
        Self {
            name: line.name.clone(),
            kind: kind.to_string(),
            quantity,
            unit_price: line.unit_price,
            extras: line.extras.clone(),
            subtotal: atelier_cart::pricing::line_subtotal(line),
        }
    }
}

/// An order created through checkout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub total_amount: Money,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
}

/// A saved customization record awaiting business approval.
///
/// Related to but distinct from the cart: quotes live server-side and
/// move through [`QuoteStatus`] instead of checkout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub status: QuoteStatus,
    pub total_price: Money,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
}

/// Result of a payment session creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Payment {
    pub payment_id: String,
    pub order_id: OrderId,
    pub amount: Money,
    pub status: PaymentStatus,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

// =============================================================================
// Request payloads
// =============================================================================

/// Payload for `POST /api/orders` (checkout).
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub items: Vec<OrderLine>,
    pub total_amount: Money,
}

impl CheckoutRequest {
    /// Price and snapshot the whole cart for order creation.
    #[must_use]
    pub fn from_cart(cart: &atelier_cart::Cart) -> Self {
        Self {
            items: cart.items().iter().map(OrderLine::from_line).collect(),
            total_amount: atelier_cart::pricing::cart_total(cart),
        }
    }
}

/// Payload for `POST /api/cart/add`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CartAddRequest<'a> {
    pub line: &'a atelier_cart::LineItem,
}

/// Payload for `PUT /api/cart/update/{line_id}`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CartUpdateRequest {
    pub quantity: u32,
}

/// Generic success/message envelope used by mutation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
