//! Cart line items.
//!
//! A line item is one purchasable unit: a plain product, an experience
//! booking, or a room stay. The three kinds share a name, a base unit
//! price, and a list of selected extras, and differ only in the
//! [`LineItemKind`] payload that drives pricing.

use atelier_core::{ExperienceId, ExtraId, LineId, Money, ProductId, RoomId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CartError;

// =============================================================================
// Extras
// =============================================================================

/// How an extra's price scales when attached to a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtraScaling {
    /// Charged once per line, regardless of guests or nights.
    #[default]
    Flat,
    /// Charged per guest (and, for room stays, per night). On plain
    /// products there is no guest dimension, so it contributes flat.
    PerGuest,
}

/// A selected add-on for a line item (late checkout, airport pickup, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    pub id: ExtraId,
    pub name: String,
    pub price: Money,
    /// Wire name is `type`, matching the backend extras resource.
    #[serde(rename = "type", default)]
    pub scaling: ExtraScaling,
}

impl Extra {
    /// Create an extra.
    #[must_use]
    pub fn new(
        id: ExtraId,
        name: impl Into<String>,
        price: Money,
        scaling: ExtraScaling,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            scaling,
        }
    }
}

// =============================================================================
// Stay dates
// =============================================================================

/// A validated check-in / check-out pair for a room stay.
///
/// The constructor enforces `check_in < check_out`, so every value of this
/// type covers at least one night. The invariant also holds for
/// deserialized values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStayDates")]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

/// Unvalidated mirror of [`StayDates`] used during deserialization.
#[derive(Deserialize)]
struct RawStayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl TryFrom<RawStayDates> for StayDates {
    type Error = CartError;

    fn try_from(raw: RawStayDates) -> Result<Self, Self::Error> {
        Self::new(raw.check_in, raw.check_out)
    }
}

impl StayDates {
    /// Create a stay covering `check_in` (inclusive) to `check_out`
    /// (exclusive).
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidStay`] unless `check_in < check_out`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, CartError> {
        if check_in >= check_out {
            return Err(CartError::InvalidStay {
                check_in,
                check_out,
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Check-in date.
    #[must_use]
    pub const fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// Check-out date.
    #[must_use]
    pub const fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights: the calendar-day difference between the dates.
    ///
    /// Always at least 1 by the construction invariant.
    #[must_use]
    pub fn nights(&self) -> u32 {
        let days = (self.check_out - self.check_in).num_days();
        u32::try_from(days).unwrap_or(0)
    }
}

// =============================================================================
// Line items
// =============================================================================

/// The kind-specific payload of a line item.
///
/// The tag determines which pricing rule applies; see
/// [`crate::pricing::line_subtotal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineItemKind {
    /// A plain catalog product, priced per unit.
    Product {
        product_id: ProductId,
        /// Units ordered, always at least 1.
        quantity: u32,
        /// Stock reported by the catalog at add time, when known. Used to
        /// clamp quantity updates.
        available_stock: Option<u32>,
    },
    /// An experience booking, priced per person.
    Experience {
        experience_id: ExperienceId,
        date: NaiveDate,
        /// Attendees, always at least 1.
        guests: u32,
    },
    /// A room stay, priced per night.
    Room {
        room_id: RoomId,
        stay: StayDates,
        /// Room capacity; per-guest extras scale by it.
        capacity: u32,
    },
}

/// One entry in the cart.
///
/// Subtotals are never stored on the line; they are recomputed from these
/// fields by the price calculator whenever a view renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Client-minted identifier, unique within one cart.
    pub line_id: LineId,
    pub name: String,
    pub image_url: Option<String>,
    /// Base price per unit, per person, or per night depending on `kind`.
    pub unit_price: Money,
    /// Selected extras, in selection order.
    pub extras: Vec<Extra>,
    pub kind: LineItemKind,
}

impl LineItem {
    /// The product this line merges with on re-add, if any.
    ///
    /// Only plain products merge; bookings are distinct even for the same
    /// catalog entry because their dates and guests differ.
    #[must_use]
    pub const fn merge_key(&self) -> Option<ProductId> {
        match self.kind {
            LineItemKind::Product { product_id, .. } => Some(product_id),
            _ => None,
        }
    }
}

/// A line item waiting to enter the cart.
///
/// Identical to [`LineItem`] minus the line ID, which the store mints on
/// add. Build one with [`NewItem::product`], [`NewItem::experience`], or
/// [`NewItem::room`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub image_url: Option<String>,
    pub unit_price: Money,
    pub extras: Vec<Extra>,
    pub kind: LineItemKind,
}

impl NewItem {
    /// A plain product line. `quantity` is clamped to at least 1.
    #[must_use]
    pub fn product(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> Self {
        Self {
            name: name.into(),
            image_url: None,
            unit_price,
            extras: Vec::new(),
            kind: LineItemKind::Product {
                product_id,
                quantity: quantity.max(1),
                available_stock: None,
            },
        }
    }

    /// An experience booking. `guests` is clamped to at least 1.
    #[must_use]
    pub fn experience(
        experience_id: ExperienceId,
        name: impl Into<String>,
        unit_price: Money,
        date: NaiveDate,
        guests: u32,
    ) -> Self {
        Self {
            name: name.into(),
            image_url: None,
            unit_price,
            extras: Vec::new(),
            kind: LineItemKind::Experience {
                experience_id,
                date,
                guests: guests.max(1),
            },
        }
    }

    /// A room stay. Dates are validated by [`StayDates::new`] before this
    /// point; `capacity` is clamped to at least 1.
    #[must_use]
    pub fn room(
        room_id: RoomId,
        name: impl Into<String>,
        unit_price: Money,
        stay: StayDates,
        capacity: u32,
    ) -> Self {
        Self {
            name: name.into(),
            image_url: None,
            unit_price,
            extras: Vec::new(),
            kind: LineItemKind::Room {
                room_id,
                stay,
                capacity: capacity.max(1),
            },
        }
    }

    /// Record the catalog stock known at add time (products only).
    #[must_use]
    pub fn with_stock(mut self, stock: u32) -> Self {
        if let LineItemKind::Product {
            ref mut available_stock,
            ..
        } = self.kind
        {
            *available_stock = Some(stock);
        }
        self
    }

    /// Attach selected extras, preserving selection order.
    #[must_use]
    pub fn with_extras(mut self, extras: Vec<Extra>) -> Self {
        self.extras = extras;
        self
    }

    /// Attach a display image URL.
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Promote to a full line item with the given ID.
    #[must_use]
    pub(crate) fn into_line(self, line_id: LineId) -> LineItem {
        LineItem {
            line_id,
            name: self.name,
            image_url: self.image_url,
            unit_price: self.unit_price,
            extras: self.extras,
            kind: self.kind,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_stay_dates_rejects_inverted_range() {
        let err = StayDates::new(date("2025-06-04"), date("2025-06-01")).unwrap_err();
        assert!(matches!(err, CartError::InvalidStay { .. }));
    }

    #[test]
    fn test_stay_dates_rejects_same_day() {
        assert!(StayDates::new(date("2025-06-01"), date("2025-06-01")).is_err());
    }

    #[test]
    fn test_nights_is_calendar_day_difference() {
        let stay = StayDates::new(date("2025-06-01"), date("2025-06-04")).unwrap();
        assert_eq!(stay.nights(), 3);

        let one_night = StayDates::new(date("2025-06-01"), date("2025-06-02")).unwrap();
        assert_eq!(one_night.nights(), 1);
    }

    #[test]
    fn test_stay_dates_deserialization_validates() {
        let bad = r#"{"check_in":"2025-06-04","check_out":"2025-06-01"}"#;
        assert!(serde_json::from_str::<StayDates>(bad).is_err());

        let good = r#"{"check_in":"2025-06-01","check_out":"2025-06-04"}"#;
        let stay: StayDates = serde_json::from_str(good).unwrap();
        assert_eq!(stay.nights(), 3);
    }

    #[test]
    fn test_product_quantity_clamped_to_one() {
        let item = NewItem::product(ProductId::new(1), "Tote", Money::from_cents(1000), 0);
        assert!(matches!(
            item.kind,
            LineItemKind::Product { quantity: 1, .. }
        ));
    }

    #[test]
    fn test_merge_key_only_for_products() {
        let product = NewItem::product(ProductId::new(7), "Tote", Money::ZERO, 1)
            .into_line(LineId::new(1));
        assert_eq!(product.merge_key(), Some(ProductId::new(7)));

        let experience = NewItem::experience(
            ExperienceId::new(3),
            "Vineyard tour",
            Money::ZERO,
            date("2025-07-01"),
            2,
        )
        .into_line(LineId::new(2));
        assert_eq!(experience.merge_key(), None);
    }

    #[test]
    fn test_extra_wire_format_uses_type_tag() {
        let extra = Extra::new(
            ExtraId::new(1),
            "Champagne",
            Money::from_cents(2000),
            ExtraScaling::PerGuest,
        );
        let json = serde_json::to_value(&extra).unwrap();
        assert_eq!(json["type"], "per_guest");
    }

    #[test]
    fn test_line_item_kind_tagged_by_type() {
        let line = NewItem::product(ProductId::new(1), "Tote", Money::from_cents(1000), 2)
            .into_line(LineId::new(1));
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["kind"]["type"], "product");
        assert_eq!(json["kind"]["quantity"], 2);
    }
}
