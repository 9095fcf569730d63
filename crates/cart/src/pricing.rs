//! The price calculator.
//!
//! Pure functions from cart state to money. Views call these on every
//! render; nothing here mutates or performs I/O, and nothing downstream
//! caches the results. All arithmetic is exact decimal - rounding happens
//! only when a [`Money`] is formatted for display.

use atelier_core::Money;

use crate::item::{Extra, ExtraScaling, LineItem, LineItemKind};
use crate::store::Cart;

/// Price contribution of a single line item.
///
/// - Product: `unit_price x quantity` plus every extra flat (extras on
///   products are one-off add-ons, never scaled by quantity).
/// - Experience: `unit_price x guests`; a per-guest extra contributes
///   `price x guests`, a flat extra contributes `price` once.
/// - Room: `unit_price x nights`; a per-guest extra contributes
///   `price x capacity x nights`, a flat extra contributes `price` once.
#[must_use]
pub fn line_subtotal(item: &LineItem) -> Money {
    match &item.kind {
        LineItemKind::Product { quantity, .. } => {
            item.unit_price.times(*quantity) + extras_flat(&item.extras)
        }
        LineItemKind::Experience { guests, .. } => {
            item.unit_price.times(*guests) + extras_scaled(&item.extras, *guests)
        }
        LineItemKind::Room { stay, capacity, .. } => {
            let nights = stay.nights();
            let guest_factor = capacity.saturating_mul(nights);
            item.unit_price.times(nights) + extras_scaled(&item.extras, guest_factor)
        }
    }
}

/// Grand total of the cart: the sum of every line subtotal, in cart order.
///
/// Addition is commutative, so the order cannot change the result; it is
/// preserved only so breakdowns render deterministically.
#[must_use]
pub fn cart_total(cart: &Cart) -> Money {
    cart.items().iter().map(line_subtotal).sum()
}

/// Every extra contributes its price once.
fn extras_flat(extras: &[Extra]) -> Money {
    extras.iter().map(|extra| extra.price).sum()
}

/// Per-guest extras scale by `guest_factor`; flat extras contribute once.
fn extras_scaled(extras: &[Extra], guest_factor: u32) -> Money {
    extras
        .iter()
        .map(|extra| match extra.scaling {
            ExtraScaling::Flat => extra.price,
            ExtraScaling::PerGuest => extra.price.times(guest_factor),
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::item::{NewItem, StayDates};
    use atelier_core::{ExperienceId, ExtraId, LineId, ProductId, RoomId};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn extra(price: Money, scaling: ExtraScaling) -> Extra {
        Extra::new(ExtraId::new(1), "Extra", price, scaling)
    }

    #[test]
    fn test_product_subtotal_without_extras() {
        let line = NewItem::product(
            ProductId::new(1),
            "Tote",
            Money::new(dec!(49.99)).unwrap(),
            2,
        )
        .into_line(LineId::new(1));
        assert_eq!(line_subtotal(&line).amount(), dec!(99.98));
    }

    #[test]
    fn test_product_extras_never_scale_with_quantity() {
        let line = NewItem::product(ProductId::new(1), "Tote", Money::from_cents(1000), 3)
            .with_extras(vec![
                extra(Money::from_cents(500), ExtraScaling::Flat),
                // Per-guest makes no sense on a product; contributes flat.
                extra(Money::from_cents(200), ExtraScaling::PerGuest),
            ])
            .into_line(LineId::new(1));
        assert_eq!(line_subtotal(&line).amount(), dec!(37.00));
    }

    #[test]
    fn test_experience_subtotal_scales_per_guest_extras() {
        let line = NewItem::experience(
            ExperienceId::new(1),
            "Vineyard tour",
            Money::from_cents(8000),
            date("2025-07-10"),
            4,
        )
        .with_extras(vec![
            extra(Money::from_cents(1500), ExtraScaling::PerGuest),
            extra(Money::from_cents(3000), ExtraScaling::Flat),
        ])
        .into_line(LineId::new(1));

        // 80 x 4 + 15 x 4 + 30 = 410
        assert_eq!(line_subtotal(&line).amount(), dec!(410.00));
    }

    #[test]
    fn test_room_subtotal_matches_worked_example() {
        // 100/night, capacity 2, one per-guest extra of 20, 3 nights:
        // 100 x 3 + 20 x 2 x 3 = 420
        let stay = StayDates::new(date("2025-06-01"), date("2025-06-04")).unwrap();
        let line = NewItem::room(
            RoomId::new(1),
            "Garden suite",
            Money::from_cents(10000),
            stay,
            2,
        )
        .with_extras(vec![extra(Money::from_cents(2000), ExtraScaling::PerGuest)])
        .into_line(LineId::new(1));

        assert_eq!(line_subtotal(&line).amount(), dec!(420.00));
    }

    #[test]
    fn test_room_flat_extra_contributes_once() {
        let stay = StayDates::new(date("2025-06-01"), date("2025-06-03")).unwrap();
        let line = NewItem::room(RoomId::new(1), "Suite", Money::from_cents(10000), stay, 2)
            .with_extras(vec![extra(Money::from_cents(2500), ExtraScaling::Flat)])
            .into_line(LineId::new(1));

        // 100 x 2 + 25 = 225
        assert_eq!(line_subtotal(&line).amount(), dec!(225.00));
    }

    #[test]
    fn test_room_guest_factor_saturates_on_extreme_stays() {
        // A millennium-long stay at u32::MAX capacity would overflow
        // `capacity x nights`; the factor saturates instead of panicking.
        let stay = StayDates::new(date("2025-01-01"), date("3025-01-01")).unwrap();
        let line = NewItem::room(RoomId::new(1), "Suite", Money::ZERO, stay, u32::MAX)
            .with_extras(vec![extra(Money::from_cents(1), ExtraScaling::PerGuest)])
            .into_line(LineId::new(1));

        assert_eq!(
            line_subtotal(&line),
            Money::from_cents(1).times(u32::MAX)
        );
    }

    #[test]
    fn test_cart_total_is_sum_of_subtotals_in_any_order() {
        let a = NewItem::product(ProductId::new(1), "Tote", Money::from_cents(4999), 2);
        let b = NewItem::experience(
            ExperienceId::new(2),
            "Tasting",
            Money::from_cents(8000),
            date("2025-07-10"),
            2,
        );

        let mut forward = Cart::default();
        forward.push(a.clone());
        forward.push(b.clone());

        let mut reversed = Cart::default();
        reversed.push(b);
        reversed.push(a);

        let expected = forward.items().iter().map(line_subtotal).sum::<Money>();
        assert_eq!(cart_total(&forward), expected);
        assert_eq!(cart_total(&reversed), expected);
        assert_eq!(cart_total(&forward).amount(), dec!(259.98));
    }

    #[test]
    fn test_empty_cart_totals_zero() {
        assert_eq!(cart_total(&Cart::default()), Money::ZERO);
    }
}
