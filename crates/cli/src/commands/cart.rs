//! Cart commands: add lines from the catalog, list, update, and clear.
//!
//! # Usage
//!
//! ```bash
//! averde cart add-product 3 -q 2 --extra 7
//! averde cart add-experience 5 -d 2026-09-12 -g 4
//! averde cart add-room 1 --check-in 2026-09-10 --check-out 2026-09-13
//! averde cart list
//! averde cart update -l 2 -q 3
//! averde cart remove -l 2
//! averde cart total
//! ```
//!
//! Add commands look the item up in the catalog first, so name, price,
//! and stock on the cart line always come from the backend, never from
//! user input.

use chrono::NaiveDate;

use atelier_cart::{
    Extra, LineItemKind, NewItem, Outcome, StayDates, pricing,
};
use atelier_core::{ExperienceId, ExtraId, LineId, ProductId, RoomId};
use atelier_client::ApiClient;

use super::{CliError, money};
use crate::session::Session;

/// Add a product line, merging into an existing line for the same product.
///
/// # Errors
///
/// Returns an error if the product or an extra is unknown, or the
/// snapshot cannot be written.
pub async fn add_product(
    session: &mut Session,
    id: i32,
    quantity: u32,
    extra_ids: &[i32],
) -> Result<(), CliError> {
    let product = session.client.product(ProductId::from(id)).await?;
    let extras = resolve_extras(&session.client, extra_ids).await?;

    let mut item = NewItem::product(product.id, product.name, product.price, quantity)
        .with_stock(product.stock)
        .with_extras(extras);
    if let Some(url) = product.image_url {
        item = item.with_image(url);
    }

    let outcome = session.store.add_item(item)?;
    report(session, &outcome);
    Ok(())
}

/// Book an experience for a date and guest count.
///
/// # Errors
///
/// Returns an error if the experience or an extra is unknown, or the
/// snapshot cannot be written.
pub async fn add_experience(
    session: &mut Session,
    id: i32,
    date: NaiveDate,
    guests: u32,
    extra_ids: &[i32],
) -> Result<(), CliError> {
    let experience = session.client.experience(ExperienceId::from(id)).await?;
    let extras = resolve_extras(&session.client, extra_ids).await?;

    let mut item = NewItem::experience(experience.id, experience.name, experience.price, date, guests)
        .with_extras(extras);
    if let Some(url) = experience.image_url {
        item = item.with_image(url);
    }

    let outcome = session.store.add_item(item)?;
    report(session, &outcome);
    Ok(())
}

/// Book a room stay between two dates.
///
/// # Errors
///
/// Returns an error if the dates are not a valid stay, the room or an
/// extra is unknown, or the snapshot cannot be written.
pub async fn add_room(
    session: &mut Session,
    id: i32,
    check_in: NaiveDate,
    check_out: NaiveDate,
    extra_ids: &[i32],
) -> Result<(), CliError> {
    let stay = StayDates::new(check_in, check_out)?;
    let room = session.client.room(RoomId::from(id)).await?;
    let extras = resolve_extras(&session.client, extra_ids).await?;

    let mut item = NewItem::room(room.id, room.name, room.price_per_night, stay, room.capacity)
        .with_extras(extras);
    if let Some(url) = room.image_url {
        item = item.with_image(url);
    }

    let outcome = session.store.add_item(item)?;
    report(session, &outcome);
    Ok(())
}

/// Print every cart line with its subtotal, then the total.
#[allow(clippy::print_stdout)]
pub fn list(session: &Session) {
    let items = session.store.items();
    if items.is_empty() {
        println!("The cart is empty.");
        return;
    }

    for line in items {
        let detail = match &line.kind {
            LineItemKind::Product { quantity, .. } => format!("x{quantity}"),
            LineItemKind::Experience { date, guests, .. } => {
                format!("{date}, {guests} guest(s)")
            }
            LineItemKind::Room { stay, .. } => format!(
                "{} to {}, {} night(s)",
                stay.check_in(),
                stay.check_out(),
                stay.nights()
            ),
        };
        println!(
            "#{:<4} {:<32} {detail:<28} {:>10}",
            line.line_id,
            line.name,
            money(pricing::line_subtotal(line))
        );
        for extra in &line.extras {
            println!("       + {} ({})", extra.name, money(extra.price));
        }
    }
    println!("Total: {}", money(session.store.total()));
}

/// Set a line's quantity. Zero removes the line.
///
/// # Errors
///
/// Returns an error for room lines, whose length comes from the stay
/// dates, or if the snapshot cannot be written.
pub fn update(session: &mut Session, line: u64, quantity: u32) -> Result<(), CliError> {
    let outcome = session
        .store
        .update_quantity(LineId::new(line), quantity)?;
    report(session, &outcome);
    Ok(())
}

/// Remove a line from the cart.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be written.
pub fn remove(session: &mut Session, line: u64) -> Result<(), CliError> {
    let outcome = session.store.remove_item(LineId::new(line))?;
    report(session, &outcome);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be removed.
pub fn clear(session: &mut Session) -> Result<(), CliError> {
    let outcome = session.store.clear()?;
    report(session, &outcome);
    Ok(())
}

/// Print the cart total.
#[allow(clippy::print_stdout)]
pub fn total(session: &Session) {
    println!("Total: {}", money(session.store.total()));
}

/// Look the requested extra ids up in the catalog, in selection order.
async fn resolve_extras(client: &ApiClient, ids: &[i32]) -> Result<Vec<Extra>, CliError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let catalog = client.extras().await?;
    ids.iter()
        .map(|raw| {
            let id = ExtraId::from(*raw);
            catalog
                .iter()
                .find(|extra| extra.id == id)
                .cloned()
                .ok_or(CliError::UnknownExtra(*raw))
        })
        .collect()
}

/// One-line summary of what a dispatch did, plus the running total.
#[allow(clippy::print_stdout)]
fn report(session: &Session, outcome: &Outcome) {
    match outcome {
        Outcome::Added { line_id, merged } => {
            if *merged {
                println!("Merged into cart line #{line_id}.");
            } else {
                println!("Added cart line #{line_id}.");
            }
        }
        Outcome::Removed { line_id } => println!("Removed cart line #{line_id}."),
        Outcome::Updated {
            line_id,
            quantity,
            clamped,
        } => {
            if *clamped {
                println!("Line #{line_id} set to {quantity} (limited by stock).");
            } else {
                println!("Line #{line_id} set to {quantity}.");
            }
        }
        Outcome::Cleared => {
            println!("Cart cleared.");
            return;
        }
        Outcome::NoOp => {
            println!("No such cart line; nothing changed.");
            return;
        }
    }
    println!("Total: {}", money(session.store.total()));
}
