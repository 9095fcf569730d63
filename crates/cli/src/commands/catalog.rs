//! Catalog browsing commands.
//!
//! Listings come from the client's cached catalog endpoints, so two
//! commands in quick succession only hit the backend once.

use atelier_cart::ExtraScaling;
use atelier_client::ApiClient;

use super::{CliError, money};

/// List catalog products with price and stock.
///
/// # Errors
///
/// Returns an error if the request fails.
#[allow(clippy::print_stdout)]
pub async fn products(client: &ApiClient) -> Result<(), CliError> {
    let products = client.products().await?;
    if products.is_empty() {
        println!("No products in the catalog.");
        return Ok(());
    }
    for product in products {
        let stock = if product.stock == 0 {
            "out of stock".to_string()
        } else {
            format!("{} in stock", product.stock)
        };
        println!(
            "#{:<4} {:<32} {:>10}  {stock}",
            product.id,
            product.name,
            money(product.price)
        );
    }
    Ok(())
}

/// List bookable experiences with their per-person price.
///
/// # Errors
///
/// Returns an error if the request fails.
#[allow(clippy::print_stdout)]
pub async fn experiences(client: &ApiClient) -> Result<(), CliError> {
    let experiences = client.experiences().await?;
    if experiences.is_empty() {
        println!("No experiences in the catalog.");
        return Ok(());
    }
    for experience in experiences {
        println!(
            "#{:<4} {:<32} {:>10} per person",
            experience.id,
            experience.name,
            money(experience.price)
        );
    }
    Ok(())
}

/// List bookable rooms with per-night price and capacity.
///
/// # Errors
///
/// Returns an error if the request fails.
#[allow(clippy::print_stdout)]
pub async fn rooms(client: &ApiClient) -> Result<(), CliError> {
    let rooms = client.rooms().await?;
    if rooms.is_empty() {
        println!("No rooms in the catalog.");
        return Ok(());
    }
    for room in rooms {
        println!(
            "#{:<4} {:<32} {:>10} per night, sleeps {}",
            room.id,
            room.name,
            money(room.price_per_night),
            room.capacity
        );
    }
    Ok(())
}

/// List available extras with how their price scales.
///
/// # Errors
///
/// Returns an error if the request fails.
#[allow(clippy::print_stdout)]
pub async fn extras(client: &ApiClient) -> Result<(), CliError> {
    let extras = client.extras().await?;
    if extras.is_empty() {
        println!("No extras available.");
        return Ok(());
    }
    for extra in extras {
        let scaling = match extra.scaling {
            ExtraScaling::Flat => "flat",
            ExtraScaling::PerGuest => "per guest",
        };
        println!(
            "#{:<4} {:<32} {:>10}  {scaling}",
            extra.id,
            extra.name,
            money(extra.price)
        );
    }
    Ok(())
}
