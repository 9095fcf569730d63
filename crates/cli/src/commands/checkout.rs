//! Order flow: checkout, order history, and quotes.
//!
//! Checkout prices the cart locally, creates the order, and opens a
//! payment session. Only a completed payment clears the cart; a failed
//! one leaves both the order and the cart as they are.

use atelier_client::{CheckoutRequest, OrderLine};
use atelier_core::PaymentStatus;

use super::{CliError, money};
use crate::session::Session;

/// Create an order from the cart and pay for it.
///
/// # Errors
///
/// Returns an error without a session, if the backend rejects the order,
/// or if the emptied cart snapshot cannot be written.
#[allow(clippy::print_stdout)]
pub async fn checkout(session: &mut Session, method: &str) -> Result<(), CliError> {
    if !session.client.has_token() {
        return Err(CliError::NotLoggedIn);
    }
    if session.store.cart().is_empty() {
        println!("The cart is empty; nothing to check out.");
        return Ok(());
    }

    let request = CheckoutRequest::from_cart(session.store.cart());
    let order = session.client.create_order(&request).await?;
    println!(
        "Order #{} created for {}.",
        order.id,
        money(order.total_amount)
    );

    let payment = session
        .client
        .create_payment(order.id, order.total_amount, method)
        .await?;
    match payment.status {
        PaymentStatus::Completed => {
            session.store.clear()?;
            match payment.transaction_id {
                Some(tx) => println!("Payment completed (transaction {tx}). Cart cleared."),
                None => println!("Payment completed. Cart cleared."),
            }
        }
        PaymentStatus::Failed => {
            println!(
                "Payment failed. Order #{} is still pending and the cart is untouched.",
                order.id
            );
        }
    }
    Ok(())
}

/// List the user's past orders.
///
/// # Errors
///
/// Returns an error without a session or if the request fails.
#[allow(clippy::print_stdout)]
pub async fn orders(session: &Session) -> Result<(), CliError> {
    if !session.client.has_token() {
        return Err(CliError::NotLoggedIn);
    }
    let orders = session.client.orders().await?;
    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }
    for order in orders {
        println!(
            "#{:<6} {:<12} {:>10}  {}",
            order.id,
            order.status,
            money(order.total_amount),
            order.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

/// Submit the current cart as a quote request.
///
/// The cart stays as it is; quotes are reviewed server-side and do not
/// go through checkout.
///
/// # Errors
///
/// Returns an error without a session or if the backend rejects the
/// quote.
#[allow(clippy::print_stdout)]
pub async fn quote_save(session: &Session) -> Result<(), CliError> {
    if !session.client.has_token() {
        return Err(CliError::NotLoggedIn);
    }
    if session.store.cart().is_empty() {
        println!("The cart is empty; nothing to quote.");
        return Ok(());
    }

    let items: Vec<OrderLine> = session.store.items().iter().map(OrderLine::from_line).collect();
    let quote = session.client.create_quote(&items).await?;
    println!(
        "Quote #{} saved for {} ({}).",
        quote.id,
        money(quote.total_price),
        quote.status
    );
    Ok(())
}

/// List saved quotes and their review statuses.
///
/// # Errors
///
/// Returns an error without a session or if the request fails.
#[allow(clippy::print_stdout)]
pub async fn quote_list(session: &Session) -> Result<(), CliError> {
    if !session.client.has_token() {
        return Err(CliError::NotLoggedIn);
    }
    let quotes = session.client.quotes().await?;
    if quotes.is_empty() {
        println!("No saved quotes.");
        return Ok(());
    }
    for quote in quotes {
        println!(
            "#{:<6} {:<10} {:>10}  {}",
            quote.id,
            quote.status,
            money(quote.total_price),
            quote.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}
