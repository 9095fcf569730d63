//! Command implementations for the `averde` binary.

use thiserror::Error;

use atelier_core::{CurrencyCode, Money};

use crate::config::ConfigError;

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;

/// Errors surfaced to the user by any command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A cart mutation was rejected or the snapshot could not be written.
    #[error(transparent)]
    Cart(#[from] atelier_cart::CartError),

    /// A backend request failed.
    #[error(transparent)]
    Client(#[from] atelier_client::ClientError),

    /// Session data could not be read or written.
    #[error("Failed to access session data: {0}")]
    Io(#[from] std::io::Error),

    /// An `--extra` flag named an id the catalog does not have.
    #[error("No extra with id {0} in the catalog")]
    UnknownExtra(i32),

    /// The command needs an authenticated session.
    #[error("Not logged in; run `averde login` first")]
    NotLoggedIn,
}

/// Format an amount with the shop currency symbol, e.g. `€49.99`.
pub(crate) fn money(amount: Money) -> String {
    format!("{}{amount}", CurrencyCode::default().symbol())
}
