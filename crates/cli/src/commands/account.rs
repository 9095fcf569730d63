//! Account commands: login, logout, registration, and profile.
//!
//! # Usage
//!
//! ```bash
//! averde register -e customer@example.com -p secret -n "Ada"
//! averde login -e customer@example.com -p secret
//! averde profile
//! averde logout
//! ```

use atelier_client::UserRole;

use super::CliError;
use crate::session::Session;

/// Log in and persist the session token for later runs.
///
/// # Errors
///
/// Returns an error if the backend rejects the credentials or the token
/// cannot be persisted.
#[allow(clippy::print_stdout)]
pub async fn login(session: &Session, email: &str, password: &str) -> Result<(), CliError> {
    let auth = session.client.login(email, password).await?;
    session.persist_token(&auth.token)?;

    let name = auth.user.name.as_deref().unwrap_or(&auth.user.email);
    println!("Logged in as {name} ({}).", role_label(auth.user.role));
    Ok(())
}

/// Create a new account. Does not log in.
///
/// # Errors
///
/// Returns an error if the backend rejects the registration.
#[allow(clippy::print_stdout)]
pub async fn register(
    session: &Session,
    email: &str,
    password: &str,
    name: Option<&str>,
) -> Result<(), CliError> {
    let ack = session.client.register(email, password, name).await?;
    match ack.message {
        Some(message) => println!("{message}"),
        None => println!("Account created for {email}. Log in with `averde login`."),
    }
    Ok(())
}

/// Drop the session: empty the cart, then forget the token.
///
/// The cart is cleared first so the clear still mirrors to the backend
/// while the session is authenticated.
///
/// # Errors
///
/// Returns an error if the cart snapshot or token file cannot be removed.
#[allow(clippy::print_stdout)]
pub fn logout(session: &mut Session) -> Result<(), CliError> {
    session.store.clear()?;
    session.forget_token()?;
    println!("Logged out. The cart has been emptied.");
    Ok(())
}

/// Show the authenticated user's profile.
///
/// # Errors
///
/// Returns an error without a valid session.
#[allow(clippy::print_stdout)]
pub async fn profile(session: &Session) -> Result<(), CliError> {
    let user = session.client.profile().await?;
    println!("#{} {}", user.id, user.email);
    if let Some(name) = &user.name {
        println!("Name: {name}");
    }
    println!("Role: {}", role_label(user.role));
    Ok(())
}

const fn role_label(role: UserRole) -> &'static str {
    match role {
        UserRole::Customer => "customer",
        UserRole::Business => "business",
    }
}
