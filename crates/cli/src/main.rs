//! Atelier Verde CLI - Shop the catalog and manage a cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (persists the session token under the data dir)
//! averde login -e customer@example.com -p secret
//!
//! # Browse the catalog
//! averde catalog products
//! averde catalog rooms
//!
//! # Build a cart
//! averde cart add-product 3 -q 2 --extra 7
//! averde cart add-room 1 --check-in 2026-09-10 --check-out 2026-09-13
//! averde cart list
//!
//! # Place the order
//! averde checkout
//! ```
//!
//! The cart lives in a local snapshot file and survives between runs;
//! a logged-in session also mirrors every mutation to the backend.
//!
//! # Environment Variables
//!
//! - `ATELIER_BACKEND_URL` - Base URL of the storefront backend (required)
//! - `ATELIER_DATA_DIR` - Where the cart snapshot and token live
//!   (default: `~/.atelier`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod session;

use commands::CliError;
use session::Session;

#[derive(Parser)]
#[command(name = "averde")]
#[command(author, version, about = "Atelier Verde storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session token
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create a new account (does not log in)
    Register {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Drop the session token and empty the cart
    Logout,
    /// Show the authenticated user's profile
    Profile,
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        section: CatalogSection,
    },
    /// Inspect and mutate the cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Create an order from the cart and pay for it
    Checkout {
        /// Payment method passed to the payment endpoint
        #[arg(short, long, default_value = "credit_card")]
        method: String,
    },
    /// List past orders
    Orders,
    /// Save and review quotes
    Quote {
        #[command(subcommand)]
        action: QuoteCommand,
    },
}

#[derive(Subcommand)]
enum CatalogSection {
    /// List catalog products
    Products,
    /// List bookable experiences
    Experiences,
    /// List bookable rooms
    Rooms,
    /// List available extras
    Extras,
}

#[derive(Subcommand)]
enum CartCommand {
    /// Add a product by catalog id
    AddProduct {
        /// Product id
        id: i32,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Extra id to attach (repeatable)
        #[arg(long = "extra", value_name = "ID")]
        extras: Vec<i32>,
    },
    /// Book an experience by catalog id
    AddExperience {
        /// Experience id
        id: i32,

        /// Booking date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// Number of guests
        #[arg(short, long, default_value_t = 1)]
        guests: u32,

        /// Extra id to attach (repeatable)
        #[arg(long = "extra", value_name = "ID")]
        extras: Vec<i32>,
    },
    /// Book a room stay by catalog id
    AddRoom {
        /// Room id
        id: i32,

        /// Check-in date (YYYY-MM-DD)
        #[arg(long)]
        check_in: NaiveDate,

        /// Check-out date (YYYY-MM-DD)
        #[arg(long)]
        check_out: NaiveDate,

        /// Extra id to attach (repeatable)
        #[arg(long = "extra", value_name = "ID")]
        extras: Vec<i32>,
    },
    /// Print cart lines with per-line subtotals
    List,
    /// Change a line's quantity (0 removes the line)
    Update {
        /// Cart line id (see `cart list`)
        #[arg(short, long)]
        line: u64,

        /// New quantity
        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove a line from the cart
    Remove {
        /// Cart line id (see `cart list`)
        #[arg(short, long)]
        line: u64,
    },
    /// Empty the cart
    Clear,
    /// Print the cart total
    Total,
}

#[derive(Subcommand)]
enum QuoteCommand {
    /// Submit the current cart as a quote request
    Save,
    /// List saved quotes and their statuses
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut session = Session::open()?;
    let result = dispatch(cli, &mut session).await;
    // Drain the mirror even when the command failed; a mutation may
    // already be in flight.
    session.finish().await;
    result
}

async fn dispatch(cli: Cli, session: &mut Session) -> Result<(), CliError> {
    match cli.command {
        Commands::Login { email, password } => {
            commands::account::login(session, &email, &password).await?;
        }
        Commands::Register {
            email,
            password,
            name,
        } => {
            commands::account::register(session, &email, &password, name.as_deref()).await?;
        }
        Commands::Logout => commands::account::logout(session)?,
        Commands::Profile => commands::account::profile(session).await?,
        Commands::Catalog { section } => match section {
            CatalogSection::Products => commands::catalog::products(&session.client).await?,
            CatalogSection::Experiences => commands::catalog::experiences(&session.client).await?,
            CatalogSection::Rooms => commands::catalog::rooms(&session.client).await?,
            CatalogSection::Extras => commands::catalog::extras(&session.client).await?,
        },
        Commands::Cart { action } => match action {
            CartCommand::AddProduct {
                id,
                quantity,
                extras,
            } => commands::cart::add_product(session, id, quantity, &extras).await?,
            CartCommand::AddExperience {
                id,
                date,
                guests,
                extras,
            } => commands::cart::add_experience(session, id, date, guests, &extras).await?,
            CartCommand::AddRoom {
                id,
                check_in,
                check_out,
                extras,
            } => commands::cart::add_room(session, id, check_in, check_out, &extras).await?,
            CartCommand::List => commands::cart::list(session),
            CartCommand::Update { line, quantity } => {
                commands::cart::update(session, line, quantity)?;
            }
            CartCommand::Remove { line } => commands::cart::remove(session, line)?,
            CartCommand::Clear => commands::cart::clear(session)?,
            CartCommand::Total => commands::cart::total(session),
        },
        Commands::Checkout { method } => commands::checkout::checkout(session, &method).await?,
        Commands::Orders => commands::checkout::orders(session).await?,
        Commands::Quote { action } => match action {
            QuoteCommand::Save => commands::checkout::quote_save(session).await?,
            QuoteCommand::List => commands::checkout::quote_list(session).await?,
        },
    }
    Ok(())
}
