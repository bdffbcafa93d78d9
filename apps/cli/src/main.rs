//! # StockMaster CLI
//!
//! Terminal front-end for the StockMaster inventory ledger.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CLI Invocation                                  │
//! │                                                                         │
//! │  stockmaster <cmd> ──► SessionManager ──► LedgerEngine ──► stdout      │
//! │                             │                  │                        │
//! │                        LocalStore         RemoteStore                  │
//! │                        (documents)        (JSON-over-HTTP)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Listing commands read the local mirror only; `sync` reconciles with the
//! backend; stock movements commit locally first and report the push outcome
//! afterwards. The binary never blocks a sale on the network.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use stockmaster_core::{Cart, Category, Money, MovementKind};
use stockmaster_store::LocalStore;
use stockmaster_sync::{DbStatus, HttpRemoteStore, LedgerEngine, SessionManager};

// =============================================================================
// Command Line
// =============================================================================

#[derive(Parser)]
#[command(name = "stockmaster", about = "Inventory and point-of-sale ledger", version)]
struct Cli {
    /// Base URL of the backend API endpoint.
    #[arg(
        long,
        global = true,
        env = "STOCKMASTER_API_URL",
        default_value = "http://localhost:8000/api.php"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new account and sign in.
    Register {
        email: String,
        password: String,
        /// Must match the password; checked locally.
        confirm: String,
    },
    /// Sign in to an existing account.
    Login { email: String, password: String },
    /// Sign out. Locally cached inventory is kept for the next login.
    Logout,
    /// Fetch the server's inventory and replace the local mirror.
    Sync,
    /// Probe the backend and report connectivity.
    Status,
    /// List products in the local mirror.
    Inventory,
    /// Create a product (falls back to a local record when offline).
    AddProduct {
        sku: String,
        name: String,
        /// electronics | clothing | food | office | others
        #[arg(long, default_value = "others")]
        category: String,
        /// Unit price in paise.
        #[arg(long)]
        price_cents: i64,
        /// Opening stock.
        #[arg(long, default_value_t = 0)]
        stock: i64,
        /// Low-stock threshold.
        #[arg(long, default_value_t = stockmaster_core::DEFAULT_MIN_STOCK_LEVEL)]
        min_stock: i64,
        #[arg(long, default_value = "")]
        supplier: String,
        /// Expiry date, YYYY-MM-DD.
        #[arg(long)]
        expiry: Option<String>,
    },
    /// Record received stock for a SKU.
    StockIn { sku: String, quantity: i64 },
    /// Sell one or more lines, e.g. `sell SKU-1=2 SKU-9=1`.
    Sell {
        /// SKU=QUANTITY pairs, committed in the order given.
        lines: Vec<String>,
    },
    /// Resolve a scanned code against the local mirror.
    Scan { code: String },
    /// List the transaction log, newest first.
    Transactions,
    /// Dashboard aggregates over the local mirror.
    Stats,
}

// =============================================================================
// Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = LocalStore::open_default()?;
    let remote = Arc::new(HttpRemoteStore::new(cli.api_url.clone()));
    let sessions = SessionManager::new(store, remote);

    match cli.command {
        Command::Register {
            email,
            password,
            confirm,
        } => {
            let engine = sessions.register(&email, &password, &confirm).await?;
            println!("Registered and signed in as {}", engine.account().email);
            sync_and_report(&engine).await;
        }
        Command::Login { email, password } => {
            let engine = sessions.login(&email, &password).await?;
            println!("Signed in as {}", engine.account().email);
            sync_and_report(&engine).await;
        }
        Command::Logout => {
            let engine = sessions.resume()?;
            sessions.sign_out(engine)?;
            println!("Signed out");
        }
        Command::Sync => {
            let engine = sessions.resume()?;
            engine.reconcile().await?;
            println!(
                "Synced: {} products, {} transactions, {} suppliers",
                engine.products().len(),
                engine.transactions().len(),
                engine.suppliers().len()
            );
        }
        Command::Status => {
            let engine = sessions.resume()?;
            let _ = engine.reconcile().await;
            println!("{}", engine.status());
        }
        Command::Inventory => {
            let engine = sessions.resume()?;
            print_inventory(&engine);
        }
        Command::AddProduct {
            sku,
            name,
            category,
            price_cents,
            stock,
            min_stock,
            supplier,
            expiry,
        } => {
            let engine = sessions.resume()?;
            let draft = stockmaster_core::NewProduct {
                sku,
                name,
                category: parse_category(&category)?,
                price_cents: Money::from_cents(price_cents),
                stock,
                min_stock_level: min_stock,
                expiry_date: expiry
                    .as_deref()
                    .map(|d| d.parse::<chrono::NaiveDate>())
                    .transpose()?,
                supplier_id: supplier,
            };
            let product = engine.add_product(draft).await?;
            println!(
                "Added {} ({}) at {} [{}]",
                product.name,
                product.sku,
                product.price_cents,
                engine.status()
            );
        }
        Command::StockIn { sku, quantity } => {
            let engine = sessions.resume()?;
            let product = engine.lookup_scanned_code(&sku)?;
            engine.apply_stock_movement(
                &product.id,
                MovementKind::In,
                quantity,
                product.price_cents,
            )?;
            let status = wait_for_push(&engine).await;
            let updated = engine
                .product(&product.id)
                .map(|p| p.stock)
                .unwrap_or_default();
            println!("{}: stock now {} [{}]", product.name, updated, status);
        }
        Command::Sell { lines } => {
            let engine = sessions.resume()?;
            if lines.is_empty() {
                return Err("nothing to sell: pass SKU=QUANTITY lines".into());
            }

            let mut cart = Cart::new();
            for entry in &lines {
                let (sku, quantity) = parse_sale_line(entry)?;
                let product = engine.lookup_scanned_code(sku)?;
                cart.add_line(&product)?;
                for _ in 1..quantity {
                    cart.increment_line(&product.id, product.stock)?;
                }
            }

            let receipt = engine.finalize_sale(&mut cart).await?;
            for line in &receipt.lines {
                println!(
                    "  {} x{} @ {} = {}",
                    line.name,
                    line.quantity,
                    line.unit_price_cents,
                    line.line_total_cents()
                );
            }
            println!("Total: {} [{}]", receipt.subtotal_cents, engine.status());
        }
        Command::Scan { code } => {
            let engine = sessions.resume()?;
            let product = engine.lookup_scanned_code(&code)?;
            println!(
                "{} ({}) - {} in stock at {}",
                product.name, product.sku, product.stock, product.price_cents
            );
        }
        Command::Transactions => {
            let engine = sessions.resume()?;
            for txn in engine.transactions() {
                println!(
                    "{}  {:>3} {:>4}  {} = {}",
                    txn.timestamp.format("%Y-%m-%d %H:%M"),
                    txn.kind,
                    txn.quantity,
                    txn.unit_price_cents,
                    txn.total_cents()
                );
            }
        }
        Command::Stats => {
            let engine = sessions.resume()?;
            let stats = engine.dashboard_stats();
            println!("Products:     {}", stats.total_products);
            println!("Stock value:  {}", stats.total_stock_value);
            println!("Low stock:    {}", stats.low_stock_items);
            println!("Revenue:      {}", stats.total_revenue);
        }
    }

    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

/// Runs the post-login reconciliation, reporting but not failing on errors:
/// a signed-in terminal with stale local data beats a failed login.
async fn sync_and_report(engine: &LedgerEngine) {
    match engine.reconcile().await {
        Ok(()) => println!("Inventory synced ({} products)", engine.products().len()),
        Err(e) => eprintln!("warning: could not sync, using local data ({e})"),
    }
}

/// Waits for a detached push to settle the status lamp.
async fn wait_for_push(engine: &LedgerEngine) -> DbStatus {
    let mut rx = engine.status_tracker().subscribe();
    loop {
        let status = *rx.borrow_and_update();
        if status != DbStatus::Syncing {
            return status;
        }
        if rx.changed().await.is_err() {
            return engine.status();
        }
    }
}

fn print_inventory(engine: &LedgerEngine) {
    for product in engine.products() {
        let marker = if product.low_stock() { "  LOW" } else { "" };
        println!(
            "{:<12} {:<30} {:>6}  {}{}",
            product.sku, product.name, product.stock, product.price_cents, marker
        );
    }
}

fn parse_category(s: &str) -> Result<Category, String> {
    match s.to_ascii_lowercase().as_str() {
        "electronics" => Ok(Category::Electronics),
        "clothing" => Ok(Category::Clothing),
        "food" => Ok(Category::Food),
        "office" => Ok(Category::Office),
        "others" => Ok(Category::Others),
        other => Err(format!("unknown category '{other}'")),
    }
}

/// Parses a `SKU=QUANTITY` sale line; a bare `SKU` means quantity 1.
fn parse_sale_line(entry: &str) -> Result<(&str, i64), String> {
    match entry.split_once('=') {
        None => Ok((entry, 1)),
        Some((sku, qty)) => {
            let quantity: i64 = qty
                .parse()
                .map_err(|_| format!("bad quantity in '{entry}'"))?;
            if quantity < 1 {
                return Err(format!("quantity must be at least 1 in '{entry}'"));
            }
            debug!(sku, quantity, "Parsed sale line");
            Ok((sku, quantity))
        }
    }
}
