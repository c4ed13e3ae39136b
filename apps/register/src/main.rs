//! # Tillpoint Register
//!
//! Command-line front end for the Tillpoint client.
//!
//! ```text
//! tillpoint login -u cash1 -p secret     log in, land on the role's page
//! tillpoint whoami                       show the stored session
//! tillpoint open /purchases              guarded navigation
//! tillpoint menu                         role-filtered menu
//! tillpoint catalog --search sugar       merged sellable list
//! tillpoint sell --item 10:3 --item 11   build a cart and check out
//! tillpoint logout
//! ```
//!
//! The session persists between invocations in the configured session file.

mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tillpoint_client::{ClientConfig, Shell};
use tillpoint_core::access::paths;
use tillpoint_core::validation::parse_item_spec;
use tillpoint_core::{Notice, PaymentMethod};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tillpoint")]
#[command(about = "Tillpoint point-of-sale client", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding config and environment
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    Logout,
    Whoami,
    /// Navigate to a page through the route guard
    Open { path: String },
    Menu,
    /// Show the cashier's sellable list
    Catalog {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Sell items: each --item is PRODUCT_ID[:QTY]
    Sell {
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,
        #[arg(short = 'm', long)]
        payment: Option<PaymentMethod>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = ClientConfig::load(cli.config).context("loading configuration")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate().context("checking --api-url")?;
    }
    debug!(base_url = %config.base_url(), "Configuration loaded");

    let shell = Shell::from_config(config).context("starting client")?;
    let ok = match cli.command {
        Command::Login { username, password } => login(&shell, &username, &password).await,
        Command::Logout => {
            render::show(&shell.logout().notice.unwrap_or_else(Notice::logged_out));
            true
        }
        Command::Whoami => {
            println!("{}", render::session(&shell.session()));
            true
        }
        Command::Open { path } => open(&shell, &path),
        Command::Menu => {
            print!("{}", render::menu(&shell.menu()));
            true
        }
        Command::Catalog { search } => catalog(&shell, search.as_deref()).await,
        Command::Sell { items, payment } => sell(&shell, &items, payment).await,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Log filter from `RUST_LOG`, defaulting to info with debug for our crates.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tillpoint=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn login(shell: &Shell, username: &str, password: &str) -> bool {
    match shell.login(username, password).await {
        Ok(landed) => {
            if let Some(notice) = &landed.notice {
                render::show(notice);
            }
            println!("Now at {}", landed.location);
            true
        }
        Err(notice) => {
            render::show(&notice);
            false
        }
    }
}

fn open(shell: &Shell, path: &str) -> bool {
    match shell.open(path, |route| route.title) {
        Ok(title) => {
            println!("{} ({})", title, shell.location());
            true
        }
        Err(redirect) => {
            if let Some(notice) = &redirect.notice {
                render::show(notice);
            }
            println!("Redirected to {}", redirect.location);
            false
        }
    }
}

/// Opens the cashier page; a denied session never reaches the terminal.
fn enter_cashier(shell: &Shell) -> bool {
    match shell.open(paths::CASHIER, |_| ()) {
        Ok(()) => true,
        Err(redirect) => {
            if let Some(notice) = &redirect.notice {
                render::show(notice);
            }
            eprintln!("Cashier terminal unavailable, redirected to {}", redirect.location);
            false
        }
    }
}

async fn catalog(shell: &Shell, search: Option<&str>) -> bool {
    if !enter_cashier(shell) {
        return false;
    }
    let terminal = shell.terminal();
    if let Err(notice) = terminal.load().await {
        render::show(&notice);
        return false;
    }

    let lines = terminal.search(search.unwrap_or(""));
    let refs: Vec<_> = lines.iter().collect();
    print!("{}", render::lines(&shell.config().terminal, &refs));
    true
}

async fn sell(shell: &Shell, items: &[String], payment: Option<PaymentMethod>) -> bool {
    if !enter_cashier(shell) {
        return false;
    }
    let mut terminal = shell.terminal();
    if let Some(method) = payment {
        terminal.set_payment_method(method);
    }
    if let Err(notice) = terminal.load().await {
        render::show(&notice);
        return false;
    }

    for spec in items {
        let (product_id, quantity) = match parse_item_spec(spec) {
            Ok(parsed) => parsed,
            Err(e) => {
                render::show(&Notice::from(tillpoint_core::CoreError::Validation(e)));
                return false;
            }
        };
        for _ in 0..quantity {
            if let Err(notice) = terminal.add(product_id) {
                render::show(&notice);
                return false;
            }
        }
    }

    println!("{}", render::cart(&shell.config().terminal, &terminal.cart()));
    match terminal.checkout().await {
        Ok(sale) => {
            render::show(&Notice::sale_completed());
            if let Some(id) = sale.sale_id {
                println!("Sale #{}", id);
            }
            true
        }
        Err(notice) => {
            render::show(&notice);
            false
        }
    }
}
