//! # tillpoint-client: Session, REST Gateway and Cashier Terminal
//!
//! The I/O half of Tillpoint. Holds the authenticated session, sends every
//! backend call through one gateway client, and runs the cashier terminal.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              Shell                                      │
//! │   login / logout / open(path) ──► guard ──► Navigator                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ┌──────────────┐   ┌────────────────────────────────────────────────┐  │
//! │  │ SessionStore │◄──│ ApiClient                                      │  │
//! │  │              │   │  bearer token on every request                 │  │
//! │  │ Memory/File  │   │  401 ──► clear session ──► /login              │  │
//! │  │ storage      │   └───────────────┬────────────────────────────────┘  │
//! │  └──────────────┘                   │                                   │
//! │                     ┌───────────────┴───────────────┐                   │
//! │                     ▼                               ▼                   │
//! │              services::*                     CashierTerminal            │
//! │        shops, products, stock,         join!(stock, adjustments,        │
//! │        purchasing, expenses,                 catalog) ──► merge         │
//! │        users, sales                     cart ──► checkout               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - TOML + environment configuration
//! - [`storage`] - Key/value session persistence
//! - [`session`] - The session store
//! - [`navigator`] - Current location and history
//! - [`api`] - The gateway client
//! - [`services`] - Typed REST resources
//! - [`terminal`] - Cashier terminal
//! - [`shell`] - Application shell
//! - [`error`] - Client error types
//!
//! ## Example
//! ```no_run
//! use tillpoint_client::{ClientConfig, Shell};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let shell = Shell::from_config(ClientConfig::load(None)?)?;
//! match shell.login("cash1", "secret").await {
//!     Ok(landed) => println!("now at {}", landed.location),
//!     Err(notice) => eprintln!("{}", notice),
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod navigator;
pub mod services;
pub mod session;
pub mod shell;
pub mod storage;
pub mod terminal;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use navigator::Navigator;
pub use session::SessionStore;
pub use shell::{Shell, Transition};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use terminal::{CashierTerminal, LoadOutcome, Selection};
