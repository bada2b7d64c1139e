//! Gatepass - event ticketing marketplace backend
//!
//! # Architecture
//!
//! - **Database** (`db`): embedded SurrealDB store with per-entity
//!   repositories and sequence-generated integer ids
//! - **Auth** (`auth`): JWT + Argon2, role-tagged identities
//! - **Ticketing** (`ticketing`): checkout, atomic inventory decrement,
//!   ticket materialization, money arithmetic
//! - **Analytics** (`analytics`): on-demand sales rollups over completed
//!   orders
//! - **HTTP API** (`api`): axum routers, one module per resource
//!
//! # Module layout
//!
//! ```text
//! src/
//! ├── core/        # configuration, state, server
//! ├── auth/        # JWT, passwords, middleware
//! ├── db/          # models, repositories, sequences
//! ├── ticketing/   # issuance manager, money helpers
//! ├── analytics/   # sales aggregation
//! ├── api/         # HTTP routes and handlers
//! └── utils/       # errors, logging, validation, time
//! ```

pub mod analytics;
pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod ticketing;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use ticketing::IssuanceManager;
pub use utils::{AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ______      __
  / ____/___ _/ /____  ____  ____ ___________
 / / __/ __ `/ __/ _ \/ __ \/ __ `/ ___/ ___/
/ /_/ / /_/ / /_/  __/ /_/ / /_/ (__  |__  )
\____/\__,_/\__/\___/ .___/\__,_/____/____/
                   /_/
    "#
    );
}
