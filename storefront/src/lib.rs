//! Storefront pricing server
//!
//! Persists quantity-tiered price sets and serves quotes over HTTP. The
//! pricing rules themselves live in `shared::pricing`; this crate adds
//! storage, storage-side guards and the API.
//!
//! ```text
//! storefront/src/
//! ├── core/       # config, state, HTTP server
//! ├── db/         # SQLite pool, migrations, repositories
//! ├── services/   # pricing service (timeouts, mode changes)
//! ├── api/        # HTTP routes and handlers
//! └── utils/      # error re-exports, logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, then initialize logging from `LOG_LEVEL` / `LOG_DIR`
pub fn setup_environment() {
    // A missing .env is normal outside development
    let _ = dotenv::dotenv();

    let level = std::env::var("LOG_LEVEL").ok();
    let dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(level.as_deref(), dir.as_deref());
}
