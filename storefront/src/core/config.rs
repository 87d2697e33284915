use std::path::PathBuf;
use std::time::Duration;

use shared::pricing::TierPolicy;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | working directory (database, logs) |
/// | DATABASE_PATH | {WORK_DIR}/storefront.db | SQLite file |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development / staging / production |
/// | STORE_TIMEOUT_MS | 5000 | timeout for one storage call |
/// | TIER_REQUIRE_START_AT_ONE | false | lowest tier must start at 1 |
/// | TIER_REQUIRE_CONTIGUOUS | false | tiers may not leave quantity gaps |
/// | LOG_LEVEL | info | log level |
/// | LOG_DIR | (unset) | daily rolling log directory |
///
/// ```ignore
/// WORK_DIR=/srv/storefront HTTP_PORT=8080 cargo run -p storefront
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub database_path: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub store_timeout_ms: u64,
    pub tier_policy: TierPolicy,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("storefront.db")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            database_path,
            work_dir,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            store_timeout_ms: std::env::var("STORE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            tier_policy: TierPolicy {
                require_start_at_one: env_flag("TIER_REQUIRE_START_AT_ONE"),
                require_contiguous: env_flag("TIER_REQUIRE_CONTIGUOUS"),
            },
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Config rooted at `work_dir`, everything else default.
    ///
    /// Used by tests; ignores the process environment.
    pub fn for_work_dir(work_dir: impl Into<String>) -> Self {
        let work_dir = work_dir.into();
        Self {
            database_path: PathBuf::from(&work_dir)
                .join("storefront.db")
                .to_string_lossy()
                .into_owned(),
            work_dir,
            http_port: 3000,
            environment: "development".into(),
            store_timeout_ms: 5000,
            tier_policy: TierPolicy::relaxed(),
            log_level: "info".into(),
            log_dir: None,
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
