use crate::core::Config;
use crate::db::DbService;
use crate::services::PricingService;
use crate::utils::AppResult;

/// State shared by every handler
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub pricing: PricingService,
}

impl ServerState {
    pub fn new(config: Config, db: DbService) -> Self {
        let pricing = PricingService::new(
            db.pool.clone(),
            config.tier_policy,
            config.store_timeout(),
        );
        Self {
            config,
            db,
            pricing,
        }
    }

    /// Open the database (creating the work dir if needed) and build the state
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            crate::utils::AppError::internal(format!(
                "Failed to create work dir {}: {e}",
                config.work_dir
            ))
        })?;
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::new(config.clone(), db))
    }
}
