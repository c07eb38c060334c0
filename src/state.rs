use std::sync::Arc;

use time::{Date, OffsetDateTime};
use tracing::{info, warn};

use crate::alerts::classify;
use crate::config::AppConfig;
use crate::db;
use crate::inventory::{
    memory::MemoryInventory,
    repo::{InventoryStore, PgInventory},
};
use crate::recipes::client::{AnthropicClient, DemoGenerator, RecipeGenerator};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InventoryStore>,
    pub recipes: Arc<dyn RecipeGenerator>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let store = match &config.database_url {
            Some(url) => {
                let pool = db::connect(url).await?;
                db::run_migrations(&pool).await?;
                info!("inventory backed by postgres");
                Arc::new(PgInventory::new(pool)) as Arc<dyn InventoryStore>
            }
            None => {
                warn!("DATABASE_URL not set; inventory is kept in memory and lost on restart");
                Arc::new(MemoryInventory::default()) as Arc<dyn InventoryStore>
            }
        };

        let recipes = match &config.recipe.api_key {
            Some(key) => {
                info!(model = %config.recipe.model, "recipe suggestions via anthropic");
                Arc::new(AnthropicClient::new(&config.recipe, key.clone())?)
                    as Arc<dyn RecipeGenerator>
            }
            None => {
                info!("ANTHROPIC_API_KEY not set; serving demo recipes");
                Arc::new(DemoGenerator) as Arc<dyn RecipeGenerator>
            }
        };

        Ok(Self::from_parts(store, recipes, config))
    }

    pub fn from_parts(
        store: Arc<dyn InventoryStore>,
        recipes: Arc<dyn RecipeGenerator>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            store,
            recipes,
            config,
        }
    }

    /// Current calendar date in the configured offset.
    pub fn today(&self) -> Date {
        classify::today(OffsetDateTime::now_utc(), self.config.utc_offset)
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::RecipeConfig;

        let config = Arc::new(AppConfig {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 0,
            utc_offset: time::UtcOffset::UTC,
            allowed_origins: Vec::new(),
            recipe: RecipeConfig {
                api_key: None,
                base_url: "http://fake.local".into(),
                model: "fake".into(),
                max_tokens: 16,
                timeout_secs: 1,
            },
        });

        Self::from_parts(
            Arc::new(MemoryInventory::default()),
            Arc::new(DemoGenerator),
            config,
        )
    }
}
