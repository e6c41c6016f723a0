use crate::auth::repo::{PgUserRepo, UserRepo};
use crate::config::{AppConfig, StorageBackend};
use crate::db;
use crate::faqs::repo::{FaqRepo, PgFaqRepo};
use crate::memory::MemoryStore;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub faqs: Arc<dyn FaqRepo>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        match config.backend {
            StorageBackend::Postgres => {
                let pool = db::connect(&config).await?;
                db::migrate(&pool).await?;
                Ok(Self::from_parts(
                    config,
                    Arc::new(PgUserRepo::new(pool.clone())),
                    Arc::new(PgFaqRepo::new(pool)),
                ))
            }
            StorageBackend::Memory => {
                info!("using in-memory store; data is lost on exit");
                let store = MemoryStore::new_shared();
                Ok(Self::from_parts(config, store.clone(), store))
            }
        }
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        faqs: Arc<dyn FaqRepo>,
    ) -> Self {
        Self {
            config,
            users,
            faqs,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            backend: StorageBackend::Memory,
            database_url: None,
            db_max_connections: 1,
            jwt_secret: "test".into(),
            cors_origin: "http://localhost:3000".into(),
        });
        let store = MemoryStore::new_shared();
        Self::from_parts(config, store.clone(), store)
    }
}
