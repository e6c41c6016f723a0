use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("STORAGE_BACKEND").as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => anyhow::bail!("STORAGE_BACKEND must be `postgres` or `memory`, got `{other}`"),
        };

        let database_url = lookup("DATABASE_URL");
        if backend == StorageBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL is required for the postgres backend");
        }

        let port = lookup("APP_PORT")
            .or_else(|| lookup("PORT"))
            .map(|v| v.parse::<u16>().with_context(|| format!("invalid APP_PORT `{v}`")))
            .transpose()?
            .unwrap_or(5001);

        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .map(|v| {
                v.parse::<u32>()
                    .with_context(|| format!("invalid DB_MAX_CONNECTIONS `{v}`"))
            })
            .transpose()?
            .unwrap_or(10);

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .context("JWT_SECRET is required")?;

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            backend,
            database_url,
            db_max_connections,
            jwt_secret,
            cors_origin: lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".into()),
        })
    }
}
