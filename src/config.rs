use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Postgres URL from `DATABASE_URL`. Without one the server runs on the in-memory store.
    pub database_url: Option<String>,
    /// Only its presence is ever reported.
    pub jwt_secret: Option<String>,
    pub port: u16,
    pub db_max_connections: u32,
    /// Sustained requests per second per client IP.
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let config = Self {
            database_url: validate_database_url(var("DATABASE_URL"))?,
            jwt_secret: var("JWT_SECRET").filter(|s| !s.trim().is_empty()),
            port: var("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a positive number"))?,
            rate_limit_per_second: var("RATE_LIMIT_PER_SECOND")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("RATE_LIMIT_PER_SECOND must be a positive number"))?,
            rate_limit_burst: var("RATE_LIMIT_BURST")
                .unwrap_or_else(|| "20".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("RATE_LIMIT_BURST must be a positive number"))?,
        };

        if config.rate_limit_per_second == 0 || config.rate_limit_burst == 0 {
            anyhow::bail!("Rate limits must be greater than zero");
        }

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        match config.database_url {
            Some(ref url) => tracing::debug!(
                "Database URL: {}...",
                url.chars().take(20).collect::<String>()
            ),
            None => tracing::debug!("Database URL: not set"),
        }
        tracing::debug!("JWT secret configured: {}", config.jwt_secret.is_some());
        tracing::debug!("Server Port: {}", config.port);
        tracing::debug!(
            "Rate limit: {} req/s, burst {}",
            config.rate_limit_per_second,
            config.rate_limit_burst
        );

        Ok(config)
    }

    pub fn has_jwt_secret(&self) -> bool {
        self.jwt_secret.is_some()
    }

    pub fn has_database_url(&self) -> bool {
        self.database_url.is_some()
    }
}

/// Treats a blank URL as unset and rejects non-Postgres schemes.
fn validate_database_url(url: Option<String>) -> anyhow::Result<Option<String>> {
    let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
        return Ok(None);
    };
    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
        anyhow::bail!("DATABASE_URL must start with postgresql:// or postgres://");
    }
    Ok(Some(url))
}
