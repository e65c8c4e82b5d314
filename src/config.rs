use dotenvy::dotenv;
use crate::errors::{Result, ResultExt};
use std::env;

const DEFAULT_POOL_SIZE: u32 = 8;

/// Settings the service needs beyond what Rocket's own figment provides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub pool_size: u32,
    pub bcrypt_cost: u32,
    /// Key for the private session cookie. When absent Rocket falls back to
    /// `ROCKET_SECRET_KEY` / `Rocket.toml`.
    pub secret_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<AppConfig> {
        dotenv().ok();
        let database_url = env::var("DATABASE_URL").chain_err(|| "DATABASE_URL must be set")?;

        let pool_size = match env::var("DATABASE_POOL_SIZE") {
            Ok(size) => size
                .parse::<u32>()
                .chain_err(|| format!("invalid DATABASE_POOL_SIZE: {}", size))?,
            Err(_) => DEFAULT_POOL_SIZE,
        };

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(cost) => cost
                .parse::<u32>()
                .chain_err(|| format!("invalid BCRYPT_COST: {}", cost))?,
            Err(_) => bcrypt::DEFAULT_COST,
        };

        Ok(AppConfig {
            database_url,
            pool_size,
            bcrypt_cost,
            secret_key: env::var("SECRET_KEY").ok(),
        })
    }
}
