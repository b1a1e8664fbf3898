use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("unknown store backend {other:?} (expected sqlite or memory)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub movies_collection: String,
    pub notify_timer: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://marquee.db?mode=rwc".to_string());

        let store_backend: StoreBackend = std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "sqlite".to_string())
            .parse()
            .context("STORE_BACKEND")?;

        let movies_collection =
            std::env::var("MOVIES_COLLECTION").unwrap_or_else(|_| "movies".to_string());

        let notify_timer_ms: u64 =
            std::env::var("NOTIFY_TIMER_MS").ok().and_then(|s| s.parse().ok()).unwrap_or(3000);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            store_backend,
            movies_collection,
            notify_timer: Duration::from_millis(notify_timer_ms),
        })
    }
}
