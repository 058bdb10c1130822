use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use onekaday_core::constants::{DEFAULT_PAGE_SIZE, DEFAULT_TOP_SOURCES};
use rand::{rngs::OsRng, RngCore};

use crate::auth::decode_secret_key;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_DB_PATH: &str = "./db/onekaday.db";

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    /// HS256 signing key, always 32 bytes.
    pub secret_key: Vec<u8>,
    pub session_ttl: Duration,
    pub remember_ttl: Duration,
    pub cookie_secure: bool,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub page_size: i64,
    /// Number of sources ranked in reports.
    pub top_sources: usize,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = env_or("OKD_LISTEN_ADDR", DEFAULT_LISTEN_ADDR)
            .parse()
            .context("Invalid OKD_LISTEN_ADDR")?;
        let db_path = std::env::var("OKD_DB_PATH")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .unwrap_or_else(|_| DEFAULT_DB_PATH.into());

        let secret_key = match std::env::var("OKD_SECRET_KEY") {
            Ok(raw) => decode_secret_key(&raw).context("Invalid OKD_SECRET_KEY")?,
            Err(_) => {
                tracing::warn!(
                    "OKD_SECRET_KEY is not set; sessions will not survive a restart"
                );
                let mut bytes = vec![0u8; 32];
                OsRng.fill_bytes(&mut bytes);
                bytes
            }
        };

        let cors_allow = env_or("OKD_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let page_size: i64 = env_parse("OKD_PAGE_SIZE", DEFAULT_PAGE_SIZE);
        if page_size <= 0 {
            anyhow::bail!("OKD_PAGE_SIZE must be positive");
        }
        let top_sources: usize = env_parse("OKD_TOP_SOURCES", DEFAULT_TOP_SOURCES);
        if top_sources == 0 {
            anyhow::bail!("OKD_TOP_SOURCES must be positive");
        }

        Ok(Self {
            listen_addr,
            db_path,
            secret_key,
            session_ttl: Duration::from_secs(env_parse("OKD_SESSION_TTL_HOURS", 12u64) * 3600),
            remember_ttl: Duration::from_secs(env_parse("OKD_REMEMBER_DAYS", 30u64) * 86_400),
            cookie_secure: env_parse("OKD_COOKIE_SECURE", false),
            cors_allow,
            request_timeout: Duration::from_millis(env_parse("OKD_REQUEST_TIMEOUT_MS", 30_000u64)),
            page_size,
            top_sources,
        })
    }
}
