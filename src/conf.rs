use crate::{Error, Result};
use std::env;

// Dev origins for the desktop counter app and the mobile owner app previews
const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:8081",
    "http://localhost:4173",
    "http://localhost:3000",
    "http://localhost:8080",
];

#[derive(Clone)]
pub struct Conf {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub app_name: String,
    pub app_version: String,
    pub debug: bool,
    pub db_pool_size: usize,
}

impl Conf {
    pub fn from_env() -> Result<Conf> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| Error::Generic("DATABASE_URL environment variable is not set".into()))?;
        Ok(Conf {
            database_url,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: match env::var("PORT") {
                Ok(port) => port
                    .parse()
                    .map_err(|_| Error::Generic(format!("Invalid PORT: {port}")))?,
                Err(_) => 8000,
            },
            allowed_origins: parse_origins(env::var("ALLOWED_ORIGINS").ok().as_deref()),
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "Hotel Summary API".into()),
            app_version: env::var("APP_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").into()),
            debug: env::var("DEBUG")
                .map(|it| it.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            db_pool_size: match env::var("DB_POOL_SIZE") {
                Ok(size) => size
                    .parse()
                    .map_err(|_| Error::Generic(format!("Invalid DB_POOL_SIZE: {size}")))?,
                Err(_) => default_pool_size(),
            },
        })
    }
}

fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() * 2)
        .unwrap_or(8)
}

fn parse_origins(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => raw
            .split(',')
            .map(str::trim)
            .filter(|it| !it.is_empty())
            .map(Into::into)
            .collect(),
        _ => DEFAULT_ALLOWED_ORIGINS.iter().map(|it| (*it).into()).collect(),
    }
}
