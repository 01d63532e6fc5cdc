use anyhow::{Context, Result, anyhow};
use std::str::FromStr;

const DEFAULT_OTEL_ENDPOINT: &str = "http://otel-collector:4317";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub grpc_port: u16,
    pub metric_port: u16,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    pub db_min_conn: u32,
    pub db_max_conn: u32,
    pub product: ServiceConfig,
    pub otel_endpoint: String,
    pub is_dev: bool,
    pub enable_file_log: bool,
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `init` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).with_context(|| format!("Missing environment variable: {key}"))
        };

        let database_url = required("DATABASE_URL")?;

        let run_migrations = parse_bool("RUN_MIGRATIONS", &required("RUN_MIGRATIONS")?)?;

        // product
        let product_grpc_port =
            parse_number::<u16>("PRODUCT_GRPC_PORT", &required("PRODUCT_GRPC_PORT")?)?;
        let product_metric_port =
            parse_number::<u16>("PRODUCT_METRIC_PORT", &required("PRODUCT_METRIC_PORT")?)?;

        let db_min_conn = match lookup("DB_MIN_CONN") {
            Some(raw) => parse_number::<u32>("DB_MIN_CONN", &raw)?,
            None => 1,
        };
        let db_max_conn = match lookup("DB_MAX_CONN") {
            Some(raw) => parse_number::<u32>("DB_MAX_CONN", &raw)?,
            None => 5,
        };

        if db_min_conn > db_max_conn {
            return Err(anyhow!(
                "DB_MIN_CONN ({db_min_conn}) must not exceed DB_MAX_CONN ({db_max_conn})"
            ));
        }

        let otel_endpoint =
            lookup("OTEL_ENDPOINT").unwrap_or_else(|| DEFAULT_OTEL_ENDPOINT.to_string());

        let flag = |key: &str| {
            lookup(key)
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false)
        };

        Ok(Self {
            database_url,
            run_migrations,
            db_min_conn,
            db_max_conn,
            product: ServiceConfig {
                grpc_port: product_grpc_port,
                metric_port: product_metric_port,
            },
            otel_endpoint,
            is_dev: flag("DEV_MODE"),
            enable_file_log: flag("ENABLE_FILE_LOG"),
        })
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(anyhow!("{key} must be 'true' or 'false', got '{other}'")),
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/products"),
        ("RUN_MIGRATIONS", "true"),
        ("PRODUCT_GRPC_PORT", "50053"),
        ("PRODUCT_METRIC_PORT", "8083"),
    ];

    #[test]
    fn loads_required_values_and_defaults() {
        let config = Config::from_lookup(env(BASE)).unwrap();

        assert_eq!(config.database_url, "postgres://localhost/products");
        assert!(config.run_migrations);
        assert_eq!(config.product.grpc_port, 50053);
        assert_eq!(config.product.metric_port, 8083);
        assert_eq!((config.db_min_conn, config.db_max_conn), (1, 5));
        assert_eq!(config.otel_endpoint, DEFAULT_OTEL_ENDPOINT);
        assert!(!config.is_dev);
    }

    #[test]
    fn missing_database_url_is_reported() {
        let pairs: Vec<_> = BASE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "DATABASE_URL")
            .collect();

        let err = Config::from_lookup(env(&pairs)).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn run_migrations_must_be_boolean() {
        let mut pairs = BASE.to_vec();
        pairs[1] = ("RUN_MIGRATIONS", "yes");

        let err = Config::from_lookup(env(&pairs)).unwrap_err();
        assert!(err.to_string().contains("RUN_MIGRATIONS"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut pairs = BASE.to_vec();
        pairs[2] = ("PRODUCT_GRPC_PORT", "70000");

        assert!(Config::from_lookup(env(&pairs)).is_err());
    }

    #[test]
    fn pool_bounds_are_checked() {
        let mut pairs = BASE.to_vec();
        pairs.push(("DB_MIN_CONN", "10"));
        pairs.push(("DB_MAX_CONN", "2"));

        assert!(Config::from_lookup(env(&pairs)).is_err());
    }

    #[test]
    fn dev_flags_accept_true_or_one() {
        let mut pairs = BASE.to_vec();
        pairs.push(("DEV_MODE", "1"));
        pairs.push(("ENABLE_FILE_LOG", "true"));

        let config = Config::from_lookup(env(&pairs)).unwrap();
        assert!(config.is_dev);
        assert!(config.enable_file_log);
    }
}
