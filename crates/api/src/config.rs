use persistence::cache::RedisConfig as CacheRedisConfig;
use persistence::db::DatabaseConfig as PoolConfig;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub data_initializer: DataInitializerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

/// Redis settings. An empty URL disables caching.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_redis_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_redis_max_connections(),
            connect_timeout_secs: default_redis_connect_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default)]
    pub hsts_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Markup applied on top of a unit's base price, in percent.
    #[serde(default = "default_markup_percent")]
    pub markup_percent: Decimal,

    #[serde(default = "default_payment_timeout")]
    pub payment_timeout_minutes: i64,

    #[serde(default = "default_expiry_check")]
    pub expiry_check_secs: u64,

    #[serde(default = "default_completion_check")]
    pub completion_check_secs: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            markup_percent: default_markup_percent(),
            payment_timeout_minutes: default_payment_timeout(),
            expiry_check_secs: default_expiry_check(),
            completion_check_secs: default_completion_check(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,

    #[serde(default = "default_recovery_interval")]
    pub recovery_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            recovery_interval_secs: default_recovery_interval(),
        }
    }
}

/// Random units created at startup for demos and load tests.
#[derive(Debug, Clone, Deserialize)]
pub struct DataInitializerConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_number_of_units")]
    pub number_of_units: u32,

    #[serde(default = "default_cleanup_on_shutdown")]
    pub cleanup_on_shutdown: bool,
}

impl Default for DataInitializerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            number_of_units: default_number_of_units(),
            cleanup_on_shutdown: default_cleanup_on_shutdown(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_shutdown_timeout() -> u64 {
    10
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_redis_max_connections() -> u32 {
    10
}
fn default_redis_connect_timeout() -> u64 {
    2
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_markup_percent() -> Decimal {
    domain::services::DEFAULT_MARKUP_PERCENT
}
fn default_payment_timeout() -> i64 {
    15
}
fn default_expiry_check() -> u64 {
    60
}
fn default_completion_check() -> u64 {
    300
}
fn default_cache_ttl() -> u64 {
    600
}
fn default_recovery_interval() -> u64 {
    300
}
fn default_number_of_units() -> u32 {
    90
}
fn default_cleanup_on_shutdown() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with BOOKING__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("BOOKING")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Defaults are embedded so tests do not depend on the working directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 20
            min_connections = 5
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [redis]
            url = ""

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []

            [booking]
            markup_percent = 15
            payment_timeout_minutes = 15

            [cache]
            ttl_secs = 600

            [data_initializer]
            enabled = false
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "BOOKING__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.booking.markup_percent < Decimal::ZERO
            || self.booking.markup_percent > Decimal::ONE_HUNDRED
        {
            return Err(ConfigValidationError::InvalidValue(
                "booking.markup_percent must be between 0 and 100".to_string(),
            ));
        }

        if self.booking.payment_timeout_minutes <= 0 {
            return Err(ConfigValidationError::InvalidValue(
                "booking.payment_timeout_minutes must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout_secs: self.database.connect_timeout_secs,
            idle_timeout_secs: self.database.idle_timeout_secs,
        }
    }

    /// Redis settings, or `None` when caching is switched off.
    pub fn redis_config(&self) -> Option<CacheRedisConfig> {
        if self.redis.url.trim().is_empty() {
            return None;
        }
        Some(CacheRedisConfig {
            url: self.redis.url.clone(),
            max_connections: self.redis.max_connections,
            connect_timeout_secs: self.redis.connect_timeout_secs,
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn payment_timeout(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.booking.payment_timeout_minutes)
    }
}
