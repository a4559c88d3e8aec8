use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

const DEFAULT_JWT_SECRET: &str = "change-me-development-secret";

/// 常用环境变量到配置键的快捷映射
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("JWT_SECRET", "jwt.secret"),
    ("DATABASE_URL", "database.url"),
    ("CACHE_TYPE", "cache.type"),
    ("REDIS_URL", "cache.redis.url"),
    ("REDIS_KEY_PREFIX", "cache.redis.key_prefix"),
];

impl AppConfig {
    /// 加载配置：config.toml -> config.{APP_ENV}.toml -> EVALSYS_* -> 快捷环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{environment}")).required(false))
            .add_source(
                Environment::with_prefix("EVALSYS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        app_config.validate()?;
        Ok(app_config)
    }

    /// 校验配置项之间的约束
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: String| Err(ConfigError::Message(msg));

        if self.jwt.secret.is_empty() {
            return fail("jwt.secret must not be empty".to_string());
        }
        if self.is_production() && self.jwt.secret == DEFAULT_JWT_SECRET {
            return fail("jwt.secret must be overridden in production".to_string());
        }
        if self.database.pool_size == 0 {
            return fail("database.pool_size must be at least 1".to_string());
        }
        let eval = &self.evaluation;
        if !(eval.rating_min.is_finite() && eval.rating_max.is_finite())
            || eval.rating_min >= eval.rating_max
        {
            return fail(format!(
                "evaluation.rating_min ({}) must be lower than evaluation.rating_max ({})",
                eval.rating_min, eval.rating_max
            ));
        }
        if !(1..=100).contains(&eval.top_faculty_default_limit) {
            return fail(format!(
                "evaluation.top_faculty_default_limit ({}) must be within 1..=100",
                eval.top_faculty_default_limit
            ));
        }
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        let mut config = AppConfig::default();
        config.jwt.secret = "test-secret".to_string();
        config
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(valid().validate().is_ok());
        // 缺少密钥
        assert!(AppConfig::default().validate().is_err());
    }

    #[test]
    fn test_rating_range_must_be_ordered() {
        let mut config = valid();
        config.evaluation.rating_min = 5.0;
        config.evaluation.rating_max = 5.0;
        assert!(config.validate().is_err());

        config.evaluation.rating_max = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_rejects_default_secret() {
        let mut config = valid();
        config.app.environment = "production".to_string();
        config.jwt.secret = DEFAULT_JWT_SECRET.to_string();
        assert!(config.validate().is_err());

        config.jwt.secret = "a-real-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_top_faculty_default_limit_bounds() {
        let mut config = valid();
        config.evaluation.top_faculty_default_limit = 0;
        assert!(config.validate().is_err());
        config.evaluation.top_faculty_default_limit = 101;
        assert!(config.validate().is_err());
    }
}
