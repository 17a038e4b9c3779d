use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),
    #[error("{var} has an invalid value: {value}")]
    InvalidVar { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("development") => AppEnv::Development,
            _ => AppEnv::Production,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppEnv::Development => "development",
            AppEnv::Production => "production",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalAuth {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub app_env: AppEnv,
    pub store_backend: StoreBackend,
    pub mongodb_uri: Option<String>,
    pub internal_auth: Option<InternalAuth>,
}

impl AppConfig {
    /// Reads the process environment, after `.env` has been loaded by dotenvy.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store_backend = match var("STORE_BACKEND") {
            None => StoreBackend::MongoDb,
            Some(v) if v.eq_ignore_ascii_case("mongodb") => StoreBackend::MongoDb,
            Some(v) if v.eq_ignore_ascii_case("memory") => StoreBackend::Memory,
            Some(value) => {
                return Err(ConfigError::InvalidVar {
                    var: "STORE_BACKEND",
                    value,
                })
            }
        };

        let mongodb_uri = var("MONGODB_URI");
        if store_backend == StoreBackend::MongoDb && mongodb_uri.is_none() {
            return Err(ConfigError::MissingVar("MONGODB_URI"));
        }

        let bind_address = match (var("BIND_ADDRESS"), var("PORT")) {
            (Some(addr), _) => addr,
            (None, Some(port)) => {
                let port: u16 = port.trim().parse().map_err(|_| ConfigError::InvalidVar {
                    var: "PORT",
                    value: port.clone(),
                })?;
                format!("0.0.0.0:{port}")
            }
            (None, None) => DEFAULT_BIND_ADDRESS.to_string(),
        };

        let internal_auth = match (var("INTERNAL_API_USERNAME"), var("INTERNAL_API_PASSWORD")) {
            (Some(username), Some(password)) => Some(InternalAuth { username, password }),
            _ => None,
        };

        Ok(Self {
            bind_address,
            app_env: AppEnv::parse(var("APP_ENV").as_deref()),
            store_backend,
            mongodb_uri,
            internal_auth,
        })
    }

    pub fn mongodb_configured(&self) -> bool {
        self.mongodb_uri.is_some()
    }
}
