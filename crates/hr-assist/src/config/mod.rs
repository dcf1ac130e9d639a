use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub data: DataConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            data: DataConfig::from_env()?,
            engine: EngineConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location of the flat workforce tables and the seed for synthetic rows.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub seed: Option<u64>,
}

impl DataConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let dir = env::var("HR_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        let seed = match env::var("HR_DATA_SEED") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed)?,
            ),
            _ => None,
        };

        Ok(Self { dir, seed })
    }
}

/// Which reasoning engine answers free-text requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineProvider {
    /// Offline keyword routing; no network access.
    Keyword,
    /// Any OpenAI-compatible chat completions endpoint.
    OpenAiCompat,
}

pub const DEFAULT_ENGINE_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_ENGINE_MODEL: &str = "gemini-2.5-flash-lite";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub provider: EngineProvider,
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    pub max_steps: usize,
}

impl EngineConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("HR_ENGINE_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        let provider = match env::var("HR_ENGINE") {
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "keyword" | "offline" => EngineProvider::Keyword,
                "openai" | "openai-compat" | "gemini" => EngineProvider::OpenAiCompat,
                _ => return Err(ConfigError::InvalidEngine(raw)),
            },
            Err(_) if api_key.is_some() => EngineProvider::OpenAiCompat,
            Err(_) => EngineProvider::Keyword,
        };

        if provider == EngineProvider::OpenAiCompat && api_key.is_none() {
            return Err(ConfigError::MissingApiKey);
        }

        let base_url = env::var("HR_ENGINE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_ENGINE_BASE_URL.to_string());
        let model =
            env::var("HR_ENGINE_MODEL").unwrap_or_else(|_| DEFAULT_ENGINE_MODEL.to_string());
        let timeout_secs = env::var("HR_ENGINE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;
        let max_steps = env::var("HR_ENGINE_MAX_STEPS")
            .unwrap_or_else(|_| "6".to_string())
            .parse::<usize>()
            .ok()
            .filter(|steps| *steps > 0)
            .ok_or(ConfigError::InvalidMaxSteps)?;

        Ok(Self {
            provider,
            base_url,
            api_key,
            model,
            timeout: Duration::from_secs(timeout_secs),
            max_steps,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSeed,
    InvalidEngine(String),
    MissingApiKey,
    InvalidTimeout,
    InvalidMaxSteps,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSeed => write!(f, "HR_DATA_SEED must be a valid u64"),
            ConfigError::InvalidEngine(value) => {
                write!(f, "HR_ENGINE '{value}' is not one of: keyword, openai")
            }
            ConfigError::MissingApiKey => write!(
                f,
                "HR_ENGINE_API_KEY (or GOOGLE_API_KEY) is required for the openai engine"
            ),
            ConfigError::InvalidTimeout => {
                write!(f, "HR_ENGINE_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::InvalidMaxSteps => {
                write!(f, "HR_ENGINE_MAX_STEPS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
