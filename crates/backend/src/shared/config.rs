use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable holding the token signing secret
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Known weak default used when `JWT_SECRET` is not set.
/// Anyone who knows this literal can mint tokens for any role.
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory with the built UI shell
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub token_lifetime_hours: i64,
    #[serde(default)]
    pub cookie_secure: bool,
}

/// Nothing but `/api`, `/auth`, `/login` and `/signup` skips the token check
/// unless asset prefixes are listed here.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct GateConfig {
    /// Static asset prefixes served without a token (login page needs them)
    #[serde(default)]
    pub asset_prefixes: Vec<String>,
}

/// Demo account accepted by the login endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct AccountConfig {
    pub id: i64,
    pub username: String,
    pub role: i64,
    /// Argon2 PHC string
    pub password_hash: String,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000
static_dir = "dist"

[auth]
token_lifetime_hours = 24
cookie_secure = false
"#;

/// Where the signing secret came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    Environment,
    Fallback,
}

/// Token signing secret, resolved once at startup
#[derive(Clone)]
pub struct JwtSecret {
    value: String,
    source: SecretSource,
}

impl JwtSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: SecretSource::Environment,
        }
    }

    /// Empty or missing values fall back to [`DEFAULT_JWT_SECRET`]
    pub fn resolve(env_value: Option<String>) -> Self {
        match env_value {
            Some(value) if !value.is_empty() => Self::new(value),
            _ => Self {
                value: DEFAULT_JWT_SECRET.to_string(),
                source: SecretSource::Fallback,
            },
        }
    }

    pub fn from_env() -> Self {
        let secret = Self::resolve(std::env::var(JWT_SECRET_ENV).ok());
        if secret.source() == SecretSource::Fallback {
            tracing::warn!(
                "{} is not set, using the built-in default secret. Tokens can be forged by anyone who knows it",
                JWT_SECRET_ENV
            );
        }
        secret
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }

    pub fn source(&self) -> SecretSource {
        self.source
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSecret")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)
                    .with_context(|| format!("Cannot read {}", config_path.display()))?;
                return parse_config(&contents)
                    .with_context(|| format!("Invalid config {}", config_path.display()));
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.auth.token_lifetime_hours <= 0 {
        anyhow::bail!("auth.token_lifetime_hours must be positive");
    }
    Ok(config)
}

/// Resolve the static UI directory.
/// Relative paths are resolved relative to the executable directory
pub fn get_static_dir(config: &Config) -> PathBuf {
    let dir = Path::new(&config.server.static_dir);

    if dir.is_absolute() {
        return dir.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(dir);
        }
    }

    PathBuf::from(&config.server.static_dir)
}
