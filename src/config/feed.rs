// src/config/feed.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_ACCOUNT_ID: &str = "INSTAGRAM_ACCOUNT_ID";
pub const ENV_ACCESS_TOKEN: &str = "INSTAGRAM_ACCESS_TOKEN";
pub const ENV_API_BASE: &str = "FEED_API_BASE";
pub const ENV_CACHE_DIR: &str = "FEED_CACHE_DIR";
pub const ENV_CACHE_TTL_SECS: &str = "FEED_CACHE_TTL_SECS";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FEED_FETCH_TIMEOUT_SECS";
pub const ENV_DEFAULT_LIMIT: &str = "FEED_DEFAULT_LIMIT";
pub const ENV_CONFIG_PATH: &str = "FEED_CONFIG_PATH";

pub const DEFAULT_CONFIG_PATH: &str = "config/feed.toml";
pub const DEFAULT_API_BASE: &str = "https://graph.instagram.com";

/// Both halves of the remote credential pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account_id: String,
    pub access_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct FeedConfig {
    /// `None` (or blank) disables the network tier.
    pub account_id: Option<String>,
    pub access_token: Option<String>,
    pub api_base: String,
    pub cache_dir: PathBuf,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    pub default_limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            access_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            cache_dir: PathBuf::from("cache/feed"),
            cache_ttl: Duration::from_secs(30 * 60),
            fetch_timeout: Duration::from_secs(10),
            default_limit: 6,
        }
    }
}

impl fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedConfig")
            .field("account_id", &self.account_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("api_base", &self.api_base)
            .field("cache_dir", &self.cache_dir)
            .field("cache_ttl", &self.cache_ttl)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("default_limit", &self.default_limit)
            .finish()
    }
}

/// Non-secret settings that may live in `config/feed.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeedToml {
    api_base: Option<String>,
    cache_dir: Option<PathBuf>,
    cache_ttl_secs: Option<u64>,
    fetch_timeout_secs: Option<u64>,
    default_limit: Option<usize>,
}

impl FeedConfig {
    pub fn with_credentials(
        mut self,
        account_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        self.account_id = Some(account_id.into());
        self.access_token = Some(access_token.into());
        self
    }

    /// `Some` only when both the account id and the token are non-blank.
    pub fn credentials(&self) -> Option<Credentials> {
        let account_id = non_blank(self.account_id.as_deref())?;
        let access_token = non_blank(self.access_token.as_deref())?;
        Some(Credentials {
            account_id: account_id.to_string(),
            access_token: access_token.to_string(),
        })
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env(|k| std::env::var(k).ok());
        cfg
    }

    /// Load order:
    /// 1) defaults
    /// 2) TOML at $FEED_CONFIG_PATH, else config/feed.toml if present
    /// 3) environment variables
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => cfg.apply_toml_file(Path::new(&p))?,
            Err(_) => {
                let p = Path::new(DEFAULT_CONFIG_PATH);
                if p.exists() {
                    cfg.apply_toml_file(p)?;
                }
            }
        }
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_toml(toml::from_str(s).context("parsing feed config toml")?);
        Ok(cfg)
    }

    fn apply_toml_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading feed config from {}", path.display()))?;
        let parsed: FeedToml = toml::from_str(&content)
            .with_context(|| format!("parsing feed config at {}", path.display()))?;
        self.apply_toml(parsed);
        Ok(())
    }

    fn apply_toml(&mut self, t: FeedToml) {
        if let Some(v) = t.api_base {
            self.api_base = v;
        }
        if let Some(v) = t.cache_dir {
            self.cache_dir = v;
        }
        if let Some(v) = t.cache_ttl_secs.filter(|v| *v > 0) {
            self.cache_ttl = Duration::from_secs(v);
        }
        if let Some(v) = t.fetch_timeout_secs.filter(|v| *v > 0) {
            self.fetch_timeout = Duration::from_secs(v);
        }
        if let Some(v) = t.default_limit.filter(|v| *v > 0) {
            self.default_limit = v;
        }
    }

    fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, get: F) {
        if let Some(v) = get(ENV_ACCOUNT_ID) {
            self.account_id = non_blank(Some(&v)).map(str::to_string);
        }
        if let Some(v) = get(ENV_ACCESS_TOKEN) {
            self.access_token = non_blank(Some(&v)).map(str::to_string);
        }
        if let Some(v) = get(ENV_API_BASE).as_deref().and_then(|v| non_blank(Some(v))) {
            self.api_base = v.to_string();
        }
        if let Some(v) = get(ENV_CACHE_DIR).as_deref().and_then(|v| non_blank(Some(v))) {
            self.cache_dir = PathBuf::from(v);
        }
        if let Some(v) = parse_positive(get(ENV_CACHE_TTL_SECS)) {
            self.cache_ttl = Duration::from_secs(v);
        }
        if let Some(v) = parse_positive(get(ENV_FETCH_TIMEOUT_SECS)) {
            self.fetch_timeout = Duration::from_secs(v);
        }
        if let Some(v) = parse_positive(get(ENV_DEFAULT_LIMIT)) {
            self.default_limit = v as usize;
        }
    }
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_positive(v: Option<String>) -> Option<u64> {
    v.and_then(|s| s.trim().parse::<u64>().ok()).filter(|n| *n > 0)
}
