//! Environment-driven application configuration.
//!
//! Configuration is parsed once at startup into an explicit object and
//! passed down; nothing else in the crate reads the process environment.
//! Debug builds tolerate missing toggles with a warning, release builds
//! fail fast.

use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::Url;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::outbound::supabase::ServiceRoleKey;

const SUPABASE_URL_ENV: &str = "SUPABASE_URL";
const ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";
const SERVICE_KEY_ENV: &str = "SUPABASE_SERVICE_ROLE_KEY";
const FALLBACK_DIR_ENV: &str = "FALLBACK_DATA_DIR";
const RENDERER_URL_ENV: &str = "RENDERER_URL";
const BIND_ADDR_ENV: &str = "BIND_ADDR";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";

const DEFAULT_FALLBACK_DIR: &str = "data";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Length of the key fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    pub const fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
        /// Description of accepted values.
        expected: &'static str,
    },
}

/// Connection settings for the hosted backend and identity provider.
#[derive(Debug)]
pub struct SupabaseSettings {
    /// Project base URL.
    pub url: Url,
    /// Public anonymous key.
    pub anon_key: String,
    /// Privileged service-role key for REST mutations, when granted.
    pub service_role_key: Option<ServiceRoleKey>,
}

/// Application configuration assembled from the environment.
#[derive(Debug)]
pub struct AppConfig {
    /// Hosted backend settings; `None` degrades the store to fallback-only.
    pub supabase: Option<SupabaseSettings>,
    /// Directory of the JSON fallback files.
    pub fallback_dir: PathBuf,
    /// External receipt renderer endpoint, when configured.
    pub renderer_url: Option<Url>,
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// Whether session cookies are rewritten with the `Secure` attribute.
    pub cookie_secure: bool,
}

impl AppConfig {
    /// Assemble configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] in release mode when a present variable fails
    /// validation; debug mode downgrades those to warnings and defaults.
    pub fn from_env(mode: BuildMode) -> Result<Self, ConfigError> {
        Ok(Self {
            supabase: supabase_from_env(mode)?,
            fallback_dir: PathBuf::from(
                env_string(FALLBACK_DIR_ENV).unwrap_or_else(|| DEFAULT_FALLBACK_DIR.to_owned()),
            ),
            renderer_url: optional_url(RENDERER_URL_ENV, mode)?,
            bind_addr: bind_addr_from_env(mode)?,
            cookie_secure: bool_from_env(COOKIE_SECURE_ENV, true, mode)?,
        })
    }

    /// Whether the hosted backend is reachable by configuration.
    pub const fn supabase_configured(&self) -> bool {
        self.supabase.is_some()
    }
}

/// Truncated SHA-256 fingerprint of the service-role key.
///
/// Lets operators verify which key is active from the startup logs without
/// exposing the key material.
pub fn key_fingerprint(key: &ServiceRoleKey) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.expose().as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest.iter().take(FINGERPRINT_BYTES).copied().collect::<Vec<u8>>())
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn debug_warn_or_error<T>(
    mode: BuildMode,
    fallback: T,
    error: ConfigError,
    warn_fn: impl FnOnce(),
) -> Result<T, ConfigError> {
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

fn supabase_from_env(mode: BuildMode) -> Result<Option<SupabaseSettings>, ConfigError> {
    let (Some(raw_url), Some(anon_key)) = (env_string(SUPABASE_URL_ENV), env_string(ANON_KEY_ENV))
    else {
        // Not an error in either mode: the store degrades to fallback-only
        // and the UI surfaces a configuration banner.
        warn!("hosted backend not configured; all records go to the fallback store");
        return Ok(None);
    };

    let url = match Url::parse(&raw_url) {
        Ok(url) => url,
        Err(error) => {
            return debug_warn_or_error(
                mode,
                None,
                ConfigError::InvalidEnv {
                    name: SUPABASE_URL_ENV,
                    value: raw_url.clone(),
                    expected: "an absolute http(s) URL",
                },
                || warn!(value = %raw_url, %error, "invalid SUPABASE_URL; degrading to fallback-only"),
            );
        }
    };

    Ok(Some(SupabaseSettings {
        url,
        anon_key,
        service_role_key: env_string(SERVICE_KEY_ENV).map(ServiceRoleKey::new),
    }))
}

fn optional_url(name: &'static str, mode: BuildMode) -> Result<Option<Url>, ConfigError> {
    let Some(raw) = env_string(name) else {
        return Ok(None);
    };
    match Url::parse(&raw) {
        Ok(url) => Ok(Some(url)),
        Err(error) => debug_warn_or_error(
            mode,
            None,
            ConfigError::InvalidEnv {
                name,
                value: raw.clone(),
                expected: "an absolute http(s) URL",
            },
            || warn!(value = %raw, %error, "invalid {name}; ignoring"),
        ),
    }
}

fn bind_addr_from_env(mode: BuildMode) -> Result<SocketAddr, ConfigError> {
    let raw = env_string(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
    match raw.parse() {
        Ok(addr) => Ok(addr),
        Err(_) => {
            let default = DEFAULT_BIND_ADDR
                .parse()
                .map_err(|_| ConfigError::InvalidEnv {
                    name: BIND_ADDR_ENV,
                    value: DEFAULT_BIND_ADDR.to_owned(),
                    expected: "host:port",
                })?;
            debug_warn_or_error(
                mode,
                default,
                ConfigError::InvalidEnv {
                    name: BIND_ADDR_ENV,
                    value: raw.clone(),
                    expected: "host:port",
                },
                || warn!(value = %raw, "invalid BIND_ADDR; using default"),
            )
        }
    }
}

fn bool_from_env(
    name: &'static str,
    default_value: bool,
    mode: BuildMode,
) -> Result<bool, ConfigError> {
    let Some(raw) = env_string(name) else {
        return Ok(default_value);
    };
    match parse_bool(&raw) {
        Some(flag) => Ok(flag),
        None => debug_warn_or_error(
            mode,
            default_value,
            ConfigError::InvalidEnv {
                name,
                value: raw.clone(),
                expected: BOOL_EXPECTED,
            },
            || warn!(value = %raw, "invalid {name}; using default"),
        ),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use env_lock::lock_env;
    use rstest::rstest;

    fn clear_all() -> Vec<(&'static str, Option<&'static str>)> {
        vec![
            (SUPABASE_URL_ENV, None),
            (ANON_KEY_ENV, None),
            (SERVICE_KEY_ENV, None),
            (FALLBACK_DIR_ENV, None),
            (RENDERER_URL_ENV, None),
            (BIND_ADDR_ENV, None),
            (COOKIE_SECURE_ENV, None),
        ]
    }

    #[rstest]
    fn missing_supabase_settings_degrade_to_fallback_only() {
        let _guard = lock_env(clear_all());
        let config = AppConfig::from_env(BuildMode::Release).expect("config builds");
        assert!(!config.supabase_configured());
        assert_eq!(config.fallback_dir, PathBuf::from("data"));
        assert!(config.cookie_secure);
    }

    #[rstest]
    fn full_environment_round_trips() {
        let mut env = clear_all();
        env.retain(|(name, _)| {
            *name != SUPABASE_URL_ENV && *name != ANON_KEY_ENV && *name != SERVICE_KEY_ENV
        });
        env.extend([
            (SUPABASE_URL_ENV, Some("https://project.supabase.co")),
            (ANON_KEY_ENV, Some("anon")),
            (SERVICE_KEY_ENV, Some("service")),
        ]);
        let _guard = lock_env(env);

        let config = AppConfig::from_env(BuildMode::Release).expect("config builds");
        let supabase = config.supabase.expect("supabase configured");
        assert_eq!(supabase.url.as_str(), "https://project.supabase.co/");
        assert!(supabase.service_role_key.is_some());
    }

    #[rstest]
    fn invalid_url_fails_fast_in_release_mode() {
        let mut env = clear_all();
        env.retain(|(name, _)| *name != SUPABASE_URL_ENV && *name != ANON_KEY_ENV);
        env.extend([
            (SUPABASE_URL_ENV, Some("not a url")),
            (ANON_KEY_ENV, Some("anon")),
        ]);
        let _guard = lock_env(env);

        let err = AppConfig::from_env(BuildMode::Release).expect_err("invalid url");
        assert!(matches!(err, ConfigError::InvalidEnv { name, .. } if name == SUPABASE_URL_ENV));
    }

    #[rstest]
    fn invalid_url_degrades_in_debug_mode() {
        let mut env = clear_all();
        env.retain(|(name, _)| *name != SUPABASE_URL_ENV && *name != ANON_KEY_ENV);
        env.extend([
            (SUPABASE_URL_ENV, Some("not a url")),
            (ANON_KEY_ENV, Some("anon")),
        ]);
        let _guard = lock_env(env);

        let config = AppConfig::from_env(BuildMode::Debug).expect("config builds");
        assert!(!config.supabase_configured());
    }

    #[rstest]
    #[case("1", true)]
    #[case("no", false)]
    fn cookie_secure_accepts_common_bool_spellings(#[case] raw: &str, #[case] expected: bool) {
        let mut env = clear_all();
        env.retain(|(name, _)| *name != COOKIE_SECURE_ENV);
        env.push((COOKIE_SECURE_ENV, Some(raw)));
        let _guard = lock_env(env);

        let config = AppConfig::from_env(BuildMode::Release).expect("config builds");
        assert_eq!(config.cookie_secure, expected);
    }

    #[rstest]
    fn fingerprints_are_stable_hex() {
        let key = ServiceRoleKey::new("service-key-material");
        let fp = key_fingerprint(&key);
        assert_eq!(fp.len(), FINGERPRINT_BYTES * 2);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp, key_fingerprint(&ServiceRoleKey::new("service-key-material")));
    }
}
