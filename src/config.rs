// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::engine_core::constants::{activity, config as env_keys, events};
use crate::engine_core::crypto::KdfConfig;
use crate::engine_core::errors::AccessError;
use crate::engine_core::models::Prf;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub log_format: String, // "json" or "text"
    pub kdf: KdfConfig,
    pub busy_threshold_ms: u64,
    pub event_list_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AccessError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup, starting from the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AccessError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let prf = match lookup(env_keys::ENV_KDF_PRF) {
            Some(name) => Prf::from_str(name.trim())
                .map_err(|e| AccessError::ConfigurationError(e.to_string()))?,
            None => defaults.kdf.prf,
        };

        let config = Self {
            log_level: lookup(env_keys::ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_format: lookup(env_keys::ENV_LOG_FORMAT).unwrap_or(defaults.log_format),
            kdf: KdfConfig {
                iterations: parse_or(&lookup, env_keys::ENV_KDF_ITERATIONS, defaults.kdf.iterations)?,
                key_size: parse_or(&lookup, env_keys::ENV_KDF_KEY_SIZE, defaults.kdf.key_size)?,
                salt_size: parse_or(&lookup, env_keys::ENV_KDF_SALT_SIZE, defaults.kdf.salt_size)?,
                prf,
            },
            busy_threshold_ms: parse_or(
                &lookup,
                env_keys::ENV_BUSY_THRESHOLD_MS,
                defaults.busy_threshold_ms,
            )?,
            event_list_limit: parse_or(
                &lookup,
                env_keys::ENV_EVENT_LIST_LIMIT,
                defaults.event_list_limit,
            )?,
        };
        config.kdf.validate()?;
        Ok(config)
    }

    /// Load a YAML config file; missing keys keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, AccessError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AccessError::ConfigurationError(format!("reading {}: {}", path.display(), e))
        })?;
        let config: Self = serde_yaml_ng::from_str(&raw).map_err(|e| {
            AccessError::ConfigurationError(format!("parsing {}: {}", path.display(), e))
        })?;
        config.kdf.validate()?;
        Ok(config)
    }

    /// Validated key derivation settings.
    pub fn kdf_config(&self) -> Result<KdfConfig, AccessError> {
        self.kdf.validate()?;
        Ok(self.kdf.clone())
    }

    pub fn busy_threshold(&self) -> Duration {
        Duration::from_millis(self.busy_threshold_ms)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AccessError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AccessError::ConfigurationError(format!("{}={:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            kdf: KdfConfig::default(),
            busy_threshold_ms: activity::DEFAULT_LATENCY_THRESHOLD_MS,
            event_list_limit: events::DEFAULT_LIST_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.kdf, KdfConfig::default());
        assert_eq!(config.busy_threshold(), Duration::from_millis(100));
        assert_eq!(config.event_list_limit, 50);
    }

    #[test]
    fn test_each_kdf_option_is_independent() {
        let config = Config::from_lookup(lookup(&[(env_keys::ENV_KDF_ITERATIONS, "100")])).unwrap();
        assert_eq!(config.kdf.iterations, 100);
        assert_eq!(config.kdf.key_size, KdfConfig::default().key_size);
        assert_eq!(config.kdf.salt_size, KdfConfig::default().salt_size);
        assert_eq!(config.kdf.prf, Prf::Sha256);

        let config = Config::from_lookup(lookup(&[(env_keys::ENV_KDF_PRF, "SHA512")])).unwrap();
        assert_eq!(config.kdf.prf, Prf::Sha512);
        assert_eq!(config.kdf.iterations, KdfConfig::default().iterations);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_lookup(lookup(&[(env_keys::ENV_KDF_ITERATIONS, "many")])),
            Err(AccessError::ConfigurationError(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(env_keys::ENV_KDF_KEY_SIZE, "0")])),
            Err(AccessError::ConfigurationError(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(env_keys::ENV_KDF_SALT_SIZE, "10000000000")])),
            Err(AccessError::ConfigurationError(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(env_keys::ENV_KDF_PRF, "MD5")])),
            Err(AccessError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "log_format: json\nkdf:\n  iterations: 5000\n  prf: SHA1\nevent_list_limit: 10\n"
        )
        .unwrap();

        let config = Config::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.log_format, "json");
        assert_eq!(config.kdf.iterations, 5000);
        assert_eq!(config.kdf.prf, Prf::Sha1);
        assert_eq!(config.kdf.key_size, KdfConfig::default().key_size);
        assert_eq!(config.event_list_limit, 10);
        assert_eq!(config.busy_threshold_ms, 100);
    }
}
