// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration overrides for serverless deployment

use super::Config;
use crate::constants::{config_keys, defaults, env_vars};
use std::env;
use tracing::debug;

/// Resolve the configuration file path.
///
/// Order: explicit path, `HDB_CONFIG_FILE`, the user config directory, and
/// finally `config.toml` in the working directory.
pub fn resolve_config_path(path: Option<String>) -> String {
    path.or_else(|| env::var(env_vars::CONFIG_FILE).ok())
        .unwrap_or_else(|| {
            dirs::config_dir()
                .map(|p| p.join(defaults::CONFIG_DIR).join(defaults::CONFIG_FILE_NAME))
                .unwrap_or_else(|| defaults::CONFIG_FILE_NAME.into())
                .to_string_lossy()
                .to_string()
        })
}

/// Environment variable name for a config key: `strava.tokenurl` -> `STRAVA_TOKENURL`
pub fn env_key_for(config_key: &str) -> String {
    config_key.replace('.', "_").to_uppercase()
}

/// Override recognized keys with values found through `get`.
///
/// `get` abstracts the environment so tests do not mutate process state.
pub fn apply_env_overrides<F>(config: &mut Config, mut get: F)
where
    F: FnMut(&str) -> Option<String>,
{
    for key in config_keys::ALL {
        if let Some(value) = get(&env_key_for(key)).filter(|v| !v.is_empty()) {
            debug!(key = %key, "Config value overridden from environment");
            config.set(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_for() {
        assert_eq!(env_key_for("strava.tokenurl"), "STRAVA_TOKENURL");
        assert_eq!(env_key_for("hdb.queue"), "HDB_QUEUE");
    }

    #[test]
    fn test_apply_env_overrides() {
        let mut config = Config::from_pairs([("hdb.queue", "from-file")]);
        let get = |k: &str| match k {
            "HDB_QUEUE" => Some("from-env".to_string()),
            "STRAVA_ACTIVITYDAYS" => Some("7".to_string()),
            "STRAVA_TOKENURL" => Some(String::new()),
            _ => None,
        };
        apply_env_overrides(&mut config, get);

        assert_eq!(config.get("hdb.queue").as_deref(), Some("from-env"));
        assert_eq!(config.get_as_int("strava.activitydays", 30).unwrap(), 7);
        // empty values do not override
        assert!(!config.contains("strava.tokenurl"));
    }

    #[test]
    fn test_explicit_path_wins() {
        assert_eq!(
            resolve_config_path(Some("/etc/hdb/strava.toml".into())),
            "/etc/hdb/strava.toml"
        );
    }
}
