use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use tracing::{debug, info};

use crate::error::ConfigError;

pub struct RuntimeConfig {
    /// Directory holding `votes.log`.
    pub data_dir: PathBuf,
    /// Upper bound on waiting for the store lock.
    pub lock_timeout: Duration,
    pub history_limit: usize,
    pub history_max: usize,
    pub trend_hours: u32,
    /// Longest trend window a caller may ask for.
    pub trend_max_hours: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            lock_timeout: Duration::from_millis(2000),
            history_limit: 10,
            history_max: 1000,
            trend_hours: 24,
            trend_max_hours: 24 * 31,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            data_dir: try_load("VOTE_DATA_DIR", defaults.data_dir)?,
            lock_timeout: Duration::from_millis(try_load(
                "VOTE_LOCK_TIMEOUT_MS",
                defaults.lock_timeout.as_millis() as u64,
            )?),
            history_limit: try_load("VOTE_HISTORY_LIMIT", defaults.history_limit)?,
            history_max: try_load("VOTE_HISTORY_MAX", defaults.history_max)?,
            trend_hours: try_load("VOTE_TREND_HOURS", defaults.trend_hours)?,
            trend_max_hours: try_load("VOTE_TREND_MAX_HOURS", defaults.trend_max_hours)?,
        })
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("votes.log")
    }
}

fn try_load<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => {
            debug!("{key} = {raw}");
            raw.parse().map_err(|e: T::Err| ConfigError {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            })
        }
        Err(_) => {
            info!("{key} not set, using default: {default:?}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_key_uses_default() {
        let v: u32 = try_load("VOTE_TEST_SURELY_UNSET_KEY", 24).unwrap();
        assert_eq!(v, 24);
    }

    #[test]
    fn unparsable_value_is_an_error() {
        env::set_var("VOTE_TEST_BAD_NUMBER", "many");
        let err = try_load::<u32>("VOTE_TEST_BAD_NUMBER", 1).unwrap_err();
        assert_eq!(err.key, "VOTE_TEST_BAD_NUMBER");
        assert_eq!(err.value, "many");
    }

    #[test]
    fn log_path_is_inside_data_dir() {
        let cfg = RuntimeConfig {
            data_dir: PathBuf::from("/tmp/votes"),
            ..Default::default()
        };
        assert_eq!(cfg.log_path(), PathBuf::from("/tmp/votes/votes.log"));
    }
}
