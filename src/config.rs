// Store location. The only setting is where the store file lives.

use std::env;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ZENGIN_DB";
pub const DEFAULT_DB_PATH: &str = "zengin.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    /// `ZENGIN_DB` if set and non-empty, else `zengin.db` in the working directory.
    pub fn from_env() -> Self {
        let db_path = env::var_os(DB_PATH_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        Config { db_path }
    }

    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}
