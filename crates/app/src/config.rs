use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, ValueEnum};
use storage::repository::Storage;
use training_core::time::Clock;

/// Result backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Sqlite,
    Json,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// SQLite database URL or path
    #[arg(long = "db", global = true, env = "TRAINING_DB_URL", default_value = "sqlite:training.sqlite3")]
    db_url: String,

    /// Result store backend
    #[arg(long, global = true, env = "TRAINING_STORE", value_enum, default_value = "sqlite")]
    store: StoreKind,

    /// JSON results file, used with `--store json`
    #[arg(long, global = true, env = "TRAINING_JSON_PATH", default_value = "quiz-results.json")]
    json_path: PathBuf,

    /// Directory holding the example screenshots
    #[arg(long, global = true, env = "TRAINING_ASSETS_DIR")]
    assets_dir: Option<PathBuf>,

    /// Directory where reports and exports are written
    #[arg(long, global = true, env = "TRAINING_REPORT_DIR", default_value = ".")]
    report_dir: PathBuf,

    /// Upper bound in seconds on storing one result
    #[arg(long, global = true, env = "TRAINING_PERSIST_TIMEOUT_SECS", default_value_t = 5)]
    persist_timeout_secs: u64,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreKind,
    pub db_url: String,
    pub json_path: PathBuf,
    pub assets_dir: Option<PathBuf>,
    pub report_dir: PathBuf,
    pub persist_timeout: Duration,
}

impl AppConfig {
    pub fn from_args(args: GlobalArgs) -> Result<Self, ConfigError> {
        if args.db_url.trim().is_empty() {
            return Err(ConfigError::InvalidDbUrl { raw: args.db_url });
        }
        Ok(Self {
            store: args.store,
            db_url: normalize_sqlite_url(&args.db_url),
            json_path: args.json_path,
            assets_dir: args.assets_dir,
            report_dir: args.report_dir,
            persist_timeout: Duration::from_secs(args.persist_timeout_secs),
        })
    }

    /// Open the result store selected by `--store`.
    pub async fn open_storage(&self, clock: Clock) -> Result<Storage, Box<dyn std::error::Error>> {
        match self.store {
            StoreKind::Sqlite => {
                prepare_sqlite_file(&self.db_url)?;
                Ok(Storage::sqlite(&self.db_url, clock).await?)
            }
            StoreKind::Json => Ok(Storage::json_file(self.json_path.clone(), clock)),
        }
    }
}

/// Turn a bare path or `sqlite:` URL into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_and_absolute_urls_are_kept() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/t.sqlite3"),
            "sqlite:///tmp/t.sqlite3"
        );
        assert_eq!(normalize_sqlite_url("/tmp/t.sqlite3"), "sqlite:///tmp/t.sqlite3");
    }

    #[test]
    fn relative_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/t.sqlite3");
        let path = url.strip_prefix("sqlite://").unwrap();
        assert!(Path::new(path).is_absolute());
        assert!(path.ends_with("data/t.sqlite3"));
    }
}
