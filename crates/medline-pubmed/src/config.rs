//! Environment-driven configuration, loaded once by the driver and handed
//! to the runner. `dotenvy::dotenv()` is called by the CLI before this is
//! read, so a `.env` file in the working directory is honored the same way
//! as real environment variables.

use std::path::PathBuf;

/// Pipeline configuration. Every field maps to one `PMPG_*` or `POSTGRES_*`
/// environment variable; see each accessor for the variable name and default.
#[derive(Debug, Clone)]
pub struct Config {
    pub medline_path: PathBuf,
    pub filelist_start: Option<usize>,
    pub filelist_end: Option<usize>,
    pub processes: usize,
    pub clean: bool,
    pub baseline: bool,
    pub postgres_server: String,
    pub postgres_port: u16,
    pub postgres_user: String,
    pub postgres_password: String,
    pub postgres_db: String,
}

impl Config {
    /// Read configuration from the process environment. Every variable has a
    /// default, so this only fails on a malformed numeric/boolean value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let medline_path = std::env::var("PMPG_MEDLINE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/xmls/"));

        let filelist_start = env_usize("PMPG_FILELIST_START")?;
        let filelist_end = env_usize("PMPG_FILELIST_END")?;
        let processes = env_usize("PMPG_PROCESSES")?.unwrap_or(2);
        let clean = env_bool("PMPG_CLEAN");
        let baseline = env_bool("PMPG_BASELINE");

        Ok(Config {
            medline_path,
            filelist_start,
            filelist_end,
            processes: processes.max(1),
            clean,
            baseline,
            postgres_server: std::env::var("POSTGRES_SERVER").unwrap_or_else(|_| "localhost".to_string()),
            postgres_port: std::env::var("POSTGRES_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5432),
            postgres_user: std::env::var("POSTGRES_USER").unwrap_or_else(|_| "postgres".to_string()),
            postgres_password: std::env::var("POSTGRES_PASSWORD").unwrap_or_default(),
            postgres_db: std::env::var("POSTGRES_DB").unwrap_or_else(|_| "medline".to_string()),
        })
    }

    /// Postgres connection string, as consumed by `diesel::r2d2::ConnectionManager`.
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.postgres_user, self.postgres_password, self.postgres_server, self.postgres_port, self.postgres_db
        )
    }
}

fn env_usize(key: &'static str) -> Result<Option<usize>, ConfigError> {
    match std::env::var(key) {
        Ok(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidVar(key)),
        Err(_) => Ok(None),
    }
}

fn env_bool(key: &str) -> bool {
    std::env::var(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {0}")]
    InvalidVar(&'static str),
}
