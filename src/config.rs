use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const WORKBOOK_FILE_NAME: &str = "IDF_Curves_Brazil.xlsx";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IDF_Curves_Brazil.xlsx not found (searched: {searched:?}); set IDF_XLSX_PATH")]
    WorkbookNotFound { searched: Vec<PathBuf> },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub workbook_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            workbook_path: env::var("IDF_XLSX_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Locate the IDF workbook relative to the current directory
    pub fn resolve_workbook_path(&self) -> Result<PathBuf, ConfigError> {
        let base = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        self.resolve_workbook_path_from(&base)
    }

    /// Locate the IDF workbook
    ///
    /// `IDF_XLSX_PATH` wins when it points at an existing file; otherwise the
    /// conventional documentation folders around `base` are tried in order.
    pub fn resolve_workbook_path_from(&self, base: &Path) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.workbook_path {
            if path.is_file() {
                return Ok(path.clone());
            }
            warn!(
                "IDF_XLSX_PATH={} does not exist, trying default locations",
                path.display()
            );
        }

        let searched = workbook_candidates(base);
        for candidate in &searched {
            debug!("Looking for workbook at {}", candidate.display());
            if candidate.is_file() {
                return Ok(candidate.clone());
            }
        }

        Err(ConfigError::WorkbookNotFound { searched })
    }
}

fn workbook_candidates(base: &Path) -> Vec<PathBuf> {
    let docs = Path::new("Documentação").join("Equações").join(WORKBOOK_FILE_NAME);
    vec![
        base.join("..").join(&docs),
        base.join("..").join("..").join(&docs),
        base.join("data").join(WORKBOOK_FILE_NAME),
    ]
}
