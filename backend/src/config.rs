//! Runtime settings read from the environment.
//!
//! A `.env` file in the working directory is loaded first (when present), so
//! every value below can live either there or in the process environment.
//! Unset or unparsable variables fall back to the documented default.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Settings {
    pub project_name: String,
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub upload_dir: PathBuf,
    /// Largest accepted upload, in bytes.
    pub max_file_size: usize,
    pub access_token_expire_minutes: i64,
    pub tesseract_path: String,
    pub log_level: String,
    pub open_browser: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_name: "MedRec Dashboard API".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: PathBuf::from("medrec.sqlite"),
            upload_dir: PathBuf::from("uploads"),
            max_file_size: 5 * 1024 * 1024,
            access_token_expire_minutes: 30,
            tesseract_path: "tesseract".to_string(),
            log_level: "info".to_string(),
            open_browser: false,
        }
    }
}

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Settings {
    pub fn from_env() -> Self {
        // A missing .env is the normal case outside development.
        let _ = dotenvy::dotenv();
        let defaults = Settings::default();

        Self {
            project_name: var_or("PROJECT_NAME", defaults.project_name),
            host: var_or("HOST", defaults.host),
            port: var_or("PORT", defaults.port),
            database_path: var_or("DATABASE_PATH", defaults.database_path),
            upload_dir: var_or("UPLOAD_DIR", defaults.upload_dir),
            max_file_size: var_or("MAX_FILE_SIZE", defaults.max_file_size),
            access_token_expire_minutes: var_or(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                defaults.access_token_expire_minutes,
            ),
            tesseract_path: var_or("TESSERACT_PATH", defaults.tesseract_path),
            log_level: var_or("LOG_LEVEL", defaults.log_level),
            open_browser: var_or("OPEN_BROWSER", defaults.open_browser),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.port, 8080);
        assert_eq!(s.max_file_size, 5_242_880);
        assert_eq!(s.access_token_expire_minutes, 30);
        assert_eq!(s.url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn unparsable_values_fall_back() {
        assert_eq!(var_or("MEDREC_TEST_UNSET_VARIABLE", 42u16), 42);
    }
}
