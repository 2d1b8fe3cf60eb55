use crate::config::Settings;
use crate::db;
use crate::error::ApiError;
use crate::services::upload::ocr::TextRecognizer;
use chrono::Duration;
use rusqlite::Connection;
use std::sync::Arc;

/// Shared by every worker as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub recognizer: Arc<dyn TextRecognizer>,
}

impl AppState {
    pub fn new(settings: Settings, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self {
            settings: Arc::new(settings),
            recognizer,
        }
    }

    pub fn connect(&self) -> Result<Connection, ApiError> {
        Ok(db::connect(&self.settings.database_path)?)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::minutes(self.settings.access_token_expire_minutes)
    }
}
