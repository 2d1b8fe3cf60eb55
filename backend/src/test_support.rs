//! Throwaway database and upload directory for handler tests.

use crate::auth::{password, tokens};
use crate::config::Settings;
use crate::db;
use crate::services::upload::ocr::{OcrError, TextRecognizer};
use crate::state::AppState;
use actix_web::http::header::AUTHORIZATION;
use actix_web::web;
use chrono::Utc;
use common::model::upload::OcrResult;
use rusqlite::params;
use std::sync::Arc;
use tempfile::TempDir;

/// Returns a canned result instead of running an OCR engine.
pub struct FixedRecognizer(pub Option<OcrResult>);

impl TextRecognizer for FixedRecognizer {
    fn recognize(&self, _image: &[u8]) -> Result<OcrResult, OcrError> {
        self.0
            .clone()
            .ok_or_else(|| OcrError::Engine("no text engine in tests".to_string()))
    }
}

pub struct TestContext {
    _dir: TempDir,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_recognizer(FixedRecognizer(None))
    }

    pub fn with_recognizer(recognizer: impl TextRecognizer + 'static) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            database_path: dir.path().join("test.sqlite"),
            upload_dir: dir.path().join("uploads"),
            max_file_size: 1024,
            ..Settings::default()
        };
        db::init(&settings.database_path).unwrap();
        std::fs::create_dir_all(&settings.upload_dir).unwrap();

        Self {
            _dir: dir,
            state: AppState::new(settings, Arc::new(recognizer)),
        }
    }

    pub fn data(&self) -> web::Data<AppState> {
        web::Data::new(self.state.clone())
    }

    /// Inserts a provider and returns an `Authorization` header for it.
    pub fn auth_header(&self) -> (actix_web::http::header::HeaderName, String) {
        let conn = self.state.connect().unwrap();
        conn.execute(
            "INSERT INTO providers (name, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                "Dr. Test",
                format!("{}@clinic.test", uuid::Uuid::new_v4().simple()),
                password::hash_password("secret1").unwrap(),
                Utc::now()
            ],
        )
        .unwrap();
        let token =
            tokens::issue(&conn, conn.last_insert_rowid(), self.state.token_ttl(), Utc::now())
                .unwrap();
        (AUTHORIZATION, format!("Bearer {}", token))
    }
}

/// Builds the full API service over a [`TestContext`].
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.data())
                .configure(crate::services::configure),
        )
        .await
    };
}

pub(crate) use init_app;
