use crate::error::ApiError;
use crate::state::AppState;
use actix_files::NamedFile;
use actix_web::web;

/// Streams a stored upload. Names are the server-generated ones, so anything
/// that could step outside the upload directory is treated as missing.
pub async fn process(
    state: web::Data<AppState>,
    filename: web::Path<String>,
) -> Result<NamedFile, ApiError> {
    let name = filename.into_inner();
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return Err(ApiError::not_found("Image"));
    }

    let path = state.settings.upload_dir.join(&name);
    if !path.is_file() {
        return Err(ApiError::not_found("Image"));
    }
    Ok(NamedFile::open_async(path).await?)
}
