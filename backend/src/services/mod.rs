pub mod auth;
pub mod health;
pub mod medications;
pub mod patients;
pub mod reconciliations;
pub mod upload;

use crate::error::rejected_input;
use actix_web::web;
use common::requests::non_blank;

/// Prefix shared by every versioned route.
pub const API_V1: &str = "/api/v1";

/// Largest JSON body accepted by any route.
const JSON_LIMIT: usize = 1024 * 1024;

/// Registers every API scope and the extractor settings that keep malformed
/// input on the `{"detail": ...}` error shape. Used by `main` and by the
/// handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(|err, _| rejected_input(err)),
    )
    .app_data(web::FormConfig::default().error_handler(|err, _| rejected_input(err)))
    .app_data(web::QueryConfig::default().error_handler(|err, _| rejected_input(err)))
    .app_data(web::PathConfig::default().error_handler(|err, _| rejected_input(err)))
    .service(health::configure_routes())
    .service(auth::configure_routes())
    .service(patients::configure_routes())
    .service(medications::configure_routes())
    .service(reconciliations::configure_routes())
    .service(upload::configure_routes())
    .service(upload::configure_public_routes());
}

/// Applies one optional field of an update payload: absent keeps the stored
/// value, blank clears it.
pub(crate) fn patch(current: Option<String>, change: Option<&String>) -> Option<String> {
    match change {
        Some(value) => non_blank(value),
        None => current,
    }
}
