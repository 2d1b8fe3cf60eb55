use crate::auth::CurrentProvider;
use actix_web::HttpResponse;

/// Handler for `GET /api/v1/auth/me`.
pub async fn process(provider: CurrentProvider) -> HttpResponse {
    HttpResponse::Ok().json(provider.0)
}
