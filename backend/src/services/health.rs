use actix_web::web::{get, resource};
use actix_web::{HttpResponse, Resource};
use common::model::HealthStatus;

/// Unversioned liveness probe.
pub fn configure_routes() -> Resource {
    resource("/health").route(get().to(process))
}

pub async fn process() -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus {
        status: "healthy".to_string(),
        service: "medrec-api".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn reports_healthy() {
        let app = test::init_service(App::new().service(configure_routes())).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: HealthStatus = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.status, "healthy");
        assert_eq!(body.service, "medrec-api");
    }
}
