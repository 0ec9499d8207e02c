use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use prometheus::{Encoder, TextEncoder};

use crate::domain::onboarding::{CustomerApplication, OnboardingService};
use crate::metrics::Metrics;

// ============================================================================
// HTTP Transport
// ============================================================================
//
//   POST /onboarding  - run one onboarding attempt, respond with the outcome
//   GET  /metrics     - Prometheus exposition
//   GET  /health      - liveness
//
// ============================================================================

pub struct AppState {
    pub service: OnboardingService,
    pub metrics: Arc<Metrics>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/onboarding", web::post().to(onboard_handler))
        .route("/metrics", web::get().to(metrics_handler))
        .route("/health", web::get().to(health_handler));
}

pub async fn start_server(state: web::Data<AppState>, host: String, port: u16) -> std::io::Result<()> {
    tracing::info!("🌐 Starting onboarding API on http://{}:{}", host, port);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((host.as_str(), port))?
        .run()
        .await
}

async fn onboard_handler(
    state: web::Data<AppState>,
    application: web::Json<CustomerApplication>,
) -> impl Responder {
    match state.service.onboard(&application).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => {
            tracing::error!(error = %e, stage = e.stage(), "Onboarding aborted");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": e.to_string(),
                "stage": e.stage(),
            }))
        }
    }
}

async fn metrics_handler(state: web::Data<AppState>) -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = state.metrics.registry().gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}

async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "customer-onboarding"
    }))
}
