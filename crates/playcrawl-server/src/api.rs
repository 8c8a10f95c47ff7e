//! HTTP API: one crawl route and a health probe.
//!
//! The crawl route mirrors the crawler's contract: it always answers 200
//! with a complete snapshot, and extraction problems are carried in the
//! snapshot's own fault log rather than in HTTP status codes.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use playcrawl_scraper::Crawler;

#[derive(Clone)]
pub struct AppState {
    pub crawler: Arc<Crawler>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/crawl/app-page/google-play/{package_name}",
            get(crawl_app_page),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

async fn crawl_app_page(
    State(state): State<AppState>,
    Path(package_name): Path<String>,
) -> impl IntoResponse {
    tracing::info!(package = %package_name, "crawl requested");
    let snapshot = state.crawler.crawl(&package_name).await;
    if snapshot.likely_blocked() {
        tracing::warn!(
            package = %package_name,
            faults = snapshot.errors.len(),
            "returning a likely-blocked snapshot"
        );
    }
    Json(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use playcrawl_scraper::CrawlerConfig;

    fn app_for(base_url: String) -> Router {
        let config = CrawlerConfig {
            base_url,
            request_timeout_secs: 5,
            user_agent: "playcrawl-test/0.1".to_owned(),
            ..CrawlerConfig::default()
        };
        let crawler = Crawler::new(config).expect("crawler builds");
        build_app(AppState {
            crawler: Arc::new(crawler),
        })
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let app = app_for("https://play.google.com".to_owned());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn crawl_route_answers_200_with_a_complete_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/store/apps/details"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><body><p>not a details page</p></body></html>",
            ))
            .mount(&server)
            .await;

        let app = app_for(server.uri());
        let response = app
            .oneshot(
                Request::get("/crawl/app-page/google-play/com.example.app")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Extraction failures never surface as HTTP errors.
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["package_name"], "com.example.app");
        assert_eq!(value["os"], "ANDROID");
        assert!(
            !value["errors"].as_array().unwrap().is_empty(),
            "fault log must record why extraction found nothing"
        );
    }
}
