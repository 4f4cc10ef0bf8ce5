mod clock;
mod config;
mod error;
mod handlers;
mod limiter;
mod metrics;
mod models;
mod orchestrator;
mod state;
mod stats;
mod synth;
mod upstream;

use axum::http::{Method, header};
use axum::{Router, routing::get};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clock::{Clock, SystemClock};
use config::Args;
use limiter::{DailyLimiter, FileGrantStore, GrantStore, MemoryGrantStore};
use orchestrator::Orchestrator;
use state::AppState;
use synth::LikeSynthesizer;
use upstream::HttpProfileLookup;

// Router with the CORS layer; split out so tests can drive it directly
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/like", get(handlers::like_handler))
        .route("/stats", get(handlers::stats_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .fallback(handlers::not_found_handler)
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.upstream_timeout))
        .build()
        .expect("failed to build http client");

    let store: Arc<dyn GrantStore> = match &args.grants_file {
        Some(path) => {
            tracing::info!("daily limits persisted to {:?}", path);
            Arc::new(FileGrantStore::load(path.clone()))
        }
        None => {
            // known limitation: without a grants file every restart forgets all limits
            tracing::warn!("no --grants-file set, daily limits reset on restart");
            Arc::new(MemoryGrantStore::new())
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let limiter = DailyLimiter::new(store, Duration::from_secs(args.limit_window), clock);
    let orchestrator = Orchestrator::new(
        Arc::new(HttpProfileLookup::new(client, args.upstream_url.clone())),
        LikeSynthesizer::new(config::LIKE_VALUES),
        limiter,
    );

    let state = Arc::new(AppState {
        orchestrator,
        source: args.source.clone(),
        telegram_id: args.telegram_id.clone(),
    });

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    tracing::info!("like-api listening on http://localhost:{}", args.port);
    tracing::info!("upstream lookup: {}", args.upstream_url);
    tracing::info!("limit window: {} seconds", args.limit_window);

    axum::serve(listener, app(state))
        .await
        .expect("server failed");
}

#[cfg(test)]
mod router_tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::limiter::MemoryGrantStore;
    use crate::upstream::{StaticLookup, UpstreamError};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app(lookup: StaticLookup) -> Router {
        let clock = Arc::new(ManualClock::at(1_000_000));
        let limiter = DailyLimiter::new(
            Arc::new(MemoryGrantStore::new()),
            Duration::from_secs(86400),
            clock,
        );
        let orchestrator = Orchestrator::new(
            Arc::new(lookup),
            LikeSynthesizer::seeded(&[199], 0),
            limiter,
        );
        app(Arc::new(AppState {
            orchestrator,
            source: "like-api".to_string(),
            telegram_id: "@like_api".to_string(),
        }))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn root_lists_the_endpoints() {
        let (status, json) = get_json(test_app(StaticLookup::ok("Foo", 500)), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Like API is running");
        assert_eq!(json["status"], "active");
        assert!(json["endpoints"]["/like"].is_string());
    }

    #[tokio::test]
    async fn like_returns_the_legacy_envelope() {
        let (status, json) = get_json(
            test_app(StaticLookup::ok("Foo", 500)),
            "/like?uid=1967182359&server=BD",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["LikesGivenByAPI"], 199);
        assert_eq!(json["LikesbeforeCommand"], 301);
        assert_eq!(json["LikesafterCommand"], 500);
        assert_eq!(json["PlayerNickname"], "Foo");
        assert_eq!(json["UID"], "1967182359");
        assert_eq!(json["server"], "BD");
        assert_eq!(json["source"], "like-api");
    }

    #[tokio::test]
    async fn missing_params_are_a_400() {
        let app = test_app(StaticLookup::ok("Foo", 500));

        let (status, json) = get_json(app.clone(), "/like?uid=1967182359").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Missing uid or server parameter");

        let (status, _) = get_json(app.clone(), "/like?server=BD").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app, "/like?uid=&server=BD").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_uid_is_a_400() {
        let (status, json) = get_json(
            test_app(StaticLookup::ok("Foo", 500)),
            "/like?uid=abc&server=BD",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], 0);
        assert_eq!(json["error"], "Invalid UID format");
        assert_eq!(json["code"], 400);
    }

    #[tokio::test]
    async fn second_call_in_the_window_is_a_429() {
        let app = test_app(StaticLookup::ok("Foo", 500));

        let (status, _) = get_json(app.clone(), "/like?uid=1967182359&server=BD").await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = get_json(app, "/like?uid=1967182359&server=BD").await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["code"], 429);
        assert!(json["retry_after"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn upstream_failures_map_to_http_statuses() {
        let (status, json) = get_json(
            test_app(StaticLookup::failing(UpstreamError::Timeout)),
            "/like?uid=1967182359&server=BD",
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(json["error"].as_str().unwrap().contains("timeout"));

        let (status, _) = get_json(
            test_app(StaticLookup::failing(UpstreamError::NotFound)),
            "/like?uid=1967182359&server=BD",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json(
            test_app(StaticLookup::failing(UpstreamError::Http)),
            "/like?uid=1967182359&server=BD",
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unknown_paths_hit_the_fallback() {
        let (status, json) = get_json(test_app(StaticLookup::ok("Foo", 500)), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Endpoint not found");
        assert_eq!(json["code"], 404);
    }

    #[tokio::test]
    async fn stats_reflect_traffic() {
        let app = test_app(StaticLookup::ok("Foo", 500));

        get_json(app.clone(), "/like?uid=1967182359&server=BD").await;
        get_json(app.clone(), "/like?uid=abc&server=BD").await;

        let (status, json) = get_json(app, "/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_requests"], 2);
        assert_eq!(json["successful"], 1);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["success_rate"], "50.0%");
    }

    #[tokio::test]
    async fn responses_are_cors_open() {
        let app = test_app(StaticLookup::ok("Foo", 500));
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            res.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .map(|v| v.to_str().unwrap()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn preflight_requests_are_answered() {
        let app = test_app(StaticLookup::ok("Foo", 500));
        let res = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/like")
                    .header(header::ORIGIN, "http://example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(res.status().is_success());
        assert_eq!(
            res.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .map(|v| v.to_str().unwrap()),
            Some("*")
        );
    }
}
