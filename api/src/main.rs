use anyhow::Result;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use migration::{Migrator, MigratorTrait};
use serde_json::{json, Value};
use shared::{get_db_connection, Config};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod handlers;
mod state;

use state::AppState;

fn app(state: Arc<AppState>, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/portfolio", get(handlers::portfolio::list_portfolio))
        .route("/api/portfolio/add", post(handlers::portfolio::add_position))
        .route("/api/portfolio/update/:code", post(handlers::portfolio::update_position))
        .route("/api/portfolio/delete/:code", post(handlers::portfolio::delete_position))
        .route("/api/watchlist", get(handlers::portfolio::list_watchlist))
        .route("/api/watchlist/add", post(handlers::portfolio::add_watch))
        .route("/api/watchlist/update/:code", post(handlers::portfolio::update_watch))
        .route("/api/watchlist/delete/:code", post(handlers::portfolio::delete_watch))
        .route("/api/trades", get(handlers::journal::list_trades))
        .route("/api/trade/add", post(handlers::journal::add_trade))
        .route("/api/trade/update/:id", post(handlers::journal::update_trade))
        .route("/api/trade/delete/:id", post(handlers::journal::delete_trade))
        .route("/api/trade_analysis", get(handlers::journal::trade_analysis))
        .route("/api/strategies", get(handlers::journal::list_strategies))
        .route("/api/strategy/add", post(handlers::journal::add_strategy))
        .route("/api/strategy/update/:id", post(handlers::journal::update_strategy))
        .route("/api/stock/:code", get(handlers::market::stock_indicators))
        .route("/api/strong_stocks", get(handlers::market::strong_stocks))
        .route(
            "/api/schedule",
            get(handlers::schedule::get_schedule).post(handlers::schedule::update_schedule),
        )
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Starting stockdash API server...");

    let config = Config::from_env()?;
    let db = get_db_connection(&config.database_url).await?;
    Migrator::up(&db, None).await?;
    info!("Database schema up to date");

    let bind_addr = config.bind_addr.clone();
    let static_dir = config.static_dir.clone();
    let state = Arc::new(AppState::new(&config, db));

    info!("Serving dashboard assets from: {}", static_dir);
    let app = app(state, &static_dir);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;

    use tower::ServiceExt;

    async fn test_app() -> Router {
        // a single connection keeps the in-memory database alive and shared
        let mut options = sea_orm::ConnectOptions::new("sqlite::memory:".to_string());
        options.max_connections(1);
        let db = sea_orm::Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        // keep the settings directory alive for the test's lifetime
        let dir = tempfile::tempdir().unwrap().into_path();
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            // unroutable: quote lookups must degrade, not hang
            market_base_url: "http://127.0.0.1:9/api/v4/data".to_string(),
            market_token: None,
            settings_path: dir.join("settings.json").to_string_lossy().into_owned(),
            static_dir: dir.to_string_lossy().into_owned(),
            bind_addr: "127.0.0.1:0".to_string(),
            bot_token: None,
            chat_id: None,
        };

        let state = Arc::new(AppState::new(&config, db));
        app(state, &config.static_dir)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = test_app().await;
        let response = app.oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn trade_lifecycle() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/trade/add",
                json!({
                    "code": "2330",
                    "name": "TSMC",
                    "buy_date": "2025-01-10",
                    "buy_price": 1050.0,
                    "sell_date": "2025-03-15",
                    "sell_price": 1180.0,
                    "shares": 1000,
                    "result": "success"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["id"], json!("TRD001"));

        let response = app
            .clone()
            .oneshot(get_req("/api/trades?stock=2330"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let trades = body_json(response).await;
        assert_eq!(trades.as_array().unwrap().len(), 1);
        assert_eq!(trades[0]["total_cost"], json!(1050000.0));
        assert_eq!(trades[0]["profit_loss"], json!(130000.0));

        let response = app
            .clone()
            .oneshot(get_req("/api/trade_analysis"))
            .await
            .unwrap();
        let report = body_json(response).await;
        assert_eq!(report["total_trades"], json!(1));
        assert_eq!(report["success_count"], json!(1));

        let response = app
            .clone()
            .oneshot(post_json("/api/trade/delete/TRD001", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(post_json("/api/trade/delete/TRD999", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "error": "not found" }));
    }

    #[tokio::test]
    async fn portfolio_crud_and_quote_degradation() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/portfolio/add",
                json!({
                    "code": "2330",
                    "name": "TSMC",
                    "cost": 1000.0,
                    "shares": 1000,
                    "stop_loss": 950.0
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // the upstream is unreachable: the row degrades to a zero quote
        let response = app.clone().oneshot(get_req("/api/portfolio")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let rows = body_json(response).await;
        assert_eq!(rows[0]["code"], json!("2330"));
        assert_eq!(rows[0]["current_price"], json!(0.0));
        assert_eq!(rows[0]["profit_loss_pct"], json!(0.0));
        assert_eq!(rows[0]["strategy"], json!("hold, awaiting breakeven"));

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/portfolio/update/9999",
                json!({ "cost": 1.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(post_json("/api/portfolio/delete/2330", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn strategy_library_lifecycle() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/strategy/add",
                json!({
                    "name": "KD golden cross",
                    "type": "swing",
                    "entry_condition": "K crosses above D below 20",
                    "stop_loss": 5.0,
                    "keywords": ["kd", "golden cross"]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], json!("STG001"));

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/strategy/update/STG001",
                json!({ "name": "KD golden cross", "risk_level": "medium" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.clone().oneshot(get_req("/api/strategies")).await.unwrap();
        let strategies = body_json(response).await;
        assert_eq!(strategies.as_array().unwrap().len(), 1);
        assert_eq!(strategies[0]["risk_level"], json!("medium"));
        assert_eq!(strategies[0]["keywords"], json!(["kd", "golden cross"]));

        let response = app
            .oneshot(post_json(
                "/api/strategy/update/STG999",
                json!({ "name": "missing" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn schedule_roundtrip_reloads_snapshot() {
        let app = test_app().await;

        let response = app.clone().oneshot(get_req("/api/schedule")).await.unwrap();
        let schedule = body_json(response).await;
        assert_eq!(schedule["morning"], json!("08:30"));

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/schedule",
                json!({
                    "schedule": {
                        "morning": "08:45",
                        "monitor": ["10:00"],
                        "evening": "15:30"
                    }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));

        let response = app.oneshot(get_req("/api/schedule")).await.unwrap();
        let schedule = body_json(response).await;
        assert_eq!(schedule["morning"], json!("08:45"));
        assert_eq!(schedule["monitor"], json!(["10:00"]));
    }
}
