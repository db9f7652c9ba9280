use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Html,
    Json,
};
use utoipa::OpenApi;

use super::{
    dto::{DashboardRequest, DashboardResponse, DashboardStatus},
    errors::AppError,
};
use crate::{
    dashboard::DashboardService,
    db::models::HistoricalRecord,
    render::{
        stats::{Bin, DensityPoint},
        BarSeries, Chart, CurrentPanels, DistributionChart, GroupedBarChart, HistoryPanels,
        LineChart, MapMarker, MapPanel, MetricPanel, Placeholder, SeriesPoint,
    },
};

const INDEX_HTML: &str = include_str!("../../static/index.html");

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Fetch current weather for a city, store it, and return every dashboard
/// panel.
///
/// Pipeline failures are reported in the body with a non-2xx status; only a
/// malformed body or a blank city is rejected outright.
#[utoipa::path(
    post,
    path = "/api/dashboard",
    request_body = DashboardRequest,
    responses(
        (status = 200, description = "Reading saved; history loaded or empty", body = DashboardResponse),
        (status = 400, description = "Body is malformed or city is blank"),
        (status = 500, description = "Reading could not be saved or history could not be read", body = DashboardResponse),
        (status = 502, description = "Weather provider returned no data", body = DashboardResponse),
    ),
    tag = "dashboard"
)]
pub async fn post_dashboard(
    State(dashboard): State<DashboardService>,
    payload: Result<Json<DashboardRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DashboardResponse>), AppError> {
    let Json(req) = payload?;
    let outcome = dashboard.run(&req.city, req.region.as_deref()).await?;
    let resp = DashboardResponse::from(outcome);
    Ok((resp.status.http_status(), Json(resp)))
}

/// The interactive dashboard page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(post_dashboard, health),
    components(schemas(
        DashboardRequest,
        DashboardResponse,
        DashboardStatus,
        CurrentPanels,
        MetricPanel,
        MapPanel,
        MapMarker,
        HistoryPanels,
        HistoricalRecord,
        Chart,
        LineChart,
        SeriesPoint,
        GroupedBarChart,
        BarSeries,
        DistributionChart,
        Bin,
        DensityPoint,
        Placeholder,
    )),
    tags(
        (name = "dashboard", description = "Weather dashboard endpoints"),
        (name = "system",    description = "System endpoints"),
    ),
    info(
        title = "Weather Dashboard API",
        version = "0.1.0",
        description = "Fetches, stores and charts city weather readings"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum_test::TestServer;
    use serde_json::{json, Value};
    use sqlx::PgPool;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::{
        api::router, config::Config, dashboard::DashboardService, db::store::WeatherStore,
        weather::WeatherClient,
    };

    async fn test_server(pool: PgPool, provider_status: u16, provider_body: Value) -> (TestServer, MockServer) {
        let provider = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(provider_status).set_body_json(provider_body))
            .mount(&provider)
            .await;

        let config = Config {
            database_url: "postgres://unused".to_owned(),
            openweather_api_key: "test-key".to_owned(),
            openweather_base_url: provider.uri(),
            server_host: "127.0.0.1".to_owned(),
            server_port: 0,
            weather_timeout: Duration::from_secs(2),
            db_max_connections: 1,
        };
        let dashboard =
            DashboardService::new(WeatherClient::new(&config).unwrap(), WeatherStore::new(pool));

        (TestServer::new(router(dashboard)).unwrap(), provider)
    }

    fn paris_body() -> Value {
        json!({
            "coord": {"lon": 2.35, "lat": 48.85},
            "main": {"temp": 21.5, "pressure": 1012, "humidity": 60},
            "wind": {"speed": 3.2},
            "name": "Paris"
        })
    }

    // -----------------------------------------------------------------------
    // POST /api/dashboard
    // -----------------------------------------------------------------------

    #[sqlx::test(migrations = "./migrations")]
    async fn dashboard_for_paris_returns_all_panels(pool: PgPool) {
        let (server, _provider) = test_server(pool, 200, paris_body()).await;
        let resp = server
            .post("/api/dashboard")
            .json(&json!({ "city": "Paris", "region": null }))
            .await;
        resp.assert_status_ok();

        let body: Value = resp.json();
        assert_eq!(body["status"], "history_loaded");
        assert_eq!(body["saved"], true);
        assert_eq!(body["message"], "Weather data saved successfully!");

        let metrics = body["current"]["metrics"].as_array().unwrap();
        assert_eq!(metrics.len(), 4);
        assert_eq!(metrics[0]["display"], "21.5°C");
        assert_eq!(body["current"]["map"]["marker"]["latitude"], 48.85);
        assert_eq!(body["current"]["map"]["marker"]["longitude"], 2.35);

        let history = &body["history"];
        assert_eq!(history["title"], "Paris Historical Weather Data");
        assert_eq!(history["table"].as_array().unwrap().len(), 1);
        assert_eq!(history["table"][0]["temperature"], 21.5);

        let kinds: Vec<&str> = history["charts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["kind"].as_str().unwrap())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "line",
                "line",
                "line",
                "grouped_bar",
                "distribution",
                "distribution",
                "distribution"
            ]
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn region_may_be_omitted(pool: PgPool) {
        let (server, _provider) = test_server(pool, 200, paris_body()).await;
        let resp = server.post("/api/dashboard").json(&json!({ "city": "Paris" })).await;
        resp.assert_status_ok();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn history_grows_with_each_request(pool: PgPool) {
        let (server, _provider) = test_server(pool, 200, paris_body()).await;
        for _ in 0..2 {
            server.post("/api/dashboard").json(&json!({ "city": "Paris" })).await;
        }
        let body: Value = server
            .post("/api/dashboard")
            .json(&json!({ "city": "Paris" }))
            .await
            .json();
        assert_eq!(body["history"]["table"].as_array().unwrap().len(), 3);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn unknown_city_is_bad_gateway_without_success(pool: PgPool) {
        let (server, _provider) =
            test_server(pool.clone(), 404, json!({"cod": "404", "message": "city not found"})).await;
        let resp = server
            .post("/api/dashboard")
            .json(&json!({ "city": "Atlantis" }))
            .await;
        resp.assert_status(axum::http::StatusCode::BAD_GATEWAY);

        let body: Value = resp.json();
        assert_eq!(body["status"], "provider_unavailable");
        assert_eq!(body["saved"], false);
        assert!(body["current"].is_null());
        assert!(body["history"].is_null());

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weather_data")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn blank_city_is_bad_request(pool: PgPool) {
        let (server, _provider) = test_server(pool, 200, paris_body()).await;
        let resp = server.post("/api/dashboard").json(&json!({ "city": "  " })).await;
        resp.assert_status_bad_request();
        let body: Value = resp.json();
        assert_eq!(body["error"], "city must not be empty");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn missing_city_field_is_bad_request_json(pool: PgPool) {
        let (server, provider) = test_server(pool, 200, paris_body()).await;
        let resp = server
            .post("/api/dashboard")
            .json(&json!({ "region": "IL" }))
            .await;
        resp.assert_status_bad_request();

        let body: Value = resp.json();
        assert!(body["error"].as_str().unwrap().contains("city"));
        assert!(provider.received_requests().await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn store_failure_is_reported_with_current_panels(pool: PgPool) {
        sqlx::query("DROP TABLE weather_data").execute(&pool).await.unwrap();
        let (server, _provider) = test_server(pool, 200, paris_body()).await;

        let resp = server.post("/api/dashboard").json(&json!({ "city": "Paris" })).await;
        resp.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = resp.json();
        assert_eq!(body["status"], "store_write_failed");
        assert_eq!(body["saved"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Database Error:"));
        assert_eq!(body["current"]["city"], "Paris");
    }

    // -----------------------------------------------------------------------
    // GET /, /health, /api-docs/openapi.json
    // -----------------------------------------------------------------------

    #[sqlx::test(migrations = "./migrations")]
    async fn index_serves_dashboard_page(pool: PgPool) {
        let (server, _provider) = test_server(pool, 200, paris_body()).await;
        let resp = server.get("/").await;
        resp.assert_status_ok();
        assert!(resp.text().contains("Weather Dashboard"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn health_returns_ok(pool: PgPool) {
        let (server, _provider) = test_server(pool, 200, paris_body()).await;
        let resp = server.get("/health").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["status"], "ok");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn openapi_spec_is_served(pool: PgPool) {
        let (server, _provider) = test_server(pool, 200, paris_body()).await;
        let resp = server.get("/api-docs/openapi.json").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["info"]["title"], "Weather Dashboard API");
        assert!(body["paths"]["/api/dashboard"]["post"].is_object());
    }
}
