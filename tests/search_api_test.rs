use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    extract::{Query, State},
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use job_search_backend::{config::Config, routes, AppState};
use serde_json::{json, Value as JsonValue};
use tokio::net::TcpListener;
use tower::ServiceExt;

type Captured = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind upstream");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/search.json", addr)
}

async fn spawn_capturing_upstream(fixture: JsonValue) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let upstream = Router::new()
        .route(
            "/search.json",
            get(
                move |State(captured): State<Captured>,
                      Query(params): Query<HashMap<String, String>>| async move {
                    captured.lock().unwrap().push(params);
                    Json(fixture).into_response()
                },
            ),
        )
        .with_state(captured.clone());
    (spawn_upstream(upstream).await, captured)
}

fn config(base_url: &str, key: Option<&str>) -> Config {
    Config {
        serpapi_key: key.map(str::to_string),
        serpapi_base_url: base_url.to_string(),
        upstream_timeout_secs: 5,
        ..Default::default()
    }
}

fn search_app(config: &Config) -> Router {
    let state = AppState::from_config(config).expect("state");
    Router::new()
        .route(
            "/api/search-jobs",
            post(job_search_backend::routes::search::search_jobs),
        )
        .with_state(state)
}

fn search_request(body: JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/search-jobs")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(resp: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn upstream_fixture() -> JsonValue {
    json!({
        "search_metadata": { "id": "meta-123", "status": "Success" },
        "jobs_results": [
            {
                "title": "Desenvolvedor Backend",
                "company_name": "Ferrugem Tech",
                "location": "São Paulo, SP",
                "via": "via LinkedIn",
                "description": "Vaga remota para Desenvolvedor Júnior, salário R$ 3.000 - R$ 4.000",
                "detected_extensions": { "posted_at": "há 2 dias" },
                "apply_options": [{ "title": "LinkedIn", "link": "https://linkedin.com/jobs/1" }]
            },
            {
                "title": "Analista de Sistemas",
                "company_name": "Banco Central Sul",
                "description": "Contratação PJ, modelo híbrido, início imediato",
                "extensions": ["Candidatura simplificada"]
            },
            { "title": "Estágio em TI", "description": "Estágio presencial" },
            { "title": "Suporte", "description": "Contrato temporário" },
            {}
        ]
    })
}

#[tokio::test]
async fn missing_credential_returns_500_with_empty_jobs() {
    let app = search_app(&config("http://127.0.0.1:9/search.json", None));

    let resp = app
        .oneshot(search_request(json!({ "query": "", "location": "São Paulo" })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(resp).await;
    assert_eq!(body["error"], json!("API key not configured"));
    assert_eq!(body["jobs"], json!([]));
}

#[tokio::test]
async fn upstream_error_status_and_body_are_propagated() {
    let upstream = Router::new().route(
        "/search.json",
        get(|| async { (StatusCode::TOO_MANY_REQUESTS, "Your account has run out of searches.") }),
    );
    let base_url = spawn_upstream(upstream).await;
    let app = search_app(&config(&base_url, Some("test-key")));

    let resp = app
        .oneshot(search_request(json!({ "query": "rust", "location": "" })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = read_json(resp).await;
    assert_eq!(body["error"], json!("Failed to fetch jobs from SerpApi"));
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("run out of searches"));
    assert_eq!(body["jobs"], json!([]));
}

#[tokio::test]
async fn successful_search_builds_query_and_normalizes_results() {
    let (base_url, captured) = spawn_capturing_upstream(upstream_fixture()).await;
    let app = search_app(&config(&base_url, Some("test-key")));

    let resp = app
        .oneshot(search_request(json!({
            "query": "",
            "location": "São Paulo",
            "modalities": ["Remoto"]
        })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;

    let calls = captured.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    let params = &calls[0];
    assert_eq!(params["engine"], "google_jobs");
    assert_eq!(params["q"], "vagas de emprego São Paulo remoto trabalho remoto");
    assert_eq!(params["hl"], "pt-br");
    assert_eq!(params["gl"], "br");
    assert_eq!(params["location"], "São Paulo");
    assert_eq!(params["api_key"], "test-key");

    assert_eq!(body["total_results"], json!(5));
    assert_eq!(body["search_metadata"]["id"], json!("meta-123"));

    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 5);
    let featured: Vec<bool> = jobs.iter().map(|j| j["isFeatured"].as_bool().unwrap()).collect();
    assert_eq!(featured, vec![true, true, true, false, false]);

    let first = &jobs[0];
    assert_eq!(first["modality"], json!("Remoto"));
    assert_eq!(first["level"], json!("Júnior"));
    assert_eq!(first["type"], json!("CLT"));
    assert_eq!(first["salary"], json!("R$ 3.000 - R$ 4.000"));
    assert_eq!(first["source"], json!("LinkedIn"));
    assert_eq!(first["postedAt"], json!("há 2 dias"));
    assert_eq!(first["applicationUrl"], json!("https://linkedin.com/jobs/1"));

    let second = &jobs[1];
    assert_eq!(second["type"], json!("PJ"));
    assert_eq!(second["modality"], json!("Híbrido"));
    assert_eq!(second["isUrgent"], json!(true));
    assert_eq!(second["isSimplified"], json!(true));

    assert_eq!(jobs[2]["type"], json!("Estágio"));
    assert_eq!(jobs[3]["type"], json!("Temporário"));

    let sparse = &jobs[4];
    assert_eq!(sparse["title"], json!("Vaga sem título"));
    assert_eq!(sparse["applicationUrl"], json!("#"));
    assert!(sparse.get("salary").is_none());
}

#[tokio::test]
async fn transport_failure_returns_500_with_empty_jobs() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let app = search_app(&config(&format!("http://{}/search.json", addr), Some("test-key")));

    let resp = app
        .oneshot(search_request(json!({ "query": "rust", "location": "Recife" })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(resp).await;
    assert!(body["error"].is_string());
    assert_eq!(body["jobs"], json!([]));
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = search_app(&config("http://127.0.0.1:9/search.json", Some("test-key")));
    let req = Request::builder()
        .method("POST")
        .uri("/api/search-jobs")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = read_json(resp).await;
    assert_eq!(body["jobs"], json!([]));
}

#[tokio::test]
async fn preflight_and_health_are_served_by_full_app() {
    let state = AppState::from_config(&config("http://127.0.0.1:9/search.json", None)).unwrap();
    let app = routes::app(state);

    let preflight = Request::builder()
        .method("OPTIONS")
        .uri("/api/search-jobs")
        .header("origin", "https://vagas.example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(preflight).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    let health = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(health).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await["status"], json!("online"));

    let docs = Request::builder()
        .method("GET")
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(docs).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(read_json(resp).await["paths"]["/api/search-jobs"].is_object());
}

#[tokio::test]
async fn null_fields_in_one_result_keep_the_rest_of_the_batch() {
    let fixture = json!({
        "jobs_results": [
            { "title": "Boa vaga", "description": "remoto" },
            { "job_highlights": null, "apply_options": [{ "link": "https://x", "is_direct": null }] }
        ]
    });
    let (base_url, _) = spawn_capturing_upstream(fixture).await;
    let app = search_app(&config(&base_url, Some("test-key")));

    let resp = app
        .oneshot(search_request(json!({ "query": "dev" })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["title"], json!("Boa vaga"));
    assert_eq!(jobs[0]["modality"], json!("Remoto"));
    assert_eq!(jobs[1]["applicationUrl"], json!("https://x"));
    assert_eq!(jobs[1]["isSimplified"], json!(false));
}

#[tokio::test]
async fn long_query_reaches_upstream_unchanged() {
    let (base_url, captured) = spawn_capturing_upstream(json!({ "jobs_results": [] })).await;
    let app = search_app(&config(&base_url, Some("test-key")));
    let query = "a".repeat(300);

    let resp = app
        .oneshot(search_request(json!({ "query": query, "levels": vec!["Pleno"; 12] })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let calls = captured.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert!(calls[0]["q"].starts_with(&query));
    assert!(calls[0]["q"].ends_with("Pleno"));
}

#[tokio::test]
async fn rapid_searches_are_never_throttled() {
    let state = AppState::from_config(&config("http://127.0.0.1:9/search.json", None)).unwrap();
    let app = routes::app(state);

    for _ in 0..30 {
        let resp = app
            .clone()
            .oneshot(search_request(json!({ "query": "dev" })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_json(resp).await["error"], json!("API key not configured"));
    }
}
