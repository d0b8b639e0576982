//! Router-level tests exercising the full request flow with real storage
//! and faked outbound collaborators.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Local;
use http_body_util::BodyExt;
use tower::ServiceExt;

use menuai::api::AppState;
use menuai::{
    Category, ChatClient, Menu, MenuAiConfig, MenuAiError, MenuItem, MenuStore, Orchestrator,
    Storage, SuggestionEngine, SuggestionStore, WeatherProvider, WeatherReading,
};

struct FakeWeather {
    fail: bool,
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current_weather(&self, location: &str) -> menuai::Result<WeatherReading> {
        if self.fail {
            return Err(MenuAiError::upstream("weather API unreachable"));
        }
        Ok(WeatherReading {
            temperature: 30,
            condition: "Despejado".to_string(),
            description: "cielo claro".to_string(),
            humidity: 40,
            location: location.to_string(),
        })
    }
}

struct FakeChat {
    reply: String,
}

#[async_trait]
impl ChatClient for FakeChat {
    async fn complete(&self, _system: &str, _user: &str) -> menuai::Result<String> {
        Ok(self.reply.clone())
    }
}

const GOOD_REPLY: &str =
    r#"{"starter":"A","mainDish":"B","dessert":"C","reasoning":"Light dishes for the heat."}"#;

fn config() -> MenuAiConfig {
    MenuAiConfig {
        openai_api_key: "test-key".to_string(),
        weather_api_key: "test-key".to_string(),
        restaurant_name: "default".to_string(),
        restaurant_location: "Córdoba".to_string(),
        data_dir: "unused".into(),
        port: 0,
        weather_base_url: "http://localhost/weather".to_string(),
        openai_base_url: "http://localhost/openai".to_string(),
    }
}

struct TestApp {
    router: Router,
    storage: Storage,
    // Keeps the storage directory alive for the test's duration.
    _dir: tempfile::TempDir,
}

fn test_app(weather_fails: bool, reply: &str) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = Storage::open(dir.path()).expect("storage");

    let engine = SuggestionEngine::new(Arc::new(FakeChat {
        reply: reply.to_string(),
    }));
    let orchestrator = Orchestrator::new(
        &config(),
        Arc::new(storage.menu_store()),
        Arc::new(storage.suggestion_store()),
        Arc::new(FakeWeather {
            fail: weather_fails,
        }),
        engine,
    );

    let router = menuai::api::router(AppState {
        orchestrator: Arc::new(orchestrator),
    });

    TestApp {
        router,
        storage,
        _dir: dir,
    }
}

fn item(name: &str, category: Category) -> MenuItem {
    MenuItem {
        id: name.to_lowercase(),
        name: name.to_string(),
        category,
        description: format!("{name} description"),
        ingredients: vec!["salt".to_string()],
        price: None,
        is_seasonal_dish: None,
        preferred_weather: None,
    }
}

fn menu() -> Menu {
    Menu {
        restaurant_name: "default".to_string(),
        items: vec![
            item("A", Category::Starter),
            item("B", Category::Main),
            item("C", Category::Dessert),
        ],
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("request should complete");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn upload_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/uploadMenu")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request")
}

fn suggestion_request() -> Request<Body> {
    Request::builder()
        .uri("/getSuggestion")
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn get_suggestion_without_menu_is_404() {
    let app = test_app(false, GOOD_REPLY);

    let (status, body) = send(&app.router, suggestion_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(
        body["error"]
            .as_str()
            .expect("error body")
            .contains("Menu not found")
    );
}

#[tokio::test]
async fn upload_then_get_suggestion_round_trip() {
    let app = test_app(false, GOOD_REPLY);

    let payload = serde_json::to_string(&menu()).expect("serialize menu");
    let (status, body) = send(&app.router, upload_request(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Menu uploaded successfully");
    assert_eq!(body["restaurantName"], "default");
    assert_eq!(body["itemCount"], 3);

    // The persisted menu reads back deep-equal to the upload.
    let stored = app
        .storage
        .menu_store()
        .get("default")
        .await
        .expect("store read")
        .expect("menu present");
    assert_eq!(stored, menu());

    let (status, body) = send(&app.router, suggestion_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], Local::now().date_naive().to_string());
    assert_eq!(body["weather"]["temperature"], 30);
    assert_eq!(body["weather"]["condition"], "Despejado");
    assert_eq!(body["suggestions"]["starter"]["name"], "A");
    assert_eq!(body["suggestions"]["mainDish"]["name"], "B");
    assert_eq!(body["suggestions"]["dessert"]["name"], "C");
    assert_eq!(body["reasoning"], "Light dishes for the heat.");

    // And the record was committed to the suggestion table.
    let today = Local::now().date_naive();
    let persisted = app
        .storage
        .suggestion_store()
        .for_date(today)
        .await
        .expect("suggestion query");
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].suggestions.main_dish.name, "B");
}

#[tokio::test]
async fn upload_with_empty_items_is_400() {
    let app = test_app(false, GOOD_REPLY);

    let payload = r#"{"restaurantName":"default","items":[]}"#.to_string();
    let (status, body) = send(&app.router, upload_request(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .expect("error body")
            .contains("Invalid")
    );

    // Nothing was persisted.
    let stored = app
        .storage
        .menu_store()
        .get("default")
        .await
        .expect("store read");
    assert!(stored.is_none());
}

#[tokio::test]
async fn upload_with_malformed_json_is_400() {
    let app = test_app(false, GOOD_REPLY);

    let (status, body) = send(&app.router, upload_request("not json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn uploading_twice_is_idempotent() {
    let app = test_app(false, GOOD_REPLY);

    let payload = serde_json::to_string(&menu()).expect("serialize menu");
    let (first, _) = send(&app.router, upload_request(payload.clone())).await;
    let (second, _) = send(&app.router, upload_request(payload)).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    let stored = app
        .storage
        .menu_store()
        .get("default")
        .await
        .expect("store read")
        .expect("menu present");
    assert_eq!(stored, menu());
}

#[tokio::test]
async fn weather_outage_is_500_with_error_body() {
    let app = test_app(true, GOOD_REPLY);

    let payload = serde_json::to_string(&menu()).expect("serialize menu");
    send(&app.router, upload_request(payload)).await;

    let (status, body) = send(&app.router, suggestion_request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["error"]
            .as_str()
            .expect("error body")
            .contains("unavailable")
    );
}

#[tokio::test]
async fn model_naming_unknown_dish_is_500_and_persists_nothing() {
    let app = test_app(
        false,
        r#"{"starter":"Z","mainDish":"B","dessert":"C","reasoning":"..."}"#,
    );

    let payload = serde_json::to_string(&menu()).expect("serialize menu");
    send(&app.router, upload_request(payload)).await;

    let (status, body) = send(&app.router, suggestion_request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["error"]
            .as_str()
            .expect("error body")
            .contains("model output")
    );

    let today = Local::now().date_naive();
    let persisted = app
        .storage
        .suggestion_store()
        .for_date(today)
        .await
        .expect("suggestion query");
    assert!(persisted.is_empty());
}
