// Integration tests for Recipe Finder

use actix_web::{http::StatusCode, test, web, App};
use mockito::{Matcher, Server, ServerGuard};
use recipe_finder::core::{transform_search_response, Phase, SearchSession};
use recipe_finder::routes::{self, recipes::AppState};
use recipe_finder::services::{ProviderErrorKind, ProxyClient, SpoonacularClient};
use recipe_finder::SearchFilters;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

fn state_for(server: &ServerGuard) -> web::Data<AppState> {
    web::Data::new(AppState {
        spoonacular: Some(Arc::new(SpoonacularClient::new(server.url(), "test_key".to_string()))),
    })
}

#[actix_web::test]
async fn test_search_end_to_end() {
    let mut provider = Server::new_async().await;
    let mock = provider
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apiKey".into(), "test_key".into()),
            Matcher::UrlEncoded("query".into(), "pasta".into()),
            Matcher::UrlEncoded("number".into(), "12".into()),
            Matcher::UrlEncoded("addRecipeInformation".into(), "true".into()),
            Matcher::UrlEncoded("fillIngredients".into(), "true".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results":[{"id":1,"title":"Pasta","cuisines":null}],"totalResults":1}"#)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(state_for(&provider))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/recipes/search?query=pasta").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(headers.get("access-control-allow-methods").unwrap(), "GET, OPTIONS");
    assert_eq!(headers.get("access-control-allow-headers").unwrap(), "Content-Type");

    let body: Value = test::read_body_json(resp).await;
    assert!(body["results"].is_array());

    let recipes = transform_search_response(&body);
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].title, "Pasta");
    assert!(recipes[0].cuisines.is_empty());
    assert!(!recipes[0].is_favorite);

    mock.assert_async().await;
}

#[actix_web::test]
async fn test_search_forwards_filters() {
    let mut provider = Server::new_async().await;
    let mock = provider
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "curry".into()),
            Matcher::UrlEncoded("diet".into(), "vegan".into()),
            Matcher::UrlEncoded("cuisine".into(), "Indian".into()),
            Matcher::UrlEncoded("intolerances".into(), "gluten".into()),
            Matcher::UrlEncoded("type".into(), "main course".into()),
            Matcher::UrlEncoded("maxReadyTime".into(), "30".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results":[]}"#)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(state_for(&provider))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/recipes/search?query=curry&diet=vegan&cuisine=Indian&intolerances=gluten&type=main%20course&maxReadyTime=30")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["results"], json!([]));
    mock.assert_async().await;
}

#[actix_web::test]
async fn test_unknown_filters_reach_provider() {
    let mut provider = Server::new_async().await;
    let mock = provider
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apiKey".into(), "test_key".into()),
            Matcher::UrlEncoded("query".into(), "pasta".into()),
            Matcher::UrlEncoded("sort".into(), "popularity".into()),
            Matcher::UrlEncoded("number".into(), "5".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results":[]}"#)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(state_for(&provider))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/recipes/search?query=pasta&sort=popularity&number=5&apiKey=stolen")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    mock.assert_async().await;
}

#[actix_web::test]
async fn test_non_numeric_max_ready_time_passes_through() {
    let mut provider = Server::new_async().await;
    let mock = provider
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::UrlEncoded("maxReadyTime".into(), "quick".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results":[]}"#)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(state_for(&provider))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/recipes/search?query=eggs&maxReadyTime=quick")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    mock.assert_async().await;
}

#[actix_web::test]
async fn test_blank_query_never_reaches_provider() {
    let mut provider = Server::new_async().await;
    let mock = provider
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(state_for(&provider))
            .configure(routes::configure_routes),
    )
    .await;

    for uri in ["/api/recipes/search", "/api/recipes/search?query=", "/api/recipes/search?query=%20%20"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Query parameter is required"}));
    }

    mock.assert_async().await;
}

#[actix_web::test]
async fn test_invalid_recipe_id_never_reaches_provider() {
    let mut provider = Server::new_async().await;
    let mock = provider
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(state_for(&provider))
            .configure(routes::configure_routes),
    )
    .await;

    for uri in ["/api/recipe/abc", "/api/recipe/1.5", "/api/recipe/12abc"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Valid recipe ID is required"}));
    }

    mock.assert_async().await;
}

#[actix_web::test]
async fn test_recipe_details_pass_through() {
    let mut provider = Server::new_async().await;
    let recipe = json!({
        "id": 716429,
        "title": "Pasta with Garlic",
        "extendedIngredients": [{"id": 1, "name": "garlic", "amount": 2, "unit": "cloves", "original": "2 cloves garlic"}],
        "nutrition": {"nutrients": [{"name": "Calories", "amount": 584.46, "unit": "kcal"}]}
    });
    let mock = provider
        .mock("GET", "/recipes/716429/information")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apiKey".into(), "test_key".into()),
            Matcher::UrlEncoded("includeNutrition".into(), "true".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recipe.to_string())
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(state_for(&provider))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/recipe/716429").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("access-control-allow-origin").unwrap(), "*");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, recipe);
    mock.assert_async().await;
}

#[actix_web::test]
async fn test_provider_error_messages() {
    let mut provider = Server::new_async().await;
    let cases = [
        (
            "message",
            402,
            r#"{"status":"failure","code":402,"message":"Your daily points limit of 150 has been reached."}"#,
            "Your daily points limit of 150 has been reached.",
        ),
        ("status-message", 401, r#"{"statusMessage":"Unauthorized"}"#, "Unauthorized"),
        ("empty", 503, "", "Failed to search recipes"),
    ];

    for (query, status, body, _) in cases {
        let _m = provider
            .mock("GET", "/recipes/complexSearch")
            .match_query(Matcher::UrlEncoded("query".into(), query.into()))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
    }

    let app = test::init_service(
        App::new()
            .app_data(state_for(&provider))
            .configure(routes::configure_routes),
    )
    .await;

    for (query, _, _, expected) in cases {
        let req = test::TestRequest::get()
            .uri(&format!("/api/recipes/search?query={}", query))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": expected }));
    }
}

#[actix_web::test]
async fn test_detail_provider_error_default_message() {
    let mut provider = Server::new_async().await;
    let _m = provider
        .mock("GET", "/recipes/42/information")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(state_for(&provider))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/recipe/42").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Failed to get recipe details"}));
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    // Nothing listens on port 1
    let client = SpoonacularClient::new("http://127.0.0.1:1".to_string(), "secret_key".to_string());

    let err = client
        .search_recipes("pasta", &SearchFilters::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ProviderErrorKind::Transport);
    assert!(err.status.is_none());
    assert!(!err.message.is_empty());
    assert!(!err.message.contains("secret_key"));
}

/// Accepts connections and never answers
async fn silent_provider() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{}", addr)
}

fn slow_client(base_url: String) -> SpoonacularClient {
    SpoonacularClient::with_options(base_url, "secret_key".to_string(), Duration::from_millis(200), 12)
}

#[actix_web::test]
async fn test_silent_provider_times_out() {
    let client = slow_client(silent_provider().await);

    let err = client
        .search_recipes("pasta", &SearchFilters::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ProviderErrorKind::Timeout);
    assert!(err.status.is_none());
    assert!(!err.message.is_empty());
    assert!(!err.message.contains("secret_key"));
}

#[actix_web::test]
async fn test_provider_timeout_is_server_error() {
    let state = web::Data::new(AppState {
        spoonacular: Some(Arc::new(slow_client(silent_provider().await))),
    });
    let app = test::init_service(App::new().app_data(state).configure(routes::configure_routes)).await;

    let req = test::TestRequest::get().uri("/api/recipe/716429").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    let message = body["error"].as_str().unwrap();
    assert!(!message.is_empty());
    assert!(!message.contains("secret_key"));
}

#[actix_web::test]
async fn test_unknown_api_path_has_error_body() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState { spoonacular: None }))
            .configure(routes::configure_routes),
    )
    .await;

    for uri in ["/api/recipe/", "/api/recipes"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "uri: {}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Not found"}));
    }
}

#[actix_web::test]
async fn test_cors_preflight() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState { spoonacular: None }))
            .wrap(routes::cors())
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/recipes/search?query=pasta")
        .insert_header(("Origin", "https://recipes.example"))
        .insert_header(("Access-Control-Request-Method", "GET"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("access-control-allow-origin").unwrap(), "*");
}

#[tokio::test]
async fn test_identical_searches_transform_identically() {
    let mut proxy = Server::new_async().await;
    let _m = proxy
        .mock("GET", "/api/recipes/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results":[{"id":1,"title":"Pasta","diets":["vegan"]},{"id":2,"title":"Soup"}]}"#)
        .expect(2)
        .create_async()
        .await;

    let client = ProxyClient::new(proxy.url());
    let first = client.search("pasta", &SearchFilters::default()).await.unwrap();
    let second = client.search("pasta", &SearchFilters::default()).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_session_against_proxy() {
    let mut proxy = Server::new_async().await;
    let _search = proxy
        .mock("GET", "/api/recipes/search")
        .match_query(Matcher::UrlEncoded("query".into(), "pasta".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results":[{"id":1,"title":"Pasta","cuisines":null},{"id":2,"title":"Lasagna"}]}"#)
        .create_async()
        .await;
    let _detail = proxy
        .mock("GET", "/api/recipe/2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": 2,
                "title": "Lasagna",
                "instructions": "<ol><li>Layer</li><li>Bake</li></ol>",
                "nutrition": {"nutrients": [
                    {"name": "Calories", "amount": 650, "unit": "kcal"},
                    {"name": "Protein", "amount": 32.5, "unit": "g"}
                ]}
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _missing = proxy
        .mock("GET", "/api/recipe/1")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"Failed to get recipe details"}"#)
        .create_async()
        .await;

    let client = ProxyClient::new(proxy.url());
    let mut session = SearchSession::new();
    session.set_input_query("pasta");

    session.run_search(&client).await.unwrap();
    assert_eq!(session.phase(), Phase::Results);
    assert_eq!(session.results().len(), 2);
    assert_eq!(session.drain_notifications()[0].description, "Found 2 recipes");

    session.toggle_favorite(2);
    session.open_recipe(&client, 2).await.unwrap();
    assert_eq!(session.phase(), Phase::DetailShown);

    let detail = session.selected().unwrap();
    assert!(detail.is_favorite());
    assert_eq!(detail.instructions.len(), 2);
    assert_eq!(detail.nutrition.calories, "650");
    assert_eq!(detail.nutrition.protein, "32.5");
    assert_eq!(detail.nutrition.fat, "N/A");

    session.close_detail();
    session.drain_notifications();

    session.open_recipe(&client, 1).await.unwrap();
    assert_eq!(session.phase(), Phase::Results);
    assert_eq!(session.results().len(), 2);

    let notes = session.drain_notifications();
    assert_eq!(notes[0].title, "Failed to load recipe details");
    assert_eq!(notes[0].description, "Failed to get recipe details");
}
