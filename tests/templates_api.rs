//! Integration tests for the template catalog endpoint.

mod common;

use axum::http::StatusCode;
use common::{ScriptedRenderer, TemplateScript, build_test_app, body_json, get, healthy_app};

// ---------------------------------------------------------------------------
// Test: catalog listing passes the live provider catalog through
// ---------------------------------------------------------------------------

#[tokio::test]
async fn templates_pass_through_live_catalog() {
    let app = healthy_app();
    let response = get(app.router, "/api/memes/templates").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["success"], true);
    let templates = json["data"].as_array().unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0]["id"], "181913649");
    assert_eq!(templates[0]["box_count"], 2);
}

// ---------------------------------------------------------------------------
// Test: a dead provider is absorbed by the built-in fallback catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn templates_fall_back_when_provider_is_down() {
    let app = build_test_app(ScriptedRenderer::new(
        TemplateScript::Down,
        common::CaptionScript::Unavailable,
    ));
    let response = get(app.router, "/api/memes/templates").await;

    // Catalog browsing never fails, whatever the provider state.
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["success"], true);
    let templates = json["data"].as_array().unwrap();
    assert_eq!(templates.len(), 9);

    // Every fallback entry carries all six attributes.
    for t in templates {
        assert!(!t["id"].as_str().unwrap().is_empty());
        assert!(!t["name"].as_str().unwrap().is_empty());
        assert!(t["url"].as_str().unwrap().starts_with("https://"));
        assert!(t["width"].as_u64().unwrap() > 0);
        assert!(t["height"].as_u64().unwrap() > 0);
        assert!(t["box_count"].as_u64().unwrap() > 0);
    }
}
