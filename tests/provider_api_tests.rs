use axum::http::StatusCode;
use serde_json::json;

mod common;

// Providers in the test app point at an unreachable address, so these
// exercise the failover paths: translation lands on the built-in dictionary
// and TTS falls back to browser synthesis.

#[tokio::test]
async fn test_translate_requires_text() {
    let app = common::create_test_app().await;

    let response = app
        .post_json("/api/translate", None, json!({ "text": "" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "Text is required");
}

#[tokio::test]
async fn test_guest_translation_falls_back_to_dictionary() {
    let app = common::create_test_app().await;

    let response = app
        .post_json("/api/translate", None, json!({ "text": "hello" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["service"], "basic");
    assert_eq!(body["translation"], "안녕하세요");
}

#[tokio::test]
async fn test_dictionary_translates_word_by_word() {
    let app = common::create_test_app().await;

    let response = app
        .post_json("/api/translate", None, json!({ "text": "thank you" }))
        .await;
    let body = common::body_json(response).await;
    assert_eq!(body["translation"], "감사합니다");
}

#[tokio::test]
async fn test_dictionary_passes_unknown_text_through() {
    let app = common::create_test_app().await;

    let response = app
        .post_json("/api/translate", None, json!({ "text": "xylophone cadenza" }))
        .await;
    let body = common::body_json(response).await;
    assert_eq!(body["service"], "basic");
    assert_eq!(body["translation"], "xylophone cadenza");
}

#[tokio::test]
async fn test_translation_with_keys_still_degrades_to_dictionary() {
    let app = common::create_test_app().await;
    let token = common::register_and_login(&app, "rita", "rita@example.com").await;

    app.put_json(
        "/api/auth/profile",
        Some(&token),
        json!({ "groq_api_key": "gk-1", "google_translate_api_key": "gt-1" }),
    )
    .await;

    let response = app
        .post_json("/api/translate", Some(&token), json!({ "text": "good morning" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["service"], "basic");
    assert_eq!(body["translation"], "좋은 아침");
}

#[tokio::test]
async fn test_tts_requires_text() {
    let app = common::create_test_app().await;

    let response = app
        .post_json("/api/text-to-speech", None, json!({ "text": "" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_guest_tts_falls_back_to_browser() {
    let app = common::create_test_app().await;

    let response = app
        .post_json(
            "/api/text-to-speech",
            None,
            json!({ "text": "hello", "speed": "slow", "source_language": "en" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["service"], "browser");
    assert_eq!(body["use_browser_tts"], true);
    assert_eq!(body["message"], "Use browser TTS fallback");
}

#[tokio::test]
async fn test_tts_with_keys_still_falls_back_to_browser() {
    let app = common::create_test_app().await;
    let token = common::register_and_login(&app, "sven", "sven@example.com").await;

    app.put_json(
        "/api/auth/profile",
        Some(&token),
        json!({ "elevenlabs_api_key": "el-1", "google_tts_api_key": "gc-1" }),
    )
    .await;

    let response = app
        .post_json(
            "/api/text-to-speech",
            Some(&token),
            json!({ "text": "hello", "service": "auto", "source_language": "en" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["use_browser_tts"], true);
}
