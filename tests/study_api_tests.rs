use axum::http::StatusCode;
use serde_json::json;

mod common;

fn save_payload(text: &str) -> serde_json::Value {
    json!({
        "text": text,
        "translation": "번역",
        "target_language": "ko",
        "source_language": "en",
        "tts_service": "google",
        "voice_speed": "normal",
    })
}

#[tokio::test]
async fn test_guest_save_defers_to_local_storage() {
    let app = common::create_test_app().await;

    let response = app
        .post_json("/api/study/save", None, save_payload("hello"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["guest"], true);
    assert_eq!(body["message"], "Use localStorage for guest users");
}

#[tokio::test]
async fn test_save_rejects_empty_text() {
    let app = common::create_test_app().await;

    let response = app
        .post_json("/api/study/save", None, json!({ "text": "" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "Text is required");
}

#[tokio::test]
async fn test_repeat_save_updates_in_place() {
    let app = common::create_test_app().await;
    let token = common::register_and_login(&app, "ivan", "ivan@example.com").await;

    let response = app
        .post_json("/api/study/save", Some(&token), save_payload("hello world"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Study item saved to database");
    let first_id = body["item_id"].as_i64().unwrap();

    let mut payload = save_payload("hello world");
    payload["translation"] = json!("새 번역");
    let response = app.post_json("/api/study/save", Some(&token), payload).await;
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Study item updated in database");
    // The id is the creation instant and survives the update.
    assert_eq!(body["item_id"].as_i64().unwrap(), first_id);

    let response = app.get("/api/study/history", Some(&token)).await;
    let body = common::body_json(response).await;
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["text"], "hello world");
    assert_eq!(history[0]["translation"], "새 번역");
    assert_eq!(history[0]["accessed_count"], 2);
    assert_eq!(history[0]["id"].as_i64().unwrap(), first_id);
}

#[tokio::test]
async fn test_different_texts_are_distinct_items() {
    let app = common::create_test_app().await;
    let token = common::register_and_login(&app, "judy", "judy@example.com").await;

    // Exact string match only: trailing punctuation makes a new item.
    for text in ["hello", "hello!", "Hello"] {
        let response = app
            .post_json("/api/study/save", Some(&token), save_payload(text))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.get("/api/study/history", Some(&token)).await;
    let body = common::body_json(response).await;
    assert_eq!(body["history"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_history_is_newest_first() {
    let app = common::create_test_app().await;
    let token = common::register_and_login(&app, "ken", "ken@example.com").await;

    let mut ids = Vec::new();
    for text in ["first", "second", "third"] {
        let response = app
            .post_json("/api/study/save", Some(&token), save_payload(text))
            .await;
        let body = common::body_json(response).await;
        ids.push(body["item_id"].as_i64().unwrap());
        // Distinct creation instants keep the ordering observable.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let response = app.get("/api/study/history", Some(&token)).await;
    let body = common::body_json(response).await;
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 3);
    let listed: Vec<i64> = history
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect();
    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(listed, expected);
    assert!(history[0]["date"].as_str().unwrap().contains("/"));
}

#[tokio::test]
async fn test_delete_selected_matches_within_one_second() {
    let app = common::create_test_app().await;
    let token = common::register_and_login(&app, "lena", "lena@example.com").await;

    let response = app
        .post_json("/api/study/save", Some(&token), save_payload("windowed"))
        .await;
    let body = common::body_json(response).await;
    let item_id = body["item_id"].as_i64().unwrap();

    // Outside the ±1s window: nothing is deleted.
    let response = app
        .delete_json(
            "/api/study/delete-selected",
            Some(&token),
            json!({ "item_ids": [item_id + 1001] }),
        )
        .await;
    let body = common::body_json(response).await;
    assert_eq!(body["deleted_count"], 0);

    // Just inside the window: the row goes away.
    let response = app
        .delete_json(
            "/api/study/delete-selected",
            Some(&token),
            json!({ "item_ids": [item_id + 999] }),
        )
        .await;
    let body = common::body_json(response).await;
    assert_eq!(body["deleted_count"], 1);
    assert_eq!(body["message"], "Deleted 1 selected study records");

    let response = app.get("/api/study/history", Some(&token)).await;
    let body = common::body_json(response).await;
    assert!(body["history"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_selected_accepts_string_ids_and_skips_junk() {
    let app = common::create_test_app().await;
    let token = common::register_and_login(&app, "mark", "mark@example.com").await;

    let response = app
        .post_json("/api/study/save", Some(&token), save_payload("stringy"))
        .await;
    let body = common::body_json(response).await;
    let item_id = body["item_id"].as_i64().unwrap();

    let response = app
        .delete_json(
            "/api/study/delete-selected",
            Some(&token),
            json!({ "item_ids": [item_id.to_string(), "not-a-number", null] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["deleted_count"], 1);
}

#[tokio::test]
async fn test_delete_selected_tolerates_extreme_ids() {
    let app = common::create_test_app().await;
    let token = common::register_and_login(&app, "ruth", "ruth@example.com").await;

    app.post_json("/api/study/save", Some(&token), save_payload("survivor"))
        .await;

    let response = app
        .delete_json(
            "/api/study/delete-selected",
            Some(&token),
            json!({ "item_ids": [i64::MAX, i64::MIN] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["deleted_count"], 0);

    let response = app.get("/api/study/history", Some(&token)).await;
    let body = common::body_json(response).await;
    assert_eq!(body["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_selected_rejects_empty_list() {
    let app = common::create_test_app().await;
    let token = common::register_and_login(&app, "nina", "nina@example.com").await;

    let response = app
        .delete_json(
            "/api/study/delete-selected",
            Some(&token),
            json!({ "item_ids": [] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "No item IDs provided");
}

#[tokio::test]
async fn test_delete_all_reports_count() {
    let app = common::create_test_app().await;
    let token = common::register_and_login(&app, "oscar", "oscar@example.com").await;

    for text in ["one", "two"] {
        app.post_json("/api/study/save", Some(&token), save_payload(text))
            .await;
    }

    let response = app.delete("/api/study/delete-all", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["deleted_count"], 2);
    assert_eq!(body["message"], "Deleted 2 study records");

    let response = app.delete("/api/study/delete-all", Some(&token)).await;
    let body = common::body_json(response).await;
    assert_eq!(body["deleted_count"], 0);
}

#[tokio::test]
async fn test_history_is_scoped_per_user() {
    let app = common::create_test_app().await;
    let token_a = common::register_and_login(&app, "pat", "pat@example.com").await;
    let token_b = common::register_and_login(&app, "quinn", "quinn@example.com").await;

    app.post_json("/api/study/save", Some(&token_a), save_payload("mine"))
        .await;

    let response = app.get("/api/study/history", Some(&token_b)).await;
    let body = common::body_json(response).await;
    assert!(body["history"].as_array().unwrap().is_empty());
}
