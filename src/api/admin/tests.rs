use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::Section;
use crate::test_support;

fn document() -> serde_json::Value {
    json!({
        "title": "Addition warm-up",
        "grade": 2,
        "subject": "Math",
        "totalQuestions": 1,
        "sections": [
            {
                "name": "A",
                "questions": [
                    {"id": 1, "question": "2+2?", "options": ["3", "4", "5"], "answer": "4"}
                ]
            }
        ]
    })
}

fn admin_token(ctx: &test_support::TestContext) -> String {
    test_support::bearer_token("admin-1", "admin@school.org", ctx.state.settings())
}

async fn import(ctx: &test_support::TestContext, token: &str, body: &str) -> serde_json::Value {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::raw_request(Method::POST, "/api/v1/admin/assessments", token, body))
        .await
        .expect("import");
    let status = response.status();
    let json = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {json}");
    json
}

#[tokio::test]
async fn imported_assessment_shows_in_review_and_editor() {
    let ctx = test_support::setup_test_context().await;
    let token = admin_token(&ctx);

    let created = import(&ctx, &token, &document().to_string()).await;
    let assessment_id = created["assessment"]["id"].as_str().expect("id").to_string();
    assert!(created["warnings"].as_array().unwrap().is_empty());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/admin/answers/{assessment_id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("review");
    assert_eq!(response.status(), StatusCode::OK);
    let review = test_support::read_json(response).await;
    assert_eq!(review["sections"][0]["name"], "A");
    assert_eq!(review["sections"][0]["answers"][0]["display"], "b - 4");
    assert_eq!(review["unresolved_count"], 0);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/admin/assessments/{assessment_id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("editor");
    assert_eq!(response.status(), StatusCode::OK);
    let editor = test_support::read_json(response).await;
    let option = &editor["sections"][0]["questions"][0]["options"][1];
    assert_eq!(option["display"], "B. 4");
    assert_eq!(option["correct"], true);
    assert_eq!(editor["sections"][0]["question_count"], 1);
}

#[tokio::test]
async fn invalid_document_is_rejected_without_insert() {
    let ctx = test_support::setup_test_context().await;
    let token = admin_token(&ctx);

    let mut bad = document();
    bad["sections"][0]["questions"][0]["answer"] = json!("9");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::raw_request(
            Method::POST,
            "/api/v1/admin/assessments",
            &token,
            &bad.to_string(),
        ))
        .await
        .expect("import");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test_support::read_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("sections[0].questions[0]"));

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::raw_request(
            Method::POST,
            "/api/v1/admin/assessments",
            &token,
            "{ not json",
        ))
        .await
        .expect("import");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assessments")
        .fetch_one(ctx.state.db())
        .await
        .expect("count");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn listing_paginates_most_recent_first() {
    let ctx = test_support::setup_test_context().await;
    let token = admin_token(&ctx);

    for index in 0..3 {
        let section = Section {
            name: "A".to_string(),
            questions: vec![test_support::question(1, "1+1?", &["2", "3"], "2")],
        };
        test_support::insert_assessment(
            ctx.state.db(),
            &format!("Quiz {index}"),
            3,
            "Math",
            vec![section],
        )
        .await;
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/admin/assessments?page=2&page_size=2",
            Some(&token),
            None,
        ))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    let page = test_support::read_json(response).await;
    assert_eq!(page["total_count"], 3);
    assert_eq!(page["page_count"], 2);
    assert_eq!(page["has_previous"], true);
    assert_eq!(page["has_next"], false);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["items"][0]["title"], "Quiz 0");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/admin/assessments?page=0",
            Some(&token),
            None,
        ))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_honors_precondition() {
    let ctx = test_support::setup_test_context().await;
    let token = admin_token(&ctx);
    let created = import(&ctx, &token, &document().to_string()).await;
    let assessment_id = created["assessment"]["id"].as_str().unwrap().to_string();
    let updated_at = created["assessment"]["updated_at"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/admin/assessments/{assessment_id}");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({"title": "Addition", "expected_updated_at": updated_at})),
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::OK);
    let first = test_support::read_json(response).await;
    assert_eq!(first["title"], "Addition");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({"total_questions": 9, "expected_updated_at": updated_at})),
        ))
        .await
        .expect("stale update");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({"total_questions": 9})),
        ))
        .await
        .expect("unconditional update");
    assert_eq!(response.status(), StatusCode::OK);
    let last = test_support::read_json(response).await;
    assert_eq!(last["total_questions"], 9);
    assert_eq!(last["title"], "Addition");
}

#[tokio::test]
async fn question_edit_rechecks_answer() {
    let ctx = test_support::setup_test_context().await;
    let token = admin_token(&ctx);
    let created = import(&ctx, &token, &document().to_string()).await;
    let assessment_id = created["assessment"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/admin/assessments/{assessment_id}/sections/0/questions/0");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({"answer": "7"})),
        ))
        .await
        .expect("bad edit");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({"answer": "3"})),
        ))
        .await
        .expect("index edit");
    assert_eq!(response.status(), StatusCode::OK);
    let editor = test_support::read_json(response).await;
    assert_eq!(editor["sections"][0]["questions"][0]["options"][2]["correct"], true);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/v1/admin/assessments/{assessment_id}/sections/4"),
            Some(&token),
            Some(json!({"name": "B"})),
        ))
        .await
        .expect("missing section");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn section_rename_keeps_questions() {
    let ctx = test_support::setup_test_context().await;
    let token = admin_token(&ctx);
    let created = import(&ctx, &token, &document().to_string()).await;
    let assessment_id = created["assessment"]["id"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/v1/admin/assessments/{assessment_id}/sections/0"),
            Some(&token),
            Some(json!({"name": "Part one"})),
        ))
        .await
        .expect("rename");
    assert_eq!(response.status(), StatusCode::OK);
    let editor = test_support::read_json(response).await;
    assert_eq!(editor["sections"][0]["name"], "Part one");
    assert_eq!(editor["sections"][0]["question_count"], 1);
}

#[tokio::test]
async fn duplicate_and_delete_flow() {
    let ctx = test_support::setup_test_context().await;
    let token = admin_token(&ctx);
    let created = import(&ctx, &token, &document().to_string()).await;
    let assessment_id = created["assessment"]["id"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/admin/assessments/{assessment_id}/duplicate"),
            Some(&token),
            None,
        ))
        .await
        .expect("duplicate");
    assert_eq!(response.status(), StatusCode::CREATED);
    let copy = test_support::read_json(response).await;
    assert_eq!(copy["assessment"]["title"], "Addition warm-up (copy)");
    assert_ne!(copy["assessment"]["id"], assessment_id.as_str());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/admin/assessments/{assessment_id}/duplicate"),
            Some(&token),
            Some(json!({"title": "Retake"})),
        ))
        .await
        .expect("titled duplicate");
    assert_eq!(response.status(), StatusCode::CREATED);
    let copy = test_support::read_json(response).await;
    assert_eq!(copy["assessment"]["title"], "Retake");

    let uri = format!("/api/v1/admin/assessments/{assessment_id}");
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::DELETE, &uri, Some(&token), None))
        .await
        .expect("unconfirmed delete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("{uri}?confirm=true"),
            Some(&token),
            None,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, &uri, Some(&token), None))
        .await
        .expect("fetch deleted");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn template_round_trips_through_import() {
    let ctx = test_support::setup_test_context().await;
    let token = admin_token(&ctx);
    let created = import(&ctx, &token, &document().to_string()).await;
    let assessment_id = created["assessment"]["id"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/admin/assessments/{assessment_id}/template"),
            Some(&token),
            None,
        ))
        .await
        .expect("template");
    assert_eq!(response.status(), StatusCode::OK);
    let template = test_support::read_json(response).await;
    assert!(template.get("id").is_none());

    let reimported = import(&ctx, &token, &template.to_string()).await;
    assert_eq!(reimported["assessment"]["subject"], "Math");
}

#[tokio::test]
async fn student_catalog_and_take_view() {
    let ctx = test_support::setup_test_context().await;
    let token = admin_token(&ctx);
    let created = import(&ctx, &token, &document().to_string()).await;
    let assessment_id = created["assessment"]["id"].as_str().unwrap().to_string();

    let mut art = document();
    art["grade"] = json!(1);
    art["subject"] = json!("Art");
    import(&ctx, &token, &art.to_string()).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/catalog", None, None))
        .await
        .expect("catalog");
    assert_eq!(response.status(), StatusCode::OK);
    let catalog = test_support::read_json(response).await;
    assert_eq!(catalog["grades"], json!([1, 2]));
    assert_eq!(catalog["pairs"][0]["subject"], "Art");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/assessments?grade=2&subject=Math",
            None,
            None,
        ))
        .await
        .expect("browse");
    let listed = test_support::read_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/assessments/{assessment_id}"),
            None,
            None,
        ))
        .await
        .expect("take");
    assert_eq!(response.status(), StatusCode::OK);
    let take = test_support::read_json(response).await;
    let question = &take["sections"][0]["questions"][0];
    assert_eq!(question["options"][1]["display"], "b) 4");
    assert!(question.get("answer").is_none());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/assessments/does-not-exist",
            None,
            None,
        ))
        .await
        .expect("take missing");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn page_beyond_addressable_rows_is_rejected() {
    let ctx = test_support::setup_router_context().await;
    let token = admin_token(&ctx);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/admin/assessments?page=9223372036854775807",
            Some(&token),
            None,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test_support::read_json(response).await;
    assert_eq!(body["detail"], "page is out of range");
}

#[tokio::test]
async fn malformed_duplicate_body_is_rejected() {
    let ctx = test_support::setup_router_context().await;
    let token = admin_token(&ctx);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/admin/assessments/any-id/duplicate",
            Some(&token),
            Some(json!({"title": 5})),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
