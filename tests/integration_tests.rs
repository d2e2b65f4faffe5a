use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{json, Value};

use lecture_quiz_server::{
    app_state::AppState,
    config::Config,
    errors::AppResult,
    handlers,
    middleware::{RequestIdMiddleware, REQUEST_ID_HEADER},
    repositories::{InMemoryQuizRepository, InMemoryUserRepository},
    services::{model_service::QuestionModel, pdf_service::TextExtractor},
};

const BOUNDARY: &str = "----integration-boundary";

const MODEL_REPLY: &str = r#"```json
{
  "multiple_choice": [
    {"question": "Which organelle produces ATP?", "options": ["Nucleus", "Mitochondria", "Ribosome", "Golgi"], "answer": "Mitochondria"},
    {"question": "What does DNA stand for?", "options": ["Deoxyribonucleic acid", "Dinitro acid", "Dual nucleic acid", "None"], "answer": "Deoxyribonucleic acid"}
  ],
  "true_false": [
    {"statement": "Ribosomes synthesize proteins", "answer": true},
    {"statement": "The nucleus stores ATP", "answer": "False"}
  ]
}
```"#;

struct StubModel;

#[async_trait]
impl QuestionModel for StubModel {
    async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> AppResult<String> {
        Ok(MODEL_REPLY.to_string())
    }
}

struct StubExtractor;

impl TextExtractor for StubExtractor {
    fn extract(&self, _bytes: &[u8]) -> AppResult<String> {
        Ok("Cells contain organelles. Mitochondria produce ATP.".to_string())
    }
}

fn config() -> Config {
    Config {
        app_env: "test".to_string(),
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "lecture-quiz-integration".to_string(),
        users_collection: "users".to_string(),
        quizzes_collection: "quizzes".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        cors_allowed_origin: None,
        jwt_secret: SecretString::from("integration_jwt_secret".to_string()),
        jwt_expiration_hours: 1,
        bcrypt_cost: 4,
        llm_endpoint: "http://localhost:9999".to_string(),
        llm_model: "stub-model".to_string(),
        llm_api_key: SecretString::from("stub-token".to_string()),
        llm_temperature: 0.3,
        llm_timeout_secs: 5,
        max_pdf_bytes: 1024 * 1024,
        max_questions_per_type: 20,
        max_total_questions: 20,
        chunk_size: 3500,
    }
}

fn state() -> web::Data<AppState> {
    let config = config();

    web::Data::new(AppState::from_parts(
        config,
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryQuizRepository::new()),
        Arc::new(StubModel),
        Arc::new(StubExtractor),
    ))
}

fn multipart(file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(uri: &str, token: &str, body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
}

macro_rules! app {
    ($state:expr) => {{
        let state = $state.clone();
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .configure(move |cfg| handlers::configure(cfg, state.clone())),
        )
        .await
    }};
}

macro_rules! register_and_login {
    ($app:expr, $username:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({ "username": $username, "email": $email, "password": "s3cure-pass" }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": $email, "password": "s3cure-pass" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body["access_token"].as_str().unwrap().to_string()
    }};
}

#[actix_web::test]
async fn full_quiz_lifecycle() {
    let state = state();
    let app = app!(state);
    let token = register_and_login!(app, "student", "Student@Example.com");

    let req = upload_request(
        "/generate-questions/?num_mcq=2&num_tf=1",
        &token,
        multipart("Cell Biology.pdf", "application/pdf", b"%PDF-1.7 lecture"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));

    let quiz: Value = test::read_body_json(resp).await;
    assert_eq!(quiz["title"], "Cell Biology");
    assert_eq!(quiz["source_filename"], "Cell Biology.pdf");
    assert_eq!(quiz["multiple_choice"].as_array().unwrap().len(), 2);
    assert_eq!(quiz["true_false"].as_array().unwrap().len(), 1);
    assert_eq!(quiz["true_false"][0]["answer"], "True");
    let id = quiz["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/quizzes")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], id.as_str());

    let req = test::TestRequest::put()
        .uri(&format!("/quizzes/{}", id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "title": "Midterm review", "true_false": [] }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["title"], "Midterm review");
    assert_eq!(updated["question_count"], 2);

    let req = test::TestRequest::delete()
        .uri(&format!("/quizzes/{}", id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Quiz deleted successfully.");

    let req = test::TestRequest::get()
        .uri(&format!("/quizzes/{}", id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn quizzes_are_private_to_their_owner() {
    let state = state();
    let app = app!(state);
    let alice = register_and_login!(app, "alice", "alice@example.com");
    let bob = register_and_login!(app, "bob", "bob@example.com");

    let req = upload_request(
        "/generate-questions/?num_mcq=1&title=Week%201",
        &alice,
        multipart("w1.pdf", "application/pdf", b"%PDF"),
    )
    .to_request();
    let quiz: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(quiz["title"], "Week 1");
    let id = quiz["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/quizzes/{}", id))
        .insert_header(("Authorization", format!("Bearer {}", bob)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/quizzes")
        .insert_header(("Authorization", format!("Bearer {}", bob)))
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total"], 0);
}

#[actix_web::test]
async fn duplicate_registration_is_rejected() {
    let state = state();
    let app = app!(state);
    register_and_login!(app, "carol", "carol@example.com");

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({
            "username": "carol2",
            "email": "CAROL@example.com",
            "password": "another-pass"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Email already registered.");
}

#[actix_web::test]
async fn generation_validation_errors() {
    let state = state();
    let app = app!(state);
    let token = register_and_login!(app, "dave", "dave@example.com");

    let cases: Vec<(&str, &str, Vec<u8>, &str)> = vec![
        (
            "/generate-questions/?num_mcq=1",
            "image/png",
            b"png".to_vec(),
            "File must be a PDF.",
        ),
        (
            "/generate-questions/?num_mcq=1",
            "application/pdf",
            vec![b'x'; 1024 * 1024 + 1],
            "PDF is too large. Maximum allowed size is 1MB.",
        ),
        (
            "/generate-questions/?num_mcq=0&num_tf=0",
            "application/pdf",
            b"%PDF".to_vec(),
            "You must request at least one question.",
        ),
        (
            "/generate-questions/?num_mcq=15&num_tf=10",
            "application/pdf",
            b"%PDF".to_vec(),
            "Total number of questions must not exceed 20.",
        ),
        (
            "/generate-questions/?num_mcq=21",
            "application/pdf",
            b"%PDF".to_vec(),
            "num_mcq must be between 0 and 20.",
        ),
    ];

    for (uri, content_type, data, expected) in cases {
        let req =
            upload_request(uri, &token, multipart("doc.pdf", content_type, &data)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], expected);
    }
}

#[actix_web::test]
async fn protected_routes_require_a_token() {
    let state = state();
    let app = app!(state);

    for uri in ["/me", "/quizzes", "/quizzes/abc"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Not authenticated");
    }
}

#[actix_web::test]
async fn liveness_probe_reports_alive() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/health/live").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "alive");
}
