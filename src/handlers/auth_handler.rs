use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{LoginRequest, RegisterRequest},
        response::{LoginResponse, MeResponse, MessageResponse},
    },
};

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    state.user_service.register(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(MessageResponse::new("User registered successfully.")))
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.authenticate(request.into_inner()).await?;
    let token = state.jwt_service.create_token(&user)?;

    log::info!("User {} logged in", user.id);

    Ok(HttpResponse::Ok().json(LoginResponse::bearer(token)))
}

#[get("/me")]
pub async fn me(auth: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse::from(auth.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    use crate::{handlers::configure, test_utils::fixtures::test_state};

    #[actix_web::test]
    async fn register_login_me_flow() {
        let state = web::Data::new(test_state());
        let app =
            test::init_service(App::new().configure(|cfg| configure(cfg, state.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({
                "username": "johndoe",
                "email": "john@example.com",
                "password": "correct horse"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "User registered successfully.");

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "john@example.com", "password": "correct horse" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let token = body["access_token"].as_str().expect("token in response").to_string();
        assert_eq!(body["token_type"], "bearer");

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["username"], "johndoe");
        assert_eq!(body["email"], "john@example.com");
        assert!(body["user_id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[actix_web::test]
    async fn login_with_unknown_email_is_bad_request() {
        let state = web::Data::new(test_state());
        let app =
            test::init_service(App::new().configure(|cfg| configure(cfg, state.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "ghost@example.com", "password": "whatever" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid email or password.");
    }

    #[actix_web::test]
    async fn malformed_json_is_bad_request() {
        let state = web::Data::new(test_state());
        let app =
            test::init_service(App::new().configure(|cfg| configure(cfg, state.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/register")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"username\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn me_with_garbage_token_is_unauthorized() {
        let state = web::Data::new(test_state());
        let app =
            test::init_service(App::new().configure(|cfg| configure(cfg, state.clone()))).await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid token.");
    }
}
