use actix_multipart::form::{bytes::Bytes, MultipartForm};
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    middleware::get_request_id,
    models::dto::{
        request::{GenerateQuestionsQuery, PaginationParams, UpdateQuizRequest},
        response::MessageResponse,
    },
    services::{
        quiz_generation_service::{sha256_hex, QuestionCounts},
        quiz_service::resolve_title,
    },
};

#[derive(MultipartForm)]
pub struct PdfUploadForm {
    pub file: Bytes,
}

#[post("/generate-questions/")]
pub async fn generate_questions(
    auth: AuthenticatedUser,
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<GenerateQuestionsQuery>,
    MultipartForm(form): MultipartForm<PdfUploadForm>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let counts = QuestionCounts {
        num_mcq: query.num_mcq,
        num_tf: query.num_tf,
    };

    let generation = &state.generation_service;
    let limits = generation.limits();

    limits.validate_ranges(&counts)?;
    limits.validate_upload(
        form.file.content_type.as_ref().map(|mime| mime.essence_str()),
        form.file.data.len(),
    )?;
    limits.validate_counts(&counts)?;

    log::info!(
        "[{}] Generating quiz for user {} from {} byte upload",
        get_request_id(&req).unwrap_or_default(),
        auth.user_id(),
        form.file.data.len()
    );

    let digest = sha256_hex(&form.file.data);
    let questions = generation
        .generate_from_pdf(form.file.data.to_vec(), counts)
        .await?;

    let title = resolve_title(query.title.as_deref(), form.file.file_name.as_deref());
    let quiz = state
        .quiz_service
        .create_quiz(
            auth.user_id(),
            &title,
            form.file.file_name.clone(),
            &digest,
            questions,
        )
        .await?;

    Ok(HttpResponse::Created().json(quiz))
}

#[get("/quizzes")]
pub async fn list_quizzes(
    auth: AuthenticatedUser,
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .quiz_service
        .list_quizzes(auth.user_id(), &query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/quizzes/{id}")]
pub async fn get_quiz(
    auth: AuthenticatedUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&id, auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[put("/quizzes/{id}")]
pub async fn update_quiz(
    auth: AuthenticatedUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .update_quiz(&id, auth.user_id(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[delete("/quizzes/{id}")]
pub async fn delete_quiz(
    auth: AuthenticatedUser,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete_quiz(&id, auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Quiz deleted successfully.")))
}
