use actix_multipart::form::MultipartFormConfig;
use actix_web::web;

use crate::{app_state::AppState, errors::AppError};

pub mod auth_handler;
pub mod health_handler;
pub mod quiz_handler;

pub use auth_handler::{login, me, register};
pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use quiz_handler::{delete_quiz, generate_questions, get_quiz, list_quizzes, update_quiz};

/// Headroom for multipart framing on top of the PDF size limit.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Registers shared state, extractor configuration and every route.
pub fn configure(cfg: &mut web::ServiceConfig, state: web::Data<AppState>) {
    let upload_limit = state.config.max_pdf_bytes + MULTIPART_OVERHEAD_BYTES;

    cfg.app_data(state)
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AppError::ValidationError(format!("Invalid request body: {}", err)).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            AppError::ValidationError(format!("Invalid query parameters: {}", err)).into()
        }))
        .app_data(
            MultipartFormConfig::default()
                .total_limit(upload_limit)
                .memory_limit(upload_limit)
                .error_handler(|err, _req| {
                    AppError::ValidationError(format!("Invalid upload: {}", err)).into()
                }),
        )
        .service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(register)
        .service(login)
        .service(me)
        .service(generate_questions)
        .service(list_quizzes)
        .service(get_quiz)
        .service(update_quiz)
        .service(delete_quiz);
}
