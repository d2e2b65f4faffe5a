use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    auth::Claims,
    models::domain::{MultipleChoiceQuestion, Quiz, TrueFalseQuestion},
};

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

impl LoginResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub user_id: String,
    pub username: String,
    pub email: String,
}

impl From<Claims> for MeResponse {
    fn from(claims: Claims) -> Self {
        MeResponse {
            user_id: claims.sub,
            username: claims.username,
            email: claims.email,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizDto {
    pub id: String,
    pub title: String,
    pub source_filename: Option<String>,
    pub source_digest: String,
    pub question_count: usize,
    pub multiple_choice: Vec<MultipleChoiceQuestion>,
    pub true_false: Vec<TrueFalseQuestion>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<Quiz> for QuizDto {
    fn from(quiz: Quiz) -> Self {
        QuizDto {
            question_count: quiz.question_count(),
            id: quiz.id,
            title: quiz.title,
            source_filename: quiz.source_filename,
            source_digest: quiz.source_digest,
            multiple_choice: quiz.multiple_choice,
            true_false: quiz.true_false,
            created_at: quiz.created_at,
            modified_at: quiz.modified_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}
