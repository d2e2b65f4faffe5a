use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{GeneratedQuestions, Quiz},
        dto::{
            request::{PaginationParams, UpdateQuizRequest},
            response::{PaginatedResponse, QuizDto},
        },
    },
    repositories::QuizRepository,
};

const UNTITLED_QUIZ: &str = "Untitled quiz";

/// Matches the title length accepted by quiz updates.
pub const MAX_TITLE_CHARS: usize = 200;

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuizRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_quiz(
        &self,
        user_id: &str,
        title: &str,
        source_filename: Option<String>,
        source_digest: &str,
        questions: GeneratedQuestions,
    ) -> AppResult<QuizDto> {
        let quiz = Quiz::new(user_id, title, source_filename, source_digest, questions);
        let quiz = self.repository.create(quiz).await?;

        log::info!(
            "Saved quiz {} with {} question(s) for user {}",
            quiz.id,
            quiz.question_count(),
            user_id
        );

        Ok(quiz.into())
    }

    pub async fn get_quiz(&self, id: &str, user_id: &str) -> AppResult<QuizDto> {
        self.find_owned(id, user_id).await.map(QuizDto::from)
    }

    pub async fn list_quizzes(
        &self,
        user_id: &str,
        pagination: &PaginationParams,
    ) -> AppResult<PaginatedResponse<QuizDto>> {
        pagination.validate()?;

        let offset = pagination.offset();
        let limit = pagination.limit();
        let (items, total) = self.repository.list_by_user(user_id, offset, limit).await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(QuizDto::from).collect(),
            total,
            offset,
            limit,
        })
    }

    pub async fn update_quiz(
        &self,
        id: &str,
        user_id: &str,
        request: UpdateQuizRequest,
    ) -> AppResult<QuizDto> {
        request.validate()?;

        let mut quiz = self.find_owned(id, user_id).await?;

        if let Some(title) = request.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(AppError::ValidationError("Title must not be blank.".to_string()));
            }
            quiz.title = title.to_string();
        }

        if let Some(multiple_choice) = request.multiple_choice {
            if let Some(position) = multiple_choice.iter().position(|q| !q.has_valid_answer()) {
                return Err(AppError::ValidationError(format!(
                    "multiple_choice[{}] needs at least two options and an answer matching one of them.",
                    position
                )));
            }
            quiz.multiple_choice = multiple_choice;
        }

        if let Some(true_false) = request.true_false {
            if let Some(position) = true_false.iter().position(|q| !q.has_valid_answer()) {
                return Err(AppError::ValidationError(format!(
                    "true_false[{}] answer must be \"True\" or \"False\".",
                    position
                )));
            }
            quiz.true_false = true_false;
        }

        quiz.touch();
        let updated = self.repository.update(quiz).await?;
        Ok(updated.into())
    }

    pub async fn delete_quiz(&self, id: &str, user_id: &str) -> AppResult<()> {
        self.repository.delete(id, user_id).await?;
        log::info!("Deleted quiz {} for user {}", id, user_id);
        Ok(())
    }

    async fn find_owned(&self, id: &str, user_id: &str) -> AppResult<Quiz> {
        self.repository
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }
}

/// Title for a new quiz: the explicit title, else the file stem, else a placeholder.
/// Long titles are cut to `MAX_TITLE_CHARS` characters.
pub fn resolve_title(requested: Option<&str>, file_name: Option<&str>) -> String {
    let title = pick_title(requested, file_name);
    match title.char_indices().nth(MAX_TITLE_CHARS) {
        Some((cut, _)) => title[..cut].trim_end().to_string(),
        None => title,
    }
}

fn pick_title(requested: Option<&str>, file_name: Option<&str>) -> String {
    if let Some(title) = requested.map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_string();
    }

    file_name
        .map(|name| name.rsplit(['/', '\\']).next().unwrap_or(name))
        .map(|name| {
            let lower = name.to_ascii_lowercase();
            if lower.ends_with(".pdf") {
                &name[..name.len() - 4]
            } else {
                name
            }
        })
        .map(str::trim)
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNTITLED_QUIZ.to_string())
}
