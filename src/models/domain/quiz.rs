use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::question::{
    GeneratedQuestions, MultipleChoiceQuestion, TrueFalseQuestion,
};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub user_id: String,                 // Owner, taken from the token subject
    pub title: String,
    pub source_filename: Option<String>, // Name of the uploaded PDF, if the client sent one
    pub source_digest: String,           // SHA-256 hex of the uploaded bytes
    pub multiple_choice: Vec<MultipleChoiceQuestion>,
    pub true_false: Vec<TrueFalseQuestion>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(
        user_id: &str,
        title: &str,
        source_filename: Option<String>,
        source_digest: &str,
        questions: GeneratedQuestions,
    ) -> Self {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            source_filename,
            source_digest: source_digest.to_string(),
            multiple_choice: questions.multiple_choice,
            true_false: questions.true_false,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn question_count(&self) -> usize {
        self.multiple_choice.len() + self.true_false.len()
    }

    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}
