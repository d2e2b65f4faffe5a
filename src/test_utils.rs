#[cfg(test)]
pub mod fixtures {
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::{
        app_state::AppState,
        config::Config,
        errors::AppResult,
        repositories::{InMemoryQuizRepository, InMemoryUserRepository},
        services::{model_service::QuestionModel, pdf_service::TextExtractor},
    };

    /// Model that always answers with the same reply.
    pub struct CannedModel(pub String);

    #[async_trait]
    impl QuestionModel for CannedModel {
        async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> AppResult<String> {
            Ok(self.0.clone())
        }
    }

    /// Extractor that ignores the bytes and returns fixed text.
    pub struct CannedText(pub String);

    impl TextExtractor for CannedText {
        fn extract(&self, _bytes: &[u8]) -> AppResult<String> {
            Ok(self.0.clone())
        }
    }

    pub fn test_state_with(model_reply: &str, document_text: &str) -> AppState {
        AppState::from_parts(
            Config::test_config(),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryQuizRepository::new()),
            Arc::new(CannedModel(model_reply.to_string())),
            Arc::new(CannedText(document_text.to_string())),
        )
    }

    /// State over in-memory storage with an empty model reply.
    pub fn test_state() -> AppState {
        test_state_with("{}", "Lecture notes")
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }

    /// Builds a single-file multipart/form-data body.
    pub fn multipart_body(
        boundary: &str,
        field: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
        body
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_state_uses_test_config() {
        let state = test_state();
        assert_eq!(state.config.mongo_db_name, "lecture-quiz-test");
        assert_eq!(state.config.bcrypt_cost, 4);
    }
}
