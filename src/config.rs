use std::env;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

const DEFAULT_JWT_SECRET: &str = "dev_secret_key_change_in_production";
const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub users_collection: String,
    pub quizzes_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: Option<String>,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
    pub llm_endpoint: String,
    pub llm_model: String,
    pub llm_api_key: SecretString,
    pub llm_temperature: f32,
    pub llm_timeout_secs: u64,
    pub max_pdf_bytes: usize,
    pub max_questions_per_type: u32,
    pub max_total_questions: u32,
    pub chunk_size: usize,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            app_env: var_or("APP_ENV", "development"),
            mongo_conn_string: var_or("MONGO_CONN_STRING", "mongodb://localhost:27017"),
            mongo_db_name: var_or("MONGO_DB_NAME", "lecture-quiz-local"),
            users_collection: var_or("USERS_COLLECTION", "users"),
            quizzes_collection: var_or("QUIZZES_COLLECTION", "quizzes"),
            web_server_host: var_or("WEB_SERVER_HOST", "localhost"),
            web_server_port: parsed_or("WEB_SERVER_PORT", 8080),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
            jwt_secret: SecretString::from(var_or("JWT_SECRET", DEFAULT_JWT_SECRET)),
            jwt_expiration_hours: parsed_or("JWT_EXPIRATION_HOURS", 24),
            bcrypt_cost: parsed_or("BCRYPT_COST", bcrypt::DEFAULT_COST),
            llm_endpoint: var_or("LLM_ENDPOINT", "https://models.github.ai/inference"),
            llm_model: var_or("LLM_MODEL", "openai/gpt-4.1"),
            llm_api_key: SecretString::from(var_or("GITHUB_TOKEN", "")),
            llm_temperature: parsed_or("LLM_TEMPERATURE", 0.3),
            llm_timeout_secs: parsed_or("LLM_TIMEOUT_SECS", 120),
            max_pdf_bytes: parsed_or("MAX_PDF_BYTES", 10 * 1024 * 1024),
            max_questions_per_type: parsed_or("MAX_QUESTIONS_PER_TYPE", 20),
            max_total_questions: parsed_or("MAX_TOTAL_QUESTIONS", 20),
            chunk_size: parsed_or("CHUNK_SIZE", 3500),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Rejects configuration that must never reach a production deployment.
    pub fn validate_for_production(&self) -> AppResult<()> {
        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEFAULT_JWT_SECRET {
            return Err(AppError::InternalError(
                "JWT_SECRET is using the default value. Set it to a secure random string."
                    .to_string(),
            ));
        }

        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::InternalError(format!(
                "JWT_SECRET is too short ({}). Must be at least {} characters.",
                jwt_secret.len(),
                MIN_JWT_SECRET_LEN
            )));
        }

        if self.llm_api_key.expose_secret().is_empty() {
            return Err(AppError::InternalError(
                "GITHUB_TOKEN is not set. The model endpoint requires an API token.".to_string(),
            ));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            app_env: "test".to_string(),
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "lecture-quiz-test".to_string(),
            users_collection: "users".to_string(),
            quizzes_collection: "quizzes".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: None,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            bcrypt_cost: 4,
            llm_endpoint: "http://localhost:9999".to_string(),
            llm_model: "test-model".to_string(),
            llm_api_key: SecretString::from("test-token".to_string()),
            llm_temperature: 0.3,
            llm_timeout_secs: 5,
            max_pdf_bytes: 10 * 1024 * 1024,
            max_questions_per_type: 20,
            max_total_questions: 20,
            chunk_size: 3500,
        }
    }
}
