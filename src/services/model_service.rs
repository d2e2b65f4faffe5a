use std::time::Duration;

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        question::{FALSE_ANSWER, TRUE_ANSWER},
        GeneratedQuestions, MultipleChoiceQuestion, TrueFalseQuestion,
    },
};

/// A chat model that turns a prompt into raw text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionModel: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> AppResult<String>;
}

/// Chat-completions client for any OpenAI-compatible endpoint (GitHub Models by default).
pub struct OpenAiQuestionModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiQuestionModel {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.llm_endpoint.trim_end_matches('/'))
            .with_api_key(config.llm_api_key.expose_secret());

        Self {
            client: Client::with_config(openai_config),
            model: config.llm_model.clone(),
            temperature: config.llm_temperature,
            timeout: Duration::from_secs(config.llm_timeout_secs),
        }
    }
}

#[async_trait]
impl QuestionModel for OpenAiQuestionModel {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> AppResult<String> {
        let request = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": self.temperature,
            "top_p": 1.0,
            "response_format": { "type": "json_object" },
        });

        let chat = self.client.chat();
        let call = chat.create_byot(request);
        let response: ChatCompletionResponse = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| {
                AppError::ModelError(format!(
                    "Model call timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| AppError::ModelError(format!("Failed to call model: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::ModelError("Failed to call model: response had no content".to_string())
            })
    }
}

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*\s*\n(.*?)\n?\s*```\s*$")
        .expect("CODE_FENCE is a valid regex pattern")
});

#[derive(Debug, Deserialize)]
struct RawGeneratedQuestions {
    #[serde(default)]
    multiple_choice: Vec<MultipleChoiceQuestion>,
    #[serde(default)]
    true_false: Vec<RawTrueFalseQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawTrueFalseQuestion {
    statement: String,
    answer: Value,
}

/// Decodes the model's reply into questions.
///
/// Accepts a bare JSON object, one wrapped in a Markdown code fence, or a JSON
/// string that itself holds the encoded object.
pub fn parse_model_output(raw: &str) -> AppResult<GeneratedQuestions> {
    let unfenced = CODE_FENCE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw);

    let invalid_json = || AppError::ModelError("Model output was not valid JSON.".to_string());

    let mut value: Value = serde_json::from_str(unfenced.trim()).map_err(|_| invalid_json())?;
    if let Value::String(inner) = &value {
        value = serde_json::from_str(inner).map_err(|_| invalid_json())?;
    }

    let raw_questions: RawGeneratedQuestions = serde_json::from_value(value).map_err(|e| {
        AppError::ModelError(format!(
            "Model output did not match the expected question format: {}",
            e
        ))
    })?;

    let true_false = raw_questions
        .true_false
        .into_iter()
        .filter_map(|q| match normalize_true_false(&q.answer) {
            Some(answer) => Some(TrueFalseQuestion {
                statement: q.statement,
                answer: answer.to_string(),
            }),
            None => {
                log::warn!(
                    "Dropping true/false statement with unusable answer {}: {}",
                    q.answer,
                    q.statement
                );
                None
            }
        })
        .collect();

    let multiple_choice = raw_questions
        .multiple_choice
        .into_iter()
        .filter(|q| {
            let valid = q.has_valid_answer();
            if !valid {
                log::warn!(
                    "Dropping multiple choice question with answer {:?} outside its options: {}",
                    q.answer,
                    q.question
                );
            }
            valid
        })
        .collect();

    Ok(GeneratedQuestions {
        multiple_choice,
        true_false,
    })
}

fn normalize_true_false(answer: &Value) -> Option<&'static str> {
    match answer {
        Value::Bool(true) => Some(TRUE_ANSWER),
        Value::Bool(false) => Some(FALSE_ANSWER),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "t" => Some(TRUE_ANSWER),
            "false" | "f" => Some(FALSE_ANSWER),
            _ => None,
        },
        _ => None,
    }
}
