use once_cell::sync::Lazy;

use crate::models::domain::GeneratedQuestions;

pub const QUIZ_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant for generating study quizzes.";

const QUIZ_PROMPT_TEMPLATE: &str = "You are an expert educational assistant.

Given the following lecture notes, generate:
- {num_mcq} Multiple Choice Questions (each with 4 answer choices and the correct answer clearly marked)
- {num_tf} True/False Questions (clearly stating if the statement is True or False)

Lecture Notes:
---
{notes}
---

Important:
Output your response strictly in the following JSON format:

{
  \"multiple_choice\": [
    {
      \"question\": \"Your MCQ question here\",
      \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],
      \"answer\": \"The correct option text here\"
    }
  ],
  \"true_false\": [
    {
      \"statement\": \"Your True/False statement here\",
      \"answer\": \"True\"
    }
  ]
}

The object must validate against this JSON Schema:
{schema}

The answer of a multiple choice question must repeat the text of one of its options exactly.
The answer of a true/false statement must be exactly \"True\" or \"False\".
Do not invent material outside the lecture notes.
Do not include any explanations, headings, or extra text outside the JSON.
Only output a single valid JSON object.";

static RESPONSE_SCHEMA: Lazy<String> = Lazy::new(|| {
    let schema = schemars::schema_for!(GeneratedQuestions);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
});

pub fn response_schema() -> &'static str {
    &RESPONSE_SCHEMA
}

/// Builds the user prompt for a single chunk of lecture notes.
pub fn build_quiz_prompt(notes: &str, num_mcq: usize, num_tf: usize) -> String {
    QUIZ_PROMPT_TEMPLATE
        .replace("{num_mcq}", &num_mcq.to_string())
        .replace("{num_tf}", &num_tf.to_string())
        .replace("{schema}", response_schema())
        .replace("{notes}", notes.trim())
}
