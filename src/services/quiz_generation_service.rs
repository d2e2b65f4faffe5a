use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::{
    config::Config,
    constants::quiz_prompt::{build_quiz_prompt, QUIZ_SYSTEM_PROMPT},
    errors::{AppError, AppResult},
    models::domain::GeneratedQuestions,
    services::{
        model_service::{parse_model_output, QuestionModel},
        pdf_service::TextExtractor,
        text_chunker::{distribute, split_text_into_chunks},
    },
};

const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionCounts {
    pub num_mcq: u32,
    pub num_tf: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct GenerationLimits {
    pub max_pdf_bytes: usize,
    pub max_questions_per_type: u32,
    pub max_total_questions: u32,
    pub chunk_size: usize,
}

impl From<&Config> for GenerationLimits {
    fn from(config: &Config) -> Self {
        Self {
            max_pdf_bytes: config.max_pdf_bytes,
            max_questions_per_type: config.max_questions_per_type,
            max_total_questions: config.max_total_questions,
            chunk_size: config.chunk_size,
        }
    }
}

impl QuestionCounts {
    pub fn total(&self) -> u32 {
        self.num_mcq.saturating_add(self.num_tf)
    }
}

impl GenerationLimits {
    /// Per-type bounds only; these are part of query validation.
    pub fn validate_ranges(&self, counts: &QuestionCounts) -> AppResult<()> {
        for (name, value) in [("num_mcq", counts.num_mcq), ("num_tf", counts.num_tf)] {
            if value > self.max_questions_per_type {
                return Err(AppError::ValidationError(format!(
                    "{} must be between 0 and {}.",
                    name, self.max_questions_per_type
                )));
            }
        }
        Ok(())
    }

    pub fn validate_counts(&self, counts: &QuestionCounts) -> AppResult<()> {
        self.validate_ranges(counts)?;

        if counts.total() == 0 {
            return Err(AppError::ValidationError(
                "You must request at least one question.".to_string(),
            ));
        }

        if counts.total() > self.max_total_questions {
            return Err(AppError::ValidationError(format!(
                "Total number of questions must not exceed {}.",
                self.max_total_questions
            )));
        }

        Ok(())
    }

    pub fn validate_upload(&self, content_type: Option<&str>, size: usize) -> AppResult<()> {
        if content_type != Some(PDF_CONTENT_TYPE) {
            return Err(AppError::ValidationError("File must be a PDF.".to_string()));
        }

        if size > self.max_pdf_bytes {
            return Err(AppError::ValidationError(format!(
                "PDF is too large. Maximum allowed size is {}MB.",
                self.max_pdf_bytes / (1024 * 1024)
            )));
        }

        Ok(())
    }
}

/// The read → extract → split → prompt → parse pipeline.
pub struct QuizGenerationService {
    model: Arc<dyn QuestionModel>,
    extractor: Arc<dyn TextExtractor>,
    limits: GenerationLimits,
}

impl QuizGenerationService {
    pub fn new(
        model: Arc<dyn QuestionModel>,
        extractor: Arc<dyn TextExtractor>,
        limits: GenerationLimits,
    ) -> Self {
        Self {
            model,
            extractor,
            limits,
        }
    }

    pub fn limits(&self) -> &GenerationLimits {
        &self.limits
    }

    pub async fn extract_text(&self, pdf: Vec<u8>) -> AppResult<String> {
        let extractor = Arc::clone(&self.extractor);

        let text = tokio::task::spawn_blocking(move || extractor.extract(&pdf))
            .await
            .map_err(|e| {
                log::warn!("PDF extraction aborted: {}", e);
                AppError::ValidationError(
                    "Failed to read PDF: the document could not be parsed".to_string(),
                )
            })??;

        if text.trim().is_empty() {
            return Err(AppError::ValidationError(
                "PDF contains no extractable text.".to_string(),
            ));
        }

        Ok(text)
    }

    /// Generates questions for already-extracted text, one model call per chunk.
    pub async fn generate_from_text(
        &self,
        text: &str,
        counts: QuestionCounts,
    ) -> AppResult<GeneratedQuestions> {
        self.limits.validate_counts(&counts)?;

        let chunks = split_text_into_chunks(text, self.limits.chunk_size);
        if chunks.is_empty() {
            return Err(AppError::ValidationError(
                "PDF contains no extractable text.".to_string(),
            ));
        }

        let mcq_plan = distribute(counts.num_mcq as usize, chunks.len());
        let tf_plan = distribute(counts.num_tf as usize, chunks.len());

        log::info!(
            "Generating {} MCQ and {} true/false questions across {} chunk(s)",
            counts.num_mcq,
            counts.num_tf,
            chunks.len()
        );

        let mut combined = GeneratedQuestions::default();

        for (index, ((chunk, num_mcq), num_tf)) in
            chunks.iter().zip(mcq_plan).zip(tf_plan).enumerate()
        {
            if num_mcq + num_tf == 0 {
                continue;
            }

            let prompt = build_quiz_prompt(chunk, num_mcq, num_tf);
            let reply = self.model.complete(QUIZ_SYSTEM_PROMPT, &prompt).await?;
            let mut generated = parse_model_output(&reply)?;

            if generated.multiple_choice.len() < num_mcq || generated.true_false.len() < num_tf {
                log::warn!(
                    "Chunk {} returned {} MCQ / {} T/F, expected {} / {}",
                    index,
                    generated.multiple_choice.len(),
                    generated.true_false.len(),
                    num_mcq,
                    num_tf
                );
            }

            generated.truncate(num_mcq, num_tf);
            combined.extend(generated);
        }

        if combined.is_empty() {
            return Err(AppError::ModelError(
                "Model returned no usable questions.".to_string(),
            ));
        }

        Ok(combined)
    }

    pub async fn generate_from_pdf(
        &self,
        pdf: Vec<u8>,
        counts: QuestionCounts,
    ) -> AppResult<GeneratedQuestions> {
        let text = self.extract_text(pdf).await?;
        self.generate_from_text(&text, counts).await
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
