use std::sync::Arc;

use crate::{
    auth::{JwtService, PasswordHasher},
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoQuizRepository, MongoUserRepository, QuizRepository, UserRepository},
    services::{
        model_service::{OpenAiQuestionModel, QuestionModel},
        pdf_service::{PdfTextExtractor, TextExtractor},
        quiz_generation_service::{GenerationLimits, QuizGenerationService},
        quiz_service::QuizService,
        user_service::UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub quiz_service: Arc<QuizService>,
    pub generation_service: Arc<QuizGenerationService>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db, &config.users_collection));
        user_repository.ensure_indexes().await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db, &config.quizzes_collection));
        quiz_repository.ensure_indexes().await?;

        let model = Arc::new(OpenAiQuestionModel::new(&config));
        log::info!(
            "Using model '{}' at {}",
            config.llm_model,
            config.llm_endpoint
        );

        Ok(Self::from_parts(
            config,
            user_repository,
            quiz_repository,
            model,
            Arc::new(PdfTextExtractor),
        ))
    }

    /// Wires the services over the given storage and model backends.
    pub fn from_parts(
        config: Config,
        user_repository: Arc<dyn UserRepository>,
        quiz_repository: Arc<dyn QuizRepository>,
        model: Arc<dyn QuestionModel>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
        let limits = GenerationLimits::from(&config);

        Self {
            user_service: Arc::new(UserService::new(user_repository, hasher)),
            quiz_service: Arc::new(QuizService::new(quiz_repository)),
            generation_service: Arc::new(QuizGenerationService::new(model, extractor, limits)),
            jwt_service: Arc::new(jwt_service),
            config: Arc::new(config),
        }
    }
}
