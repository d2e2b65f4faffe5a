pub mod model_service;
pub mod pdf_service;
pub mod quiz_generation_service;
pub mod quiz_service;
pub mod text_chunker;
pub mod user_service;
