pub mod question;
pub mod quiz;
pub mod user;

pub use question::{GeneratedQuestions, MultipleChoiceQuestion, TrueFalseQuestion};
pub use quiz::Quiz;
pub use user::User;
