pub mod ai;
pub mod composer;
pub mod error;
pub mod gen_worker;
pub mod logger;
pub mod models;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use ai::{
    generate_questions, parse_generated_questions, GeneratedQuestion, ModelConfig,
    OpenRouterClient, DEFAULT_MODEL, GENERATION_TIMEOUT_SECS,
};
pub use composer::{
    compose_daily_revision_quiz, compose_post_lecture_quiz, compose_revenge_quiz,
    daily_revision_question_count, daily_revision_questions, revenge_question_count,
    revenge_questions, DAILY_REVISION_CAP,
};
pub use error::QuizStartError;
pub use gen_worker::spawn_gen_worker;
pub use models::{
    Confidence, GenRequest, GenResponse, Question, Quiz, QuizMode, Subject, SubjectContent,
};
pub use session::{advance_question, apply_answer, correct_count, session_score};
pub use store::StudyStore;
