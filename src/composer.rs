use crate::ai::GeneratedQuestion;
use crate::error::QuizStartError;
use crate::models::{Question, Quiz};
use chrono::Utc;
use rand::Rng;

/// Absolute ceiling on a daily-revision session, whatever count was asked
/// for.
pub const DAILY_REVISION_CAP: usize = 15;

fn mint_question_id(subject_id: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{}-{}-{:06}", subject_id, millis, suffix)
}

/// Every question whose most recent attempt was wrong, in bank order.
///
/// A never-attempted question carries the default `last_attempt_correct =
/// false` and is swept in too unless `include_never_attempted` is off.
pub fn revenge_questions(bank: &[Question], include_never_attempted: bool) -> Vec<Question> {
    bank.iter()
        .filter(|q| !q.last_attempt_correct && (include_never_attempted || q.attempts > 0))
        .cloned()
        .collect()
}

/// The mixed daily set: the full revenge selection first, then previously
/// correct questions prioritized by fewest attempts (bank order on ties),
/// filling up to `requested_count`, the whole list capped at
/// [`DAILY_REVISION_CAP`].
pub fn daily_revision_questions(
    bank: &[Question],
    requested_count: usize,
    include_never_attempted: bool,
) -> Vec<Question> {
    let mut selected = revenge_questions(bank, include_never_attempted);

    let mut revision: Vec<Question> = bank
        .iter()
        .filter(|q| q.attempts > 0 && q.last_attempt_correct)
        .cloned()
        .collect();
    revision.sort_by_key(|q| q.attempts);
    revision.truncate(requested_count.saturating_sub(selected.len()));

    selected.extend(revision);
    selected.truncate(DAILY_REVISION_CAP);
    selected
}

pub fn compose_revenge_quiz(
    bank: &[Question],
    include_never_attempted: bool,
) -> Result<Quiz, QuizStartError> {
    let selected = revenge_questions(bank, include_never_attempted);
    if selected.is_empty() {
        return Err(QuizStartError::NoQuestionsAvailable);
    }
    Ok(Quiz::new(selected))
}

pub fn compose_daily_revision_quiz(
    bank: &[Question],
    requested_count: usize,
    include_never_attempted: bool,
) -> Result<Quiz, QuizStartError> {
    let selected = daily_revision_questions(bank, requested_count, include_never_attempted);
    if selected.is_empty() {
        return Err(QuizStartError::NoQuestionsAvailable);
    }
    Ok(Quiz::new(selected))
}

/// Turn a batch of freshly generated records into bank questions and the
/// session presenting them, in gateway order. Returns the new questions
/// separately so the caller can append them to the bank in one step.
pub fn compose_post_lecture_quiz(
    subject_id: &str,
    generated: Vec<GeneratedQuestion>,
) -> Result<(Vec<Question>, Quiz), QuizStartError> {
    if generated.is_empty() {
        return Err(QuizStartError::NoQuestionsAvailable);
    }

    let questions: Vec<Question> = generated
        .into_iter()
        .map(|g| Question {
            id: mint_question_id(subject_id),
            subject_id: subject_id.to_string(),
            question: g.question,
            options: g.options,
            correct_answer: g.correct_answer,
            explanation: g.explanation,
            is_correct: None,
            attempts: 0,
            last_attempt_correct: false,
            confidence: None,
        })
        .collect();

    let quiz = Quiz::new(questions.clone());
    Ok((questions, quiz))
}

/// How many questions a revenge session would hold right now. Shown on the
/// session-setup screen before starting.
pub fn revenge_question_count(bank: &[Question], include_never_attempted: bool) -> usize {
    bank.iter()
        .filter(|q| !q.last_attempt_correct && (include_never_attempted || q.attempts > 0))
        .count()
}

/// The setup-screen estimate for a daily-revision session. Coarser than the
/// real composition: it counts every attempted question as revision
/// material.
pub fn daily_revision_question_count(bank: &[Question], include_never_attempted: bool) -> usize {
    let weak = revenge_question_count(bank, include_never_attempted);
    let attempted = bank.iter().filter(|q| q.attempts > 0).count();
    DAILY_REVISION_CAP.min(weak + attempted)
}
