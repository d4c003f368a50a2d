use crate::logger;
use crate::models::{Question, Quiz};

/// Record one submitted answer against the active question.
///
/// Grades the answer, writes the result back to the bank entry by id (the
/// session only holds a snapshot), and stores the answer in the session
/// slot. Resubmitting before an advance overwrites the slot and grades
/// again; every call counts as one more attempt. Returns whether the
/// answer was correct.
pub fn apply_answer(quiz: &mut Quiz, bank: &mut [Question], answer: &str) -> bool {
    let question = &quiz.questions[quiz.current_index];
    let is_correct = answer == question.correct_answer;

    if let Some(entry) = bank.iter_mut().find(|q| q.id == question.id) {
        entry.attempts += 1;
        entry.last_attempt_correct = is_correct;
        entry.is_correct = Some(is_correct);
    } else {
        logger::log(&format!(
            "Answered question {} no longer in the bank",
            question.id
        ));
    }

    quiz.user_answers[quiz.current_index] = Some(answer.to_string());
    is_correct
}

/// Move to the next question; advancing on the last question finishes the
/// session. Finished is terminal.
pub fn advance_question(quiz: &mut Quiz) {
    if quiz.is_finished {
        return;
    }
    if quiz.current_index < quiz.questions.len().saturating_sub(1) {
        quiz.current_index += 1;
    } else {
        quiz.is_finished = true;
    }
}

/// Number of session slots holding that question's correct answer.
pub fn correct_count(quiz: &Quiz) -> usize {
    quiz.user_answers
        .iter()
        .zip(&quiz.questions)
        .filter(|(answer, question)| answer.as_deref() == Some(question.correct_answer.as_str()))
        .count()
}

/// Fraction of the session answered correctly, in `[0.0, 1.0]`.
pub fn session_score(quiz: &Quiz) -> f64 {
    if quiz.questions.is_empty() {
        return 0.0;
    }
    correct_count(quiz) as f64 / quiz.questions.len() as f64
}
