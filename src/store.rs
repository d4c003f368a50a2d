use std::sync::mpsc::Sender;

use crate::composer;
use crate::error::QuizStartError;
use crate::logger;
use crate::models::{GenRequest, GenResponse, Question, Quiz, QuizMode, Subject, SubjectContent};
use crate::session;
use chrono::Utc;
use rand::Rng;

/// The whole application state: subjects, the question bank, and the
/// active session. Constructed once at startup and passed to whoever
/// drives it; nothing here is global.
///
/// The bank is append-only except for subject deletion cascades, and it is
/// the single source of truth for per-question answer history. Sessions
/// snapshot question content but write history back to the bank.
pub struct StudyStore {
    pub subjects: Vec<Subject>,
    pub question_bank: Vec<Question>,
    pub active_quiz: Option<Quiz>,
    /// Whether never-attempted questions count as revenge material. The
    /// default keeps them in: a fresh question has never been answered
    /// correctly, so it surfaces alongside genuinely missed ones.
    pub include_never_attempted: bool,
    pub generation_in_progress: bool,
    pub last_error: Option<String>,
    gen_tx: Option<Sender<GenRequest>>,
}

fn mint_subject_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("{}-{:04}", millis, suffix)
}

impl StudyStore {
    pub fn new() -> Self {
        Self {
            subjects: Vec::new(),
            question_bank: Vec::new(),
            active_quiz: None,
            include_never_attempted: true,
            generation_in_progress: false,
            last_error: None,
            gen_tx: None,
        }
    }

    /// Connect the sender half of the generation worker channel.
    pub fn attach_generator(&mut self, gen_tx: Sender<GenRequest>) {
        self.gen_tx = Some(gen_tx);
    }

    // --- Subjects ---

    pub fn add_subject(&mut self, name: &str) -> String {
        let subject = Subject::new(mint_subject_id(), name.to_string());
        let id = subject.id.clone();
        self.subjects.push(subject);
        id
    }

    pub fn update_subject_content(&mut self, id: &str, content: SubjectContent) -> bool {
        match self.subjects.iter_mut().find(|s| s.id == id) {
            Some(subject) => {
                subject.set_content(content);
                true
            }
            None => false,
        }
    }

    /// Remove a subject and every question generated from it.
    pub fn delete_subject(&mut self, id: &str) {
        self.subjects.retain(|s| s.id != id);
        self.question_bank.retain(|q| q.subject_id != id);
    }

    /// Subjects that can feed question generation. The PostLecture target
    /// picker only ever offers these.
    pub fn eligible_subjects(&self) -> Vec<&Subject> {
        self.subjects
            .iter()
            .filter(|s| s.has_source_material())
            .collect()
    }

    // --- Session start ---

    /// Start a session. History modes compose synchronously from the bank;
    /// PostLecture routes through the generation worker and installs the
    /// session when the response arrives. Starting a new session discards
    /// any unfinished one. On failure nothing is installed and the
    /// user-facing message is recorded.
    pub fn start_quiz(
        &mut self,
        subject_id: &str,
        mode: QuizMode,
        count: usize,
    ) -> Result<(), QuizStartError> {
        if self.generation_in_progress {
            logger::log("Generation already in progress, ignoring start request");
            return Ok(());
        }

        let composed = match mode {
            QuizMode::PostLecture => return self.request_generation(subject_id, count),
            QuizMode::Revenge => {
                composer::compose_revenge_quiz(&self.question_bank, self.include_never_attempted)
            }
            QuizMode::DailyRevision => composer::compose_daily_revision_quiz(
                &self.question_bank,
                count,
                self.include_never_attempted,
            ),
        };

        match composed {
            Ok(quiz) => {
                logger::log(&format!(
                    "Starting {} session with {} questions",
                    mode.label(),
                    quiz.len()
                ));
                self.active_quiz = Some(quiz);
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Ask the worker for a fresh PostLecture batch. Ignored while a
    /// request is already outstanding; only one generation is ever in
    /// flight.
    pub fn request_generation(
        &mut self,
        subject_id: &str,
        count: usize,
    ) -> Result<(), QuizStartError> {
        if self.generation_in_progress {
            logger::log("Generation already in progress, ignoring start request");
            return Ok(());
        }

        let request = {
            let Some(subject) = self.subjects.iter().find(|s| s.id == subject_id) else {
                let err = QuizStartError::SubjectNotFound;
                self.last_error = Some(err.to_string());
                return Err(err);
            };
            if !subject.has_source_material() {
                let err = QuizStartError::NoQuestionsAvailable;
                self.last_error = Some(err.to_string());
                return Err(err);
            }
            GenRequest::Generate {
                subject_id: subject.id.clone(),
                context: subject.combined_context(),
                style_examples: subject.pyqs.clone(),
                count,
            }
        };

        self.last_error = None;
        if let Some(gen_tx) = &self.gen_tx
            && gen_tx.send(request).is_ok() {
                self.generation_in_progress = true;
                logger::log(&format!(
                    "Generation request sent for subject {}",
                    subject_id
                ));
            }
        Ok(())
    }

    /// Apply the worker's answer to an outstanding generation request.
    /// On success the fresh questions enter the bank in one append and the
    /// session presenting them becomes active. Any failure leaves the bank
    /// untouched. The in-flight gate clears either way.
    pub fn process_gen_response(&mut self, response: GenResponse) -> Result<(), QuizStartError> {
        self.generation_in_progress = false;

        match response {
            GenResponse::Generated {
                subject_id,
                questions,
            } => {
                logger::log(&format!(
                    "Received {} generated questions for subject {}",
                    questions.len(),
                    subject_id
                ));
                match composer::compose_post_lecture_quiz(&subject_id, questions) {
                    Ok((new_questions, quiz)) => {
                        self.question_bank.extend(new_questions);
                        self.active_quiz = Some(quiz);
                        self.last_error = None;
                        Ok(())
                    }
                    Err(err) => {
                        self.last_error = Some(err.to_string());
                        Err(err)
                    }
                }
            }
            GenResponse::Error { subject_id, error } => {
                logger::log(&format!(
                    "Generation failed for subject {}: {}",
                    subject_id, error
                ));
                let err = QuizStartError::GenerationFailed(error);
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    // --- Session driving ---

    /// Grade and record an answer for the active question. `None` when no
    /// session is active.
    pub fn answer_current(&mut self, answer: &str) -> Option<bool> {
        let quiz = self.active_quiz.as_mut()?;
        Some(session::apply_answer(quiz, &mut self.question_bank, answer))
    }

    pub fn advance(&mut self) {
        if let Some(quiz) = self.active_quiz.as_mut() {
            session::advance_question(quiz);
        }
    }

    /// Drop the active session. The caller decides when; a front end will
    /// usually hold the score screen for a moment first.
    pub fn clear_active_quiz(&mut self) {
        self.active_quiz = None;
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // --- Dashboard rollup ---

    pub fn question_count(&self) -> usize {
        self.question_bank.len()
    }

    pub fn attempted_count(&self) -> usize {
        self.question_bank.iter().filter(|q| q.attempts > 0).count()
    }

    /// Fraction of attempted questions whose most recent attempt was
    /// correct. `None` until something has been attempted.
    pub fn overall_accuracy(&self) -> Option<f64> {
        let attempted = self.attempted_count();
        if attempted == 0 {
            return None;
        }
        let correct = self
            .question_bank
            .iter()
            .filter(|q| q.attempts > 0 && q.last_attempt_correct)
            .count();
        Some(correct as f64 / attempted as f64)
    }
}

impl Default for StudyStore {
    fn default() -> Self {
        Self::new()
    }
}
