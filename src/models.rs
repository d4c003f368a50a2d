use crate::ai::GeneratedQuestion;
use serde::{Deserialize, Serialize};

/// Self-rated confidence on a question. Reserved for a future rating
/// feature; nothing in the current flow populates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// A user-defined topic plus the raw source text questions are generated
/// from.
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub transcripts: String,
    pub pdfs: String,
    pub pyqs: String,
}

/// The editable text fields of a Subject, applied wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectContent {
    pub transcripts: String,
    pub pdfs: String,
    pub pyqs: String,
}

impl Subject {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            transcripts: String::new(),
            pdfs: String::new(),
            pyqs: String::new(),
        }
    }

    /// A subject can feed question generation once it has lecture or PDF
    /// text. Prior-exam questions alone only steer style.
    pub fn has_source_material(&self) -> bool {
        !self.transcripts.trim().is_empty() || !self.pdfs.trim().is_empty()
    }

    pub fn set_content(&mut self, content: SubjectContent) {
        self.transcripts = content.transcripts;
        self.pdfs = content.pdfs;
        self.pyqs = content.pyqs;
    }

    /// Transcript and PDF text joined into the generation context.
    pub fn combined_context(&self) -> String {
        format!("{}\n\n{}", self.transcripts, self.pdfs)
    }
}

/// One MCQ plus its answer history. The bank entry is the source of truth
/// for the performance fields; sessions hold snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: String,
    pub subject_id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub is_correct: Option<bool>,
    pub attempts: u32,
    pub last_attempt_correct: bool,
    pub confidence: Option<Confidence>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
    PostLecture,
    Revenge,
    DailyRevision,
}

impl QuizMode {
    pub fn label(&self) -> &'static str {
        match self {
            QuizMode::PostLecture => "Post-Lecture",
            QuizMode::Revenge => "Revenge Mode",
            QuizMode::DailyRevision => "Daily Mixed Revision",
        }
    }
}

/// One run-through of a question subset, frozen at start.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub user_answers: Vec<Option<String>>,
    pub is_finished: bool,
}

impl Quiz {
    pub fn new(questions: Vec<Question>) -> Self {
        let slots = questions.len();
        Self {
            questions,
            current_index: 0,
            user_answers: vec![None; slots],
            is_finished: false,
        }
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[derive(Debug)]
pub enum GenRequest {
    Generate {
        subject_id: String,
        context: String,
        style_examples: String,
        count: usize,
    },
}

#[derive(Debug)]
pub enum GenResponse {
    Generated {
        subject_id: String,
        questions: Vec<GeneratedQuestion>,
    },
    Error {
        subject_id: String,
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_without_content_has_no_source_material() {
        let subject = Subject::new("s1".to_string(), "Anatomy".to_string());
        assert!(!subject.has_source_material());
    }

    #[test]
    fn test_whitespace_only_content_is_not_source_material() {
        let mut subject = Subject::new("s1".to_string(), "Anatomy".to_string());
        subject.transcripts = "   \n\t".to_string();
        subject.pdfs = "  ".to_string();
        assert!(!subject.has_source_material());
    }

    #[test]
    fn test_transcripts_alone_are_source_material() {
        let mut subject = Subject::new("s1".to_string(), "Anatomy".to_string());
        subject.transcripts = "The brachial plexus...".to_string();
        assert!(subject.has_source_material());
    }

    #[test]
    fn test_pdfs_alone_are_source_material() {
        let mut subject = Subject::new("s1".to_string(), "Anatomy".to_string());
        subject.pdfs = "Chapter 3 excerpt".to_string();
        assert!(subject.has_source_material());
    }

    #[test]
    fn test_pyqs_alone_are_not_source_material() {
        let mut subject = Subject::new("s1".to_string(), "Anatomy".to_string());
        subject.pyqs = "Q: Which nerve...".to_string();
        assert!(!subject.has_source_material());
    }

    #[test]
    fn test_combined_context_joins_with_blank_line() {
        let mut subject = Subject::new("s1".to_string(), "Anatomy".to_string());
        subject.transcripts = "lecture".to_string();
        subject.pdfs = "notes".to_string();
        assert_eq!(subject.combined_context(), "lecture\n\nnotes");
    }

    #[test]
    fn test_set_content_overwrites_all_fields() {
        let mut subject = Subject::new("s1".to_string(), "Anatomy".to_string());
        subject.set_content(SubjectContent {
            transcripts: "t".to_string(),
            pdfs: "p".to_string(),
            pyqs: "q".to_string(),
        });
        assert_eq!(subject.transcripts, "t");
        assert_eq!(subject.pdfs, "p");
        assert_eq!(subject.pyqs, "q");
    }

    #[test]
    fn test_quiz_new_initializes_cursor_and_slots() {
        let questions = vec![
            question_fixture("q1"),
            question_fixture("q2"),
            question_fixture("q3"),
        ];
        let quiz = Quiz::new(questions);
        assert_eq!(quiz.current_index, 0);
        assert_eq!(quiz.user_answers.len(), 3);
        assert!(quiz.user_answers.iter().all(|a| a.is_none()));
        assert!(!quiz.is_finished);
    }

    #[test]
    fn test_quiz_current_question_follows_cursor() {
        let mut quiz = Quiz::new(vec![question_fixture("q1"), question_fixture("q2")]);
        assert_eq!(quiz.current_question().id, "q1");
        quiz.current_index = 1;
        assert_eq!(quiz.current_question().id, "q2");
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(QuizMode::PostLecture.label(), "Post-Lecture");
        assert_eq!(QuizMode::Revenge.label(), "Revenge Mode");
        assert_eq!(QuizMode::DailyRevision.label(), "Daily Mixed Revision");
    }

    fn question_fixture(id: &str) -> Question {
        Question {
            id: id.to_string(),
            subject_id: "s1".to_string(),
            question: "Which?".to_string(),
            options: vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string(),
            ],
            correct_answer: "A".to_string(),
            explanation: "Because A.".to_string(),
            is_correct: None,
            attempts: 0,
            last_attempt_correct: false,
            confidence: None,
        }
    }
}
