use crate::ai::client::{ModelConfig, OpenRouterClient};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::timeout;

/// Ceiling on a single generation round-trip. The upstream call has no
/// timeout of its own, and a stuck request would hold the in-flight gate
/// forever.
pub const GENERATION_TIMEOUT_SECS: u64 = 120;

fn clean_json_response(response: &str) -> String {
    let mut cleaned = response.trim().to_string();

    if cleaned.starts_with("```") {
        let lines: Vec<&str> = cleaned.lines().collect();
        if lines.len() > 2 {
            cleaned = lines[1..lines.len() - 1].join("\n");
        }
    }

    if let Some(start) = cleaned.find('{')
        && let Some(end) = cleaned.rfind('}') {
            cleaned = cleaned[start..=end].to_string();
        }

    cleaned.trim().to_string()
}

/// One freshly authored MCQ as it comes off the wire. Ids and performance
/// fields are attached later, when the record enters the bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Debug, Deserialize)]
struct GeneratedBatchRaw {
    questions: Vec<GeneratedQuestion>,
}

fn validate_generated_question(q: &GeneratedQuestion) -> Result<(), String> {
    if q.question.trim().is_empty() {
        return Err("Generated record has an empty question".to_string());
    }
    if q.explanation.trim().is_empty() {
        return Err("Generated record has an empty explanation".to_string());
    }
    if q.options.len() < 4 || q.options.len() > 5 {
        return Err(format!(
            "Generated record has {} options, expected 4 or 5",
            q.options.len()
        ));
    }
    let distinct: HashSet<&String> = q.options.iter().collect();
    if distinct.len() != q.options.len() {
        return Err("Generated record has duplicate options".to_string());
    }
    if !q.options.iter().any(|o| o == &q.correct_answer) {
        return Err(format!(
            "Correct answer '{}' is not one of the options",
            q.correct_answer
        ));
    }
    Ok(())
}

/// Parse and validate a raw model response. The batch is all-or-nothing:
/// one malformed record fails the whole response.
pub fn parse_generated_questions(response: &str) -> Result<Vec<GeneratedQuestion>, String> {
    let cleaned = clean_json_response(response);
    let raw: GeneratedBatchRaw = serde_json::from_str(&cleaned).map_err(|e| {
        format!(
            "Failed to parse generation response as JSON: {}\nRaw: {}\nCleaned: {}",
            e, response, cleaned
        )
    })?;

    for question in &raw.questions {
        validate_generated_question(question)?;
    }

    Ok(raw.questions)
}

/// Author `count` fresh MCQs from the given source material, styled after
/// the given prior-exam examples.
pub async fn generate_questions(
    client: &OpenRouterClient,
    context: &str,
    style_examples: &str,
    count: usize,
    config: Option<&ModelConfig>,
) -> Result<Vec<GeneratedQuestion>, Box<dyn std::error::Error + Send + Sync>> {
    crate::logger::log(&format!("Starting generation of {} questions", count));

    let call = client.generate_mcqs(context, style_examples, count, config);
    let json_response = match timeout(Duration::from_secs(GENERATION_TIMEOUT_SECS), call).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(format!(
                "Generation timed out after {}s",
                GENERATION_TIMEOUT_SECS
            )
            .into());
        }
    };

    crate::logger::log(&format!("Raw generation response: {}", json_response));

    let questions = parse_generated_questions(&json_response)?;

    crate::logger::log(&format!("Parsed {} generated questions", questions.len()));

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(question: &str, options: &[&str], correct: &str, explanation: &str) -> GeneratedQuestion {
        GeneratedQuestion {
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct.to_string(),
            explanation: explanation.to_string(),
        }
    }

    #[test]
    fn test_clean_json_response_simple() {
        let json = r#"{"questions":[]}"#;
        let cleaned = clean_json_response(json);
        assert_eq!(cleaned, r#"{"questions":[]}"#);
    }

    #[test]
    fn test_clean_json_response_markdown() {
        let json = r#"```json
{"questions": []}
```"#;
        let cleaned = clean_json_response(json);
        assert_eq!(cleaned, r#"{"questions": []}"#);
    }

    #[test]
    fn test_clean_json_response_with_text() {
        let json = r#"Here are your questions: {"questions": []} enjoy"#;
        let cleaned = clean_json_response(json);
        assert_eq!(cleaned, r#"{"questions": []}"#);
    }

    #[test]
    fn test_parse_valid_batch() {
        let json = r#"{
            "questions": [
                {
                    "question": "Which nerve innervates the deltoid?",
                    "options": ["Axillary", "Radial", "Median", "Ulnar"],
                    "correctAnswer": "Axillary",
                    "explanation": "The axillary nerve supplies the deltoid and teres minor."
                }
            ]
        }"#;

        let questions = parse_generated_questions(json).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer, "Axillary");
        assert_eq!(questions[0].options.len(), 4);
    }

    #[test]
    fn test_parse_batch_in_markdown_fence() {
        let json = r#"```json
{
    "questions": [
        {
            "question": "Q?",
            "options": ["a", "b", "c", "d", "e"],
            "correctAnswer": "c",
            "explanation": "Because c."
        }
    ]
}
```"#;

        let questions = parse_generated_questions(json).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options.len(), 5);
    }

    #[test]
    fn test_parse_missing_questions_key_fails() {
        let json = r#"{"items": []}"#;
        assert!(parse_generated_questions(json).is_err());
    }

    #[test]
    fn test_parse_non_json_fails() {
        let result = parse_generated_questions("Sorry, I cannot help with that.");
        assert!(result.is_err());
    }

    #[test]
    fn test_too_few_options_rejected() {
        let q = record("Q?", &["a", "b", "c"], "a", "e");
        let err = validate_generated_question(&q).unwrap_err();
        assert!(err.contains("3 options"));
    }

    #[test]
    fn test_too_many_options_rejected() {
        let q = record("Q?", &["a", "b", "c", "d", "e", "f"], "a", "expl");
        assert!(validate_generated_question(&q).is_err());
    }

    #[test]
    fn test_duplicate_options_rejected() {
        let q = record("Q?", &["a", "b", "b", "d"], "a", "expl");
        let err = validate_generated_question(&q).unwrap_err();
        assert!(err.contains("duplicate"));
    }

    #[test]
    fn test_correct_answer_must_be_an_option() {
        let q = record("Q?", &["a", "b", "c", "d"], "z", "expl");
        let err = validate_generated_question(&q).unwrap_err();
        assert!(err.contains("not one of the options"));
    }

    #[test]
    fn test_empty_question_rejected() {
        let q = record("   ", &["a", "b", "c", "d"], "a", "expl");
        assert!(validate_generated_question(&q).is_err());
    }

    #[test]
    fn test_empty_explanation_rejected() {
        let q = record("Q?", &["a", "b", "c", "d"], "a", "");
        assert!(validate_generated_question(&q).is_err());
    }

    #[test]
    fn test_one_bad_record_fails_the_batch() {
        let json = r#"{
            "questions": [
                {
                    "question": "Fine question?",
                    "options": ["a", "b", "c", "d"],
                    "correctAnswer": "a",
                    "explanation": "ok"
                },
                {
                    "question": "Broken question?",
                    "options": ["a", "b", "c", "d"],
                    "correctAnswer": "nope",
                    "explanation": "ok"
                }
            ]
        }"#;

        assert!(parse_generated_questions(json).is_err());
    }

    #[test]
    fn test_empty_batch_parses_as_empty() {
        let questions = parse_generated_questions(r#"{"questions": []}"#).unwrap();
        assert!(questions.is_empty());
    }
}
