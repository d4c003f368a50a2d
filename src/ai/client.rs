use openrouter_api::{
    models::provider_preferences::ProviderPreferences,
    models::provider_preferences::ProviderSort,
    types::chat::{ChatCompletionRequest, Message},
};
use serde::Serialize;

pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug)]
pub struct OpenRouterClient {
    client: openrouter_api::OpenRouterClient<openrouter_api::Ready>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelConfig {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl OpenRouterClient {
    pub fn new() -> Result<Self, String> {
        let client = openrouter_api::OpenRouterClient::quick()
            .map_err(|e| format!("Failed to create OpenRouter client: {}", e))?;

        Ok(Self { client })
    }

    pub async fn generate_mcqs(
        &self,
        context: &str,
        style_examples: &str,
        count: usize,
        config: Option<&ModelConfig>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let style_block = if style_examples.trim().is_empty() {
            "No style examples provided. Use a standard competitive-exam MCQ format."
        } else {
            style_examples
        };

        let prompt = format!(
            r#"Write exactly {} challenging multiple-choice questions and respond ONLY with valid JSON.

Base every question STRICTLY AND SOLELY on this source material. Do not introduce outside facts:
<context>
{}
</context>

Replicate the style, difficulty, and vignette format of these previous exam questions:
<style_examples>
{}
</style_examples>

IMPORTANT:

- Respond ONLY with this exact JSON structure (no markdown, no extra text):
{{
    "questions": [
        {{
            "question": "the question text",
            "options": ["option 1", "option 2", "option 3", "option 4"],
            "correctAnswer": "the exact string of the correct option",
            "explanation": "why the correct answer is right and the others are wrong"
        }}
    ]
}}
- Each question must have 4 or 5 options with a single best answer; the other options must be plausible distractors.
- "correctAnswer" must match one of the options character for character.
"#,
            count, context, style_block
        );

        let model = config
            .map(|c| c.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let messages = vec![
            Message::text(
                "system",
                "You are an expert educator authoring high-yield exam questions from provided study material.",
            ),
            Message::text("user", &prompt),
        ];

        let provider = ProviderPreferences::new().with_sort(ProviderSort::Throughput);

        let request = ChatCompletionRequest {
            model,
            messages,
            provider: Some(provider),
            stream: None,
            response_format: None,
            tools: None,
            tool_choice: None,
            models: None,
            transforms: None,
            route: None,
            user: None,
            max_tokens: Some(config.and_then(|c| c.max_tokens).unwrap_or(DEFAULT_MAX_TOKENS)),
            temperature: Some(
                config
                    .and_then(|c| c.temperature)
                    .unwrap_or(DEFAULT_TEMPERATURE),
            ),
            top_p: None,
            top_k: None,
            frequency_penalty: None,
            presence_penalty: None,
            repetition_penalty: None,
            min_p: None,
            top_a: None,
            seed: None,
            stop: None,
            logit_bias: None,
            logprobs: None,
            top_logprobs: None,
            prediction: None,
            parallel_tool_calls: None,
            verbosity: None,
        };

        let response = self
            .client
            .chat()?
            .chat_completion(request)
            .await
            .map_err(|e| format!("OpenRouter API error: {}", e))?;

        if let Some(choice) = response.choices.first() {
            match &choice.message.content {
                openrouter_api::MessageContent::Text(text) => Ok(text.clone()),
                openrouter_api::MessageContent::Parts(parts) => {
                    let text_parts: Vec<String> = parts
                        .iter()
                        .filter_map(|p| {
                            if let openrouter_api::ContentPart::Text(tc) = p {
                                Some(tc.text.clone())
                            } else {
                                None
                            }
                        })
                        .collect();
                    Ok(text_parts.join("\n"))
                }
            }
        } else {
            Err("No response choices received".into())
        }
    }
}
