//! Explainer: attaches a patient-facing explanation to every classified
//! result. Static knowledge first, then the language model if enabled,
//! then a generic template. Never fails.

pub mod ollama;
pub mod openai;
pub mod prompt;
pub mod types;

pub use ollama::*;
pub use openai::*;
pub use prompt::*;
pub use types::*;

use thiserror::Error;

use crate::knowledge::explanations;
use crate::models::ExtractedParameter;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Language model server is not reachable at {0}")]
    Connection(String),

    #[error("Language model returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Language model returned an empty reply")]
    EmptyResponse,

    #[error("No API key configured for the language model provider")]
    MissingApiKey,
}

/// Optional language-model capability for explanations.
pub enum LanguageModel {
    Disabled,
    Enabled {
        client: Box<dyn LlmClient + Send + Sync>,
        model: String,
    },
}

impl LanguageModel {
    pub fn enabled(client: impl LlmClient + Send + Sync + 'static, model: &str) -> Self {
        Self::Enabled {
            client: Box::new(client),
            model: model.to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }

    fn generate_explanation(&self, param: &ExtractedParameter) -> Result<Option<String>, LlmError> {
        let Self::Enabled { client, model } = self else {
            return Ok(None);
        };
        let prompt = build_explanation_prompt(param);
        let reply = client.generate(model, &prompt, EXPLANATION_SYSTEM_PROMPT)?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(Some(reply.to_string()))
    }
}

impl std::fmt::Debug for LanguageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Enabled { model, .. } => f.debug_struct("Enabled").field("model", model).finish(),
        }
    }
}

/// Explanation for one classified result.
pub fn explanation_for(param: &ExtractedParameter, model: &LanguageModel) -> String {
    if let Some(text) = explanations::lookup(&param.test_name, param.status) {
        return text.to_string();
    }

    match model.generate_explanation(param) {
        Ok(Some(text)) => return text,
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(
                test = %param.test_name,
                error = %e,
                "Language model explanation failed, using template"
            );
        }
    }

    fallback_explanation(&param.test_name, param.status)
}

/// Fill in `explanation` for every result, in place.
pub fn explain(params: &mut [ExtractedParameter], model: &LanguageModel) {
    for param in params.iter_mut() {
        param.explanation = explanation_for(param, model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Status};

    fn param(name: &str, status: Status) -> ExtractedParameter {
        ExtractedParameter {
            test_name: name.into(),
            value: 1.0,
            unit: "u".into(),
            range_low: 0.0,
            range_high: 2.0,
            category: Category::Periodic,
            status,
            explanation: String::new(),
        }
    }

    #[test]
    fn knowledge_table_wins_over_model() {
        let mock = MockLlmClient::new("model text");
        let prompts = mock.prompts();
        let model = LanguageModel::enabled(mock, "m");
        let text = explanation_for(&param("Hemoglobin", Status::Normal), &model);
        assert_eq!(
            text,
            "Your hemoglobin level is healthy, indicating good oxygen-carrying capacity."
        );
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn model_used_when_no_static_text() {
        let model = LanguageModel::enabled(MockLlmClient::new("  Your sugar is fine.  \n"), "m");
        let text = explanation_for(&param("Glucose", Status::Normal), &model);
        assert_eq!(text, "Your sugar is fine.");
    }

    #[test]
    fn disabled_model_uses_template() {
        let text = explanation_for(&param("Glucose", Status::High), &LanguageModel::Disabled);
        assert_eq!(text, "Your Glucose level is High. Please consult your doctor.");
    }

    #[test]
    fn model_failure_uses_template() {
        let model = LanguageModel::enabled(MockLlmClient::failing(), "m");
        let text = explanation_for(&param("ESR", Status::Low), &model);
        assert_eq!(text, "Your ESR level is Low. Please consult your doctor.");
    }

    #[test]
    fn empty_reply_counts_as_failure() {
        let model = LanguageModel::enabled(MockLlmClient::new("   "), "m");
        let text = explanation_for(&param("Cholesterol", Status::Normal), &model);
        assert_eq!(text, "Your Cholesterol level is Normal. Please consult your doctor.");
    }

    #[test]
    fn explain_fills_every_result() {
        let mut params = vec![
            param("Hemoglobin", Status::Low),
            param("Glucose", Status::Normal),
            param("SGPT", Status::High),
        ];
        explain(&mut params, &LanguageModel::Disabled);
        assert!(params.iter().all(|p| !p.explanation.is_empty()));
        assert!(params[2].explanation.contains("Avoid alcohol"));
    }

    #[test]
    fn debug_hides_client() {
        let model = LanguageModel::enabled(MockLlmClient::new(""), "llama3");
        assert_eq!(format!("{model:?}"), "Enabled { model: \"llama3\" }");
        assert!(model.is_enabled());
        assert!(!LanguageModel::Disabled.is_enabled());
    }
}
