use crate::models::ExtractedParameter;

pub const EXPLANATION_SYSTEM_PROMPT: &str = "You are a helpful medical assistant.";

/// Build the patient-facing explanation request for one result.
pub fn build_explanation_prompt(param: &ExtractedParameter) -> String {
    format!(
        "Explain this medical test result to a patient in simple, reassuring terms (under 50 words).\n\
         Test: {}, Value: {} {}, Normal Range: {}-{}, Status: {}",
        param.test_name, param.value, param.unit, param.range_low, param.range_high, param.status
    )
}

/// Used when no static text exists and the model is off or failed.
pub fn fallback_explanation(test_name: &str, status: impl std::fmt::Display) -> String {
    format!("Your {test_name} level is {status}. Please consult your doctor.")
}
