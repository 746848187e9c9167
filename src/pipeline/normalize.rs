//! Text normalizer: canonical synonyms, boilerplate removal, whitespace
//! collapse. Never fails; empty input yields an empty string.

use std::sync::LazyLock;

use regex::Regex;

struct Synonym {
    regex: Regex,
    canonical: &'static str,
}

fn synonym(regex_str: &str, canonical: &'static str) -> Synonym {
    Synonym {
        regex: Regex::new(regex_str).expect("Invalid synonym pattern"),
        canonical,
    }
}

/// Abbreviations and lab-specific labels rewritten to catalog names.
/// The patterns never overlap, so application order does not matter.
static SYNONYMS: LazyLock<Vec<Synonym>> = LazyLock::new(|| {
    vec![
        synonym(r"(?i)\bHb\b|\bHGB\b", "Hemoglobin"),
        synonym(r"(?i)\bGLU\b|Blood Sugar", "Glucose"),
        synonym(r"(?i)Total Cholesterol", "Cholesterol"),
        synonym(r"(?i)WBC Count", "White Blood Cell Count"),
    ]
});

/// Page footers, date stamps and generator headers.
static BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*Page \d+|\bDate\b:|\bReport Generated On\b")
        .expect("Invalid boilerplate pattern")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace pattern"));

/// Clean raw report text into a single whitespace-normalized line.
pub fn normalize_text(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    // OCR noise: NUL bytes and other non-whitespace controls
    let mut text: String = raw
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();

    for s in SYNONYMS.iter() {
        text = s.regex.replace_all(&text, s.canonical).into_owned();
    }

    let joined = text
        .lines()
        .filter(|line| !BOILERPLATE.is_match(line))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    WHITESPACE_RUN.replace_all(&joined, " ").into_owned()
}
