//! Parameter extractor: locates catalog tests and their numeric values in
//! normalized report text.
//!
//! Two passes over the same text:
//! 1. Primary catalog, each entry tried with four generic shapes in
//!    priority order. The first value that parses ends the search for
//!    that entry.
//! 2. Secondary catalog of hand-tuned patterns. A match is kept only if
//!    its canonical name has not been produced yet.
//!
//! Output holds at most one measurement per canonical name. Matching is
//! case-insensitive and purely lexical; names are not word-bounded.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::knowledge::{SecondaryPattern, PRIMARY_CATALOG, SECONDARY_CATALOG};
use crate::models::{Measurement, TestDefinition};

const NUMBER: &str = r"([\d.]+)";

/// Primary shapes for one catalog entry, most specific first.
fn primary_shapes(def: &TestDefinition) -> [String; 4] {
    let name = regex::escape(def.name);
    let unit = regex::escape(def.unit);
    [
        format!(r"(?i){name}\s*[:\s]\s*{NUMBER}\s*{unit}"),
        format!(r"(?i){name}\s+{NUMBER}\s*{unit}"),
        format!(r"(?i){name}\s*[:\s]\s*{NUMBER}"),
        format!(r"(?i){name}\s+{NUMBER}"),
    ]
}

struct PrimaryEntry {
    definition: &'static TestDefinition,
    shapes: Vec<Regex>,
}

struct SecondaryEntry {
    definition: &'static TestDefinition,
    regex: Regex,
}

/// Compiled catalogs. Build once and share; matching borrows `&self`.
pub struct ParameterExtractor {
    primary: Vec<PrimaryEntry>,
    secondary: Vec<SecondaryEntry>,
}

static SHARED: LazyLock<ParameterExtractor> = LazyLock::new(|| {
    ParameterExtractor::new(PRIMARY_CATALOG, SECONDARY_CATALOG)
        .expect("Invalid built-in catalog pattern")
});

impl ParameterExtractor {
    /// Compile the given catalogs.
    pub fn new(
        primary: &'static [TestDefinition],
        secondary: &'static [SecondaryPattern],
    ) -> Result<Self, regex::Error> {
        let primary = primary
            .iter()
            .map(|definition| {
                let shapes = primary_shapes(definition)
                    .iter()
                    .map(|s| Regex::new(s))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(PrimaryEntry { definition, shapes })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let secondary = secondary
            .iter()
            .map(|entry| {
                Ok(SecondaryEntry {
                    definition: &entry.definition,
                    regex: Regex::new(&format!("(?i){}", entry.pattern))?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { primary, secondary })
    }

    /// Extractor over the built-in catalogs, compiled on first use.
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// Extract measurements from normalized text, in catalog order.
    pub fn extract(&self, text: &str) -> Vec<Measurement> {
        let mut found: Vec<Measurement> = Vec::new();
        if text.is_empty() {
            return found;
        }
        let mut seen: HashSet<&'static str> = HashSet::new();

        for entry in &self.primary {
            if seen.contains(entry.definition.name) {
                continue;
            }
            let value = entry
                .shapes
                .iter()
                .find_map(|shape| first_numeric_capture(shape, text));
            if let Some(value) = value {
                seen.insert(entry.definition.name);
                found.push(entry.definition.measure(value));
            }
        }
        let primary_count = found.len();

        for entry in &self.secondary {
            if seen.contains(entry.definition.name) {
                continue;
            }
            if let Some(value) = first_numeric_capture(&entry.regex, text) {
                seen.insert(entry.definition.name);
                found.push(entry.definition.measure(value));
            }
        }

        tracing::debug!(
            primary = primary_count,
            secondary = found.len() - primary_count,
            "Parameter extraction complete"
        );
        found
    }
}

/// First match (left to right) whose capture parses as a finite number.
/// Captures like "." or "1.2.3" are skipped, as are digit runs too long
/// for `f64`.
fn first_numeric_capture(regex: &Regex, text: &str) -> Option<f64> {
    regex
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| m.as_str().parse::<f64>().ok().filter(|v| v.is_finite()))
}

/// Extract with the built-in catalogs.
pub fn extract_parameters(text: &str) -> Vec<Measurement> {
    ParameterExtractor::shared().extract(text)
}
