//! Lab test catalogs driving extraction and classification.
//!
//! Names are canonical labels, i.e. what the normalizer leaves in the text
//! (`Blood Sugar` has already become `Glucose` by the time these run).

use crate::models::TestDefinition;

/// Primary catalog, tried in order. Each entry is matched against the
/// cleaned text with the generic name/number/unit shapes.
pub const PRIMARY_CATALOG: &[TestDefinition] = &[
    TestDefinition::new("Hemoglobin", "g/dl", 12.0, 16.0),
    TestDefinition::new("P.C.V", "%", 36.0, 46.0),
    TestDefinition::new("R.B.C", "million/cu mm", 4.5, 5.5),
    TestDefinition::new("W.B.C", "cells/cu mm", 4000.0, 11000.0),
    TestDefinition::new("White Blood Cell Count", "cells/cu mm", 4000.0, 11000.0),
    TestDefinition::new("Platelet Count", "lacs/cu mm", 1.5, 4.5),
    TestDefinition::new("Polymorphs", "%", 40.0, 75.0),
    TestDefinition::new("Lymphocytes", "%", 20.0, 45.0),
    TestDefinition::new("Eosinophils", "%", 1.0, 6.0),
    TestDefinition::new("Monocytes", "%", 2.0, 10.0),
    TestDefinition::new("SR", "mm/Hr", 0.0, 20.0),
    TestDefinition::new("ESR", "mm/Hr", 0.0, 20.0),
    TestDefinition::new("Glucose", "mg/dl", 70.0, 140.0),
    TestDefinition::new("Random Glucose", "mg/dl", 70.0, 140.0),
    TestDefinition::new("Cholesterol", "mg/dl", 125.0, 200.0),
    TestDefinition::new("Serum Creatinine", "mg/dl", 0.6, 1.2),
    TestDefinition::new("Blood Urea", "mg/dl", 7.0, 20.0),
    TestDefinition::new("Serum Sodium", "mmol/L", 135.0, 145.0),
    TestDefinition::new("Serum Potassium", "mmol/L", 3.5, 5.0),
    TestDefinition::new("Serum Chlorides", "mmol/L", 98.0, 107.0),
    TestDefinition::new("Total Bilirubin", "mg/dl", 0.3, 1.2),
    TestDefinition::new("Conjugated Bilirubin", "mg/dl", 0.1, 0.3),
    TestDefinition::new("Alkaline Phosphatase", "U/L", 44.0, 147.0),
    TestDefinition::new("SGOT", "U/L", 10.0, 40.0),
    TestDefinition::new("SGPT", "U/L", 10.0, 40.0),
    TestDefinition::new("Total Serum Proteins", "g/dl", 6.0, 8.3),
    TestDefinition::new("Albumin", "g/dl", 3.5, 5.0),
    TestDefinition::new("PT", "sec", 11.0, 13.0),
    TestDefinition::new("INR", "", 0.8, 1.2),
    TestDefinition::new("APTT", "sec", 25.0, 35.0),
    TestDefinition::new("BT", "min", 2.0, 7.0),
    TestDefinition::new("CT", "min", 2.0, 7.0),
];

/// Hand-tuned override: a raw regex with one numeric capture group and the
/// definition its match produces.
#[derive(Debug, Clone)]
pub struct SecondaryPattern {
    pub pattern: &'static str,
    pub definition: TestDefinition,
}

const fn secondary(pattern: &'static str, definition: TestDefinition) -> SecondaryPattern {
    SecondaryPattern {
        pattern,
        definition,
    }
}

/// Secondary catalog, applied after the primary pass. Covers compact and
/// percent-suffixed layouts seen in printed CBC and chemistry panels.
pub const SECONDARY_CATALOG: &[SecondaryPattern] = &[
    secondary(r"P\.C\.V\s+([\d.]+)", TestDefinition::new("P.C.V", "%", 36.0, 46.0)),
    secondary(r"R\.B\.C\s+([\d.]+)", TestDefinition::new("R.B.C", "million/cu mm", 4.5, 5.5)),
    secondary(r"W\.B\.C\s+([\d.]+)", TestDefinition::new("W.B.C", "cells/cu mm", 4000.0, 11000.0)),
    secondary(r"Platelet Count\s+([\d.]+)", TestDefinition::new("Platelet Count", "lacs/cu mm", 1.5, 4.5)),
    secondary(r"Polymorphs\s+([\d.]+)%", TestDefinition::new("Polymorphs", "%", 40.0, 75.0)),
    secondary(r"Lymphocytes\s+([\d.]+)%", TestDefinition::new("Lymphocytes", "%", 20.0, 45.0)),
    secondary(r"Eosinophils\s+([\d.]+)%", TestDefinition::new("Eosinophils", "%", 1.0, 6.0)),
    secondary(r"Monocytes\s+([\d.]+)%", TestDefinition::new("Monocytes", "%", 2.0, 10.0)),
    secondary(r"SR\s+([\d.]+)mm", TestDefinition::new("ESR", "mm/Hr", 0.0, 20.0)),
    secondary(r"Glucose\s+([\d.]+)", TestDefinition::new("Glucose", "mg/dl", 70.0, 140.0)),
    secondary(r"Serum Creatinine\s+([\d.]+)", TestDefinition::new("Serum Creatinine", "mg/dl", 0.6, 1.2)),
    secondary(r"Blood Urea\s+([\d.]+)", TestDefinition::new("Blood Urea", "mg/dl", 7.0, 20.0)),
    secondary(r"Serum Sodium\s+([\d.]+)", TestDefinition::new("Serum Sodium", "mmol/L", 135.0, 145.0)),
    secondary(r"Serum Potassium\s+([\d.]+)", TestDefinition::new("Serum Potassium", "mmol/L", 3.5, 5.0)),
    secondary(r"Serum Chlorides\s+([\d.]+)", TestDefinition::new("Serum Chlorides", "mmol/L", 98.0, 107.0)),
    secondary(r"Total Bilirubin\s+([\d.]+)", TestDefinition::new("Total Bilirubin", "mg/dl", 0.3, 1.2)),
    secondary(r"Conjugated Bilirubin\s+([\d.]+)", TestDefinition::new("Conjugated Bilirubin", "mg/dl", 0.1, 0.3)),
    secondary(r"Alkaline Phosphatase\s+([\d.]+)", TestDefinition::new("Alkaline Phosphatase", "U/L", 44.0, 147.0)),
    secondary(r"SGOT\s+([\d.]+)", TestDefinition::new("SGOT", "U/L", 10.0, 40.0)),
    secondary(r"SGPT\s+([\d.]+)", TestDefinition::new("SGPT", "U/L", 10.0, 40.0)),
    secondary(r"Total Serum Proteins\s+([\d.]+)", TestDefinition::new("Total Serum Proteins", "g/dl", 6.0, 8.3)),
    secondary(r"Albumin\s+([\d.]+)", TestDefinition::new("Albumin", "g/dl", 3.5, 5.0)),
    secondary(r"PT\s+([\d.]+)", TestDefinition::new("PT", "sec", 11.0, 13.0)),
    secondary(r"INR\s+([\d.]+)", TestDefinition::new("INR", "", 0.8, 1.2)),
    secondary(r"APTT\s+([\d.]+)", TestDefinition::new("APTT", "sec", 25.0, 35.0)),
    secondary(r"BT\s+([\d.]+)", TestDefinition::new("BT", "min", 2.0, 7.0)),
    secondary(r"CT\s+([\d.]+)", TestDefinition::new("CT", "min", 2.0, 7.0)),
];

/// Look up a primary catalog entry by name (case-insensitive).
pub fn definition(name: &str) -> Option<&'static TestDefinition> {
    PRIMARY_CATALOG
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(name))
}
