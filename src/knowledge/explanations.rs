//! Patient-facing explanations keyed by canonical test name and status.

use crate::models::Status;

#[derive(Debug, Clone, Copy)]
pub struct KnowledgeEntry {
    pub key: &'static str,
    pub low: &'static str,
    pub normal: &'static str,
    pub high: &'static str,
}

impl KnowledgeEntry {
    pub fn for_status(&self, status: Status) -> &'static str {
        match status {
            Status::Low => self.low,
            Status::Normal => self.normal,
            Status::High => self.high,
        }
    }
}

/// Ordered: lookup returns the first key contained in the test name.
pub const KNOWLEDGE_TABLE: &[KnowledgeEntry] = &[
    KnowledgeEntry {
        key: "Hemoglobin",
        low: "Low hemoglobin indicates anemia, which can cause fatigue and weakness. Eat iron-rich foods like spinach, lentils, and lean meats.",
        normal: "Your hemoglobin level is healthy, indicating good oxygen-carrying capacity.",
        high: "High hemoglobin may indicate dehydration or other conditions. Consult your doctor for evaluation.",
    },
    KnowledgeEntry {
        key: "P.C.V",
        low: "Low packed cell volume suggests anemia. Ensure adequate iron and vitamin B12 intake.",
        normal: "Your packed cell volume is within normal range, indicating healthy blood composition.",
        high: "High packed cell volume may indicate dehydration or other blood disorders.",
    },
    KnowledgeEntry {
        key: "R.B.C",
        low: "Low red blood cell count indicates anemia. Focus on iron-rich diet and consult your doctor.",
        normal: "Your red blood cell count is healthy, ensuring proper oxygen transport.",
        high: "High red blood cell count may indicate dehydration or blood disorders.",
    },
    KnowledgeEntry {
        key: "W.B.C",
        low: "Low white blood cell count may indicate weakened immune system. Avoid infections and consult your doctor.",
        normal: "Your white blood cell count is healthy, indicating good immune function.",
        high: "High white blood cell count may indicate infection or inflammation. Monitor for symptoms.",
    },
    KnowledgeEntry {
        key: "Platelet Count",
        low: "Low platelet count may cause bleeding issues. Avoid injury and consult your doctor immediately.",
        normal: "Your platelet count is healthy, ensuring proper blood clotting.",
        high: "High platelet count may increase clotting risk. Monitor and consult your doctor.",
    },
    KnowledgeEntry {
        key: "Serum Creatinine",
        low: "Low creatinine may indicate reduced muscle mass or kidney issues. Consult your doctor.",
        normal: "Your kidney function appears healthy based on creatinine levels.",
        high: "High creatinine indicates reduced kidney function. Follow your doctor's advice for kidney care.",
    },
    KnowledgeEntry {
        key: "Blood Urea",
        low: "Low blood urea is generally not concerning and may indicate good hydration.",
        normal: "Your blood urea level is healthy, indicating good kidney function.",
        high: "High blood urea may indicate kidney dysfunction or dehydration. Increase fluid intake and consult your doctor.",
    },
    KnowledgeEntry {
        key: "Serum Sodium",
        low: "Low sodium may cause weakness and confusion. Increase salt intake moderately and consult your doctor.",
        normal: "Your sodium level is healthy, maintaining proper fluid balance.",
        high: "High sodium may indicate dehydration. Increase fluid intake and reduce salt consumption.",
    },
    KnowledgeEntry {
        key: "Serum Potassium",
        low: "Low potassium may cause muscle weakness and irregular heartbeat. Eat potassium-rich foods like bananas.",
        normal: "Your potassium level is healthy, supporting proper muscle and heart function.",
        high: "High potassium can be dangerous for heart function. Consult your doctor immediately.",
    },
    KnowledgeEntry {
        key: "Total Bilirubin",
        low: "Low bilirubin is generally not concerning.",
        normal: "Your bilirubin level is healthy, indicating good liver function.",
        high: "High bilirubin may indicate liver or bile duct issues. Consult your doctor for evaluation.",
    },
    KnowledgeEntry {
        key: "SGOT",
        low: "Low SGOT is generally not concerning.",
        normal: "Your liver enzyme levels are healthy.",
        high: "High SGOT may indicate liver damage or heart issues. Consult your doctor.",
    },
    KnowledgeEntry {
        key: "SGPT",
        low: "Low SGPT is generally not concerning.",
        normal: "Your liver enzyme levels are healthy.",
        high: "High SGPT may indicate liver damage. Avoid alcohol and consult your doctor.",
    },
    KnowledgeEntry {
        key: "Albumin",
        low: "Low albumin may indicate malnutrition or liver/kidney issues. Ensure adequate protein intake.",
        normal: "Your albumin level is healthy, indicating good nutritional status.",
        high: "High albumin may indicate dehydration. Increase fluid intake.",
    },
    KnowledgeEntry {
        key: "INR",
        low: "Low INR may increase bleeding risk. Consult your doctor about blood thinning medication.",
        normal: "Your blood clotting time is within normal range.",
        high: "High INR increases bleeding risk. Avoid injury and consult your doctor immediately.",
    },
];

/// First entry whose key is contained in `test_name` (case-insensitive).
pub fn find_entry(test_name: &str) -> Option<&'static KnowledgeEntry> {
    let lower = test_name.to_lowercase();
    KNOWLEDGE_TABLE
        .iter()
        .find(|e| lower.contains(&e.key.to_lowercase()))
}

/// Static explanation for a test and status, if the table covers it.
pub fn lookup(test_name: &str, status: Status) -> Option<&'static str> {
    find_entry(test_name).map(|e| e.for_status(status))
}
