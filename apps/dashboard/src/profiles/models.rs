use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// School year of a student. Serialized with the labels shown in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Grade {
    #[default]
    Ninth,
    Tenth,
    Eleventh,
    Twelfth,
    GapYear,
}

impl Grade {
    pub const ALL: [Grade; 5] = [
        Grade::Ninth,
        Grade::Tenth,
        Grade::Eleventh,
        Grade::Twelfth,
        Grade::GapYear,
    ];

    /// Grades that receive a section in the monthly newsletter.
    pub const NEWSLETTER: [Grade; 4] = [Grade::Ninth, Grade::Tenth, Grade::Eleventh, Grade::Twelfth];

    pub fn label(self) -> &'static str {
        match self {
            Grade::Ninth => "9th Grade",
            Grade::Tenth => "10th Grade",
            Grade::Eleventh => "11th Grade",
            Grade::Twelfth => "12th Grade",
            Grade::GapYear => "Gap Year",
        }
    }

    pub fn parse(label: &str) -> Option<Grade> {
        let label = label.trim();
        Grade::ALL.into_iter().find(|g| g.label() == label)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown labels in a stored profile fall back to the first grade.
impl From<String> for Grade {
    fn from(label: String) -> Self {
        Grade::parse(&label).unwrap_or_default()
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.label().to_string()
    }
}

/// A stored student record. The name is the key in the profile map, not a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentProfile {
    pub grade: Grade,
    /// Target colleges, free text.
    pub target: String,
    pub major: String,
    /// GPA, test scores, activities.
    pub status: String,
    /// Saved document paths. Nothing checks they still exist.
    pub files: Vec<String>,
    pub last_updated: String,
}

/// The whole profile store, keyed by student name.
pub type Profiles = BTreeMap<String, StudentProfile>;

/// Profile fields as entered in the sidebar form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    pub name: String,
    pub grade: Grade,
    pub target: String,
    pub major: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_serializes_with_ui_label() {
        assert_eq!(
            serde_json::to_string(&Grade::Eleventh).unwrap(),
            "\"11th Grade\""
        );
        let g: Grade = serde_json::from_str("\"Gap Year\"").unwrap();
        assert_eq!(g, Grade::GapYear);
    }

    #[test]
    fn test_unknown_grade_falls_back_to_ninth() {
        let g: Grade = serde_json::from_str("\"Kindergarten\"").unwrap();
        assert_eq!(g, Grade::Ninth);
        assert_eq!(Grade::parse("Kindergarten"), None);
    }

    #[test]
    fn test_profile_tolerates_missing_fields() {
        let profile: StudentProfile = serde_json::from_str(r#"{"major": "Biology"}"#).unwrap();
        assert_eq!(profile.major, "Biology");
        assert_eq!(profile.grade, Grade::Ninth);
        assert!(profile.files.is_empty());
    }

    #[test]
    fn test_profile_json_field_names() {
        let profile = StudentProfile {
            grade: Grade::Tenth,
            target: "Stanford".into(),
            files: vec!["student_docs/Alex/a.pdf".into()],
            last_updated: "2026-01-01 00:00:00".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["grade"], "10th Grade");
        assert_eq!(value["target"], "Stanford");
        assert_eq!(value["files"][0], "student_docs/Alex/a.pdf");
        assert!(value.get("last_updated").is_some());
    }
}
