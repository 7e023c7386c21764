use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::{RequestError, ValidationError};

/// Version stamped on every submitted request.
pub const FORM_VERSION: &str = "1.0.0";

/// Upper bound on `totalQuestions`.
pub const MAX_QUESTIONS: i64 = 50;

/// Everything the exam wizard collects before asking for a generated exam.
///
/// Field names follow the wizard's wire format (camelCase). Missing fields
/// default to empty so partially filled forms still load and can be
/// validated field by field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamRequest {
    pub subject: String,
    pub grade_level: String,
    /// Text extracted from the uploaded course material.
    pub topic_text: String,
    pub exam_type: String,
    #[serde(deserialize_with = "text_or_number")]
    pub time_limit: String,
    pub language: Language,
    #[serde(
        deserialize_with = "question_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_questions: Option<i64>,
    #[serde(deserialize_with = "question_types")]
    pub question_types: Vec<QuestionType>,
    #[serde(
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub difficulty: Option<Difficulty>,
    pub keywords: String,
    pub objectifs_pedagogiques: String,
    pub contraintes_specifiques: String,
    pub exemples_questions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ExamRequest {
    pub fn from_json_str(source: &str) -> Result<Self, RequestError> {
        serde_json::from_str(source).map_err(|e| RequestError::from_json(e, source))
    }

    pub fn from_toml_str(source: &str) -> Result<Self, RequestError> {
        Ok(toml::from_str(source)?)
    }

    pub fn parse(source: &str, json: bool) -> Result<Self, RequestError> {
        if json {
            Self::from_json_str(source)
        } else {
            Self::from_toml_str(source)
        }
    }

    /// Load a request file: `.json` files are JSON, anything else is TOML.
    pub fn load(path: &Path) -> Result<Self, RequestError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source, is_json_path(path))
    }

    /// Check every required field, collecting all failures.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let required = [
            ("subject", &self.subject, "subject is required"),
            ("gradeLevel", &self.grade_level, "grade level is required"),
            ("topicText", &self.topic_text, "a topic document is required"),
            ("examType", &self.exam_type, "exam type is required"),
            ("timeLimit", &self.time_limit, "time limit is required"),
        ];
        for (field, value, message) in required {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(field, message));
            }
        }

        match self.total_questions {
            None => errors.push(ValidationError::new(
                "totalQuestions",
                "number of questions is required",
            )),
            Some(n) if n < 1 => {
                errors.push(ValidationError::new("totalQuestions", "minimum 1 question"))
            }
            Some(n) if n > MAX_QUESTIONS => errors.push(ValidationError::new(
                "totalQuestions",
                format!("maximum {} questions", MAX_QUESTIONS),
            )),
            Some(_) => {}
        }

        if self.question_types.is_empty() {
            errors.push(ValidationError::new(
                "questionTypes",
                "select at least one question type",
            ));
        }
        if self.difficulty.is_none() {
            errors.push(ValidationError::new(
                "difficulty",
                "select a difficulty level",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            log::warn!("exam request failed validation on {} field(s)", errors.len());
            Err(errors)
        }
    }

    /// Mark the request as submitted at `now`.
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        self.generation_date = Some(now);
        self.version = Some(FORM_VERSION.to_string());
    }
}

pub fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "MCQ")]
    Mcq,
    TrueFalse,
    ShortAnswer,
    Essay,
    ProblemSolving,
}

impl QuestionType {
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::Mcq => "multiple choice",
            QuestionType::TrueFalse => "true/false",
            QuestionType::ShortAnswer => "short answer",
            QuestionType::Essay => "essay",
            QuestionType::ProblemSolving => "problem solving",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Mixed,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "mixed" => Ok(Difficulty::Mixed),
            other => Err(format!(
                "unknown difficulty \"{}\", expected easy, medium, hard or mixed",
                other
            )),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Mixed => "mixed (a balance of easy, medium and hard)",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    Ar,
    En,
}

impl Language {
    pub fn name(&self) -> &'static str {
        match self {
            Language::Fr => "French",
            Language::Ar => "Arabic",
            Language::En => "English",
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient field decoders for form input
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Integer(n) => n.to_string(),
        TextOrNumber::Float(n) => n.to_string(),
        TextOrNumber::Text(s) => s,
    })
}

/// Number inputs arrive as numbers, numeric strings, or `""` when empty.
fn question_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Integer(n) => Ok(Some(n)),
        TextOrNumber::Float(n) if n.fract() == 0.0 => Ok(Some(n as i64)),
        TextOrNumber::Float(n) => Err(de::Error::custom(format!(
            "question count must be a whole number, got {}",
            n
        ))),
        TextOrNumber::Text(s) if s.trim().is_empty() => Ok(None),
        TextOrNumber::Text(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid question count \"{}\"", s))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionTypeSelection {
    List(Vec<QuestionType>),
    Checkboxes(BTreeMap<QuestionType, bool>),
}

/// Accepts a list of types or a checkbox map of `type -> checked`.
/// Duplicates are dropped, keeping first occurrence.
fn question_types<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<QuestionType>, D::Error> {
    let selected = match QuestionTypeSelection::deserialize(deserializer)? {
        QuestionTypeSelection::List(list) => list,
        QuestionTypeSelection::Checkboxes(map) => map
            .into_iter()
            .filter_map(|(ty, checked)| checked.then_some(ty))
            .collect(),
    };
    let mut types = Vec::with_capacity(selected.len());
    for ty in selected {
        if !types.contains(&ty) {
            types.push(ty);
        }
    }
    Ok(types)
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => s.trim().parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}
