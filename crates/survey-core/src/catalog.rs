//! The question catalog.
//!
//! An ordered, immutable list of questions. Order of appearance is the order
//! respondents see them; nothing reorders the catalog at runtime.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::answer::AnswerValue;
use crate::error::{CatalogError, ValidationError};

/// Stable, positive question identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u32);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive integer scale for rating questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: i64,
    pub max: i64,
}

impl RatingScale {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Every selectable rating, lowest first.
    pub fn values(&self) -> impl Iterator<Item = i64> {
        self.min..=self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Rating(RatingScale),
    FreeText,
}

impl QuestionKind {
    pub fn name(&self) -> &'static str {
        match self {
            QuestionKind::Rating(_) => "rating",
            QuestionKind::FreeText => "free_text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub kind: QuestionKind,
}

impl Question {
    pub fn rating(id: u32, text: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            id: QuestionId(id),
            text: text.into(),
            kind: QuestionKind::Rating(RatingScale { min, max }),
        }
    }

    pub fn free_text(id: u32, text: impl Into<String>) -> Self {
        Self {
            id: QuestionId(id),
            text: text.into(),
            kind: QuestionKind::FreeText,
        }
    }

    /// Check that `value` is acceptable for this question.
    ///
    /// Ratings must fall inside the inclusive scale; free text accepts any
    /// string, including the empty one.
    pub fn validate(&self, value: &AnswerValue) -> Result<(), ValidationError> {
        match (&self.kind, value) {
            (QuestionKind::Rating(scale), AnswerValue::Rating(v)) => {
                if scale.contains(*v) {
                    Ok(())
                } else {
                    Err(ValidationError::OutOfRange {
                        question_id: self.id,
                        value: *v,
                        min: scale.min,
                        max: scale.max,
                    })
                }
            }
            (QuestionKind::FreeText, AnswerValue::Text(_)) => Ok(()),
            (kind, value) => Err(ValidationError::WrongKind {
                question_id: self.id,
                expected: kind.name(),
                got: value.kind_name(),
            }),
        }
    }
}

/// Ordered, validated list of questions.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Build a catalog, rejecting empty lists, zero or duplicate ids, and
    /// inverted rating ranges.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for q in &questions {
            if q.id.0 == 0 {
                return Err(CatalogError::ZeroId);
            }
            if !seen.insert(q.id) {
                return Err(CatalogError::DuplicateId(q.id));
            }
            if let QuestionKind::Rating(scale) = q.kind {
                if scale.min > scale.max {
                    return Err(CatalogError::InvertedRange {
                        id: q.id,
                        min: scale.min,
                        max: scale.max,
                    });
                }
            }
        }
        Ok(Self { questions })
    }

    /// The customer-satisfaction survey shipped with the kiosk.
    pub fn customer_satisfaction() -> Self {
        Self {
            questions: vec![
                Question::rating(1, "How satisfied are you with our products?", 1, 5),
                Question::rating(
                    2,
                    "How fair are the prices compared to similar retailers?",
                    1,
                    5,
                ),
                Question::rating(
                    3,
                    "How satisfied are you with the value for money of your purchase?",
                    1,
                    5,
                ),
                Question::rating(
                    4,
                    "On a scale of 1-10 how would you recommend us to your friends and family?",
                    1,
                    10,
                ),
                Question::free_text(5, "What could we do to improve our service?"),
            ],
        }
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn count(&self) -> usize {
        self.questions.len()
    }

    pub fn index_of(&self, id: QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }

    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        Self::customer_satisfaction()
    }
}
