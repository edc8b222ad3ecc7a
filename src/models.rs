use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::labels::Language;
use crate::rubric::{Expectation, RatingField, Rubric};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Form {
    pub id: Uuid,
    pub title: String,
    pub trainer: String,
    pub location: String,
    pub session_date: NaiveDate,
    pub is_open: bool,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewForm {
    pub title: String,
    pub trainer: String,
    pub location: String,
    pub session_date: NaiveDate,
    pub slug: String,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct FormPatch {
    pub title: Option<String>,
    pub session_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub is_open: Option<bool>,
}

impl FormPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.session_date.is_none()
            && self.location.is_none()
            && self.is_open.is_none()
    }
}

/// Raw rating values as stored, indexed by [`RatingField`].
///
/// Values are kept as read; range checks happen where they are consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ratings([Option<i32>; RatingField::COUNT]);

impl Ratings {
    pub fn get(&self, field: RatingField) -> Option<i32> {
        self.0[field.index()]
    }

    pub fn set(&mut self, field: RatingField, value: Option<i32>) {
        self.0[field.index()] = value;
    }

    #[cfg(test)]
    pub fn with(mut self, field: RatingField, value: i32) -> Self {
        self.set(field, Some(value));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participant {
    pub last_name: String,
    pub first_name: String,
    pub job_title: String,
    pub department: String,
}

#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub id: Uuid,
    pub form_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub participant: Participant,
    pub ratings: Ratings,
    pub further_training: Option<String>,
    pub testimonial: Option<String>,
    pub expectations_met: Option<String>,
    pub consent: bool,
    pub ip_hash: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewResponse {
    pub submitted_at: Option<DateTime<Utc>>,
    pub participant: Participant,
    pub ratings: Ratings,
    pub further_training: Option<String>,
    pub testimonial: Option<String>,
    pub expectations_met: Option<String>,
    pub consent: bool,
    pub ip_hash: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionMean {
    pub field: RatingField,
    pub label: String,
    pub mean: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpectationsDistribution {
    pub yes_count: usize,
    pub partial_count: usize,
    pub no_count: usize,
    pub yes_pct: u32,
    pub partial_pct: u32,
    pub no_pct: u32,
}

impl ExpectationsDistribution {
    pub fn total(&self) -> usize {
        self.yes_count + self.partial_count + self.no_count
    }

    pub fn count(&self, answer: Expectation) -> usize {
        match answer {
            Expectation::Yes => self.yes_count,
            Expectation::Partially => self.partial_count,
            Expectation::No => self.no_count,
        }
    }

    pub fn pct(&self, answer: Expectation) -> u32 {
        match answer {
            Expectation::Yes => self.yes_pct,
            Expectation::Partially => self.partial_pct,
            Expectation::No => self.no_pct,
        }
    }
}

/// Everything a presenter needs about one form's responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSummary {
    pub language: Language,
    pub count: usize,
    pub content: Vec<CriterionMean>,
    pub trainer: Vec<CriterionMean>,
    pub expectations: ExpectationsDistribution,
    pub suggestions: Vec<String>,
}

impl FormSummary {
    pub fn rubric(&self, rubric: Rubric) -> &[CriterionMean] {
        match rubric {
            Rubric::Content => &self.content,
            Rubric::Trainer => &self.trainer,
        }
    }
}
