use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    api::id::ApiId,
    db::question::{Question, QuestionCore, MAX_TEXT_LENGTH},
};

/// A question as submitted to the admin API, with its choices inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub text: String,
    pub pub_date: DateTime<Utc>,
    #[serde(default)]
    pub category_id: Option<ApiId>,
    #[serde(default)]
    pub choices: Vec<ChoiceSpec>,
}

impl QuestionSpec {
    /// Validate the spec, splitting it into the question itself and its
    /// choices.
    pub fn into_parts(self) -> Result<(QuestionCore, Vec<ChoiceSpec>)> {
        let text = validate_text("Question", self.text)?;
        let choices = self
            .choices
            .into_iter()
            .map(|choice| {
                Ok(ChoiceSpec {
                    id: choice.id,
                    text: validate_text("Choice", choice.text)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let question = QuestionCore {
            text,
            pub_date: self.pub_date,
            category_id: self.category_id.map(Into::into),
        };
        Ok((question, choices))
    }
}

/// A choice within a [`QuestionSpec`], or added on its own.
///
/// On update, a choice with an `id` renames that existing choice and one
/// without is created. Votes can never be set through the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSpec {
    #[serde(default)]
    pub id: Option<ApiId>,
    pub text: String,
}

/// Trim `text` and check it is non-empty and not too long.
pub fn validate_text(what: &str, text: String) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_TEXT_LENGTH {
        return Err(Error::bad_request(format!(
            "{what} text must be 1 to {MAX_TEXT_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// A row of the admin question list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRow {
    pub id: ApiId,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub category_id: Option<ApiId>,
    /// Slug of the question's category, if it has one.
    pub category: Option<String>,
    pub was_published_recently: bool,
}

impl QuestionRow {
    pub fn new(
        question: Question,
        category: Option<String>,
        now: DateTime<Utc>,
        recent_window: Duration,
    ) -> Self {
        Self {
            was_published_recently: question.was_published_recently(now, recent_window),
            id: question.id.into(),
            category_id: question.question.category_id.map(Into::into),
            category,
            text: question.question.text,
            pub_date: question.question.pub_date,
        }
    }
}

/// The publication date buckets the admin question list can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromFormField)]
pub enum PubDateFilter {
    #[field(value = "today")]
    Today,
    #[field(value = "past_7_days")]
    Past7Days,
    #[field(value = "this_month")]
    ThisMonth,
    #[field(value = "this_year")]
    ThisYear,
}

impl PubDateFilter {
    /// The publication times inside this bucket, relative to `now`, as a
    /// half-open range `[since, until)`. Every bucket ends at the close of
    /// the current day, month or year.
    pub fn range(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let midnight = |year, month, day| {
            Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
                .single()
                .unwrap_or(now)
        };
        let today = midnight(now.year(), now.month(), now.day());
        let tomorrow = today + Duration::days(1);
        match self {
            Self::Today => (today, tomorrow),
            Self::Past7Days => (today - Duration::days(7), tomorrow),
            Self::ThisMonth => {
                let next_month = match now.month() {
                    12 => midnight(now.year() + 1, 1, 1),
                    month => midnight(now.year(), month + 1, 1),
                };
                (midnight(now.year(), now.month(), 1), next_month)
            }
            Self::ThisYear => (midnight(now.year(), 1, 1), midnight(now.year() + 1, 1, 1)),
        }
    }
}

#[cfg(test)]
mod examples {
    use super::*;

    impl QuestionSpec {
        pub fn example() -> Self {
            Self {
                text: "What's your favourite colour?".to_string(),
                pub_date: Utc::now() - Duration::days(1),
                category_id: None,
                choices: vec![ChoiceSpec::new("Red"), ChoiceSpec::new("Blue")],
            }
        }
    }

    impl ChoiceSpec {
        pub fn new(text: &str) -> Self {
            Self {
                id: None,
                text: text.to_string(),
            }
        }
    }
}
