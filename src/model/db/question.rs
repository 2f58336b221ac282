use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Duration, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// Maximum length of question and choice text.
pub const MAX_TEXT_LENGTH: usize = 200;

/// A question needs at least this many choices before it is shown publicly.
pub const MIN_DISPLAYABLE_CHOICES: usize = 2;

/// Core question data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCore {
    /// Question text.
    pub text: String,
    /// Publication time; the question is hidden from the public before this.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub pub_date: DateTime<Utc>,
    /// Optional category. Absent means uncategorised.
    #[serde(default)]
    pub category_id: Option<Id>,
}

impl QuestionCore {
    /// A question is published once its publication time has passed.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.pub_date <= now
    }

    /// Published, and not longer ago than `window`.
    pub fn was_published_recently(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - window <= self.pub_date && self.is_published(now)
    }

    /// Whether the public may see this question, given how many choices it has.
    pub fn is_displayable(&self, now: DateTime<Utc>, choice_count: usize) -> bool {
        self.is_published(now) && choice_count >= MIN_DISPLAYABLE_CHOICES
    }
}

/// A question without an ID.
pub type NewQuestion = QuestionCore;

/// A question from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub question: QuestionCore,
}

impl Deref for Question {
    type Target = QuestionCore;

    fn deref(&self) -> &Self::Target {
        &self.question
    }
}

impl DerefMut for Question {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.question
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl QuestionCore {
        /// A question published `days` from now; negative is in the past.
        pub fn example_in_days(text: &str, days: i64) -> Self {
            Self {
                text: text.to_string(),
                pub_date: now_millis() + Duration::days(days),
                category_id: None,
            }
        }

        pub fn example_past() -> Self {
            Self::example_in_days("Past question.", -30)
        }

        pub fn example_future() -> Self {
            Self::example_in_days("Future question.", 30)
        }
    }
}

/// The current time truncated to the millisecond precision MongoDB stores.
#[cfg(test)]
pub fn now_millis() -> DateTime<Utc> {
    use chrono::TimeZone;

    let now = Utc::now();
    Utc.timestamp_millis_opt(now.timestamp_millis())
        .single()
        .unwrap_or(now)
}
