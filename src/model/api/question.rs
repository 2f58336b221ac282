use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    api::id::ApiId,
    db::{choice::Choice, question::Question},
};

/// Shown in place of the index list when no question is displayable.
pub const NO_POLLS_MESSAGE: &str = "No polls are available.";

/// The public face of a question, without its choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub id: ApiId,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub category_id: Option<ApiId>,
}

impl From<Question> for QuestionSummary {
    fn from(question: Question) -> Self {
        Self {
            id: question.id.into(),
            category_id: question.question.category_id.map(Into::into),
            text: question.question.text,
            pub_date: question.question.pub_date,
        }
    }
}

/// The index page: the latest questions, or a message saying there are none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionIndex {
    pub latest_questions: Vec<QuestionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl QuestionIndex {
    pub fn new(questions: Vec<Question>) -> Self {
        let message = questions.is_empty().then(|| NO_POLLS_MESSAGE.to_string());
        Self {
            latest_questions: questions.into_iter().map(Into::into).collect(),
            message,
        }
    }
}

/// A choice as offered on the voting form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceDescription {
    pub id: ApiId,
    pub text: String,
}

impl From<Choice> for ChoiceDescription {
    fn from(choice: Choice) -> Self {
        Self {
            id: choice.id.into(),
            text: choice.choice.text,
        }
    }
}

/// The voting form for one question, optionally with an error from a
/// previous attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDetail {
    pub question: QuestionSummary,
    pub choices: Vec<ChoiceDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl QuestionDetail {
    pub fn new(question: Question, choices: Vec<Choice>) -> Self {
        Self {
            question: question.into(),
            choices: choices.into_iter().map(Into::into).collect(),
            error_message: None,
        }
    }

    /// Re-present the form with an error.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// A choice with its tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceResult {
    pub id: ApiId,
    pub text: String,
    pub votes: u64,
}

impl From<Choice> for ChoiceResult {
    fn from(choice: Choice) -> Self {
        Self {
            id: choice.id.into(),
            votes: choice.choice.votes,
            text: choice.choice.text,
        }
    }
}

/// The results page for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResults {
    pub question: QuestionSummary,
    pub choices: Vec<ChoiceResult>,
    pub total_votes: u64,
}

impl QuestionResults {
    pub fn new(question: Question, choices: Vec<Choice>) -> Self {
        let choices = choices.into_iter().map(ChoiceResult::from).collect::<Vec<_>>();
        Self {
            question: question.into(),
            total_votes: choices.iter().map(|c| c.votes).sum(),
            choices,
        }
    }
}

/// The questions filed under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryListing {
    pub slug: String,
    pub questions: Vec<QuestionSummary>,
}
