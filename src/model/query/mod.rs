//! Which questions the public may see, and how votes are recorded.
//!
//! All queries take the collections they read as arguments, so callers decide
//! which database they run against.

mod filter;
mod visibility;
mod vote;

pub use filter::QuestionFilter;
pub use visibility::{
    choices_for, find_category_by_slug, get_displayable_question, get_question,
    list_questions_by_category, list_recent_questions,
};
pub use vote::cast_vote;
