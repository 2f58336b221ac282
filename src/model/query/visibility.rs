use chrono::{DateTime, Utc};
use mongodb::{bson::doc, options::FindOptions};
use rocket::futures::TryStreamExt;

use crate::error::{Error, Result};
use crate::model::{
    db::{category::Category, choice::Choice, question::Question},
    mongodb::{Coll, Id},
};

use super::QuestionFilter;

/// The most recent displayable questions, newest first, at most `limit` of them.
pub async fn list_recent_questions(
    questions: &Coll<Question>,
    now: DateTime<Utc>,
    limit: u32,
) -> Result<Vec<Question>> {
    QuestionFilter::displayable(now)
        .newest_first()
        .limit(limit)
        .find(questions)
        .await
}

/// The question with the given ID, provided the public may see it at `now`.
pub async fn get_displayable_question(
    questions: &Coll<Question>,
    id: Id,
    now: DateTime<Utc>,
) -> Result<Question> {
    QuestionFilter::displayable(now)
        .id(id)
        .find_one(questions)
        .await?
        .ok_or_else(|| Error::not_found(format!("Question {id}")))
}

/// The question with the given ID, whether or not it is displayable.
pub async fn get_question(questions: &Coll<Question>, id: Id) -> Result<Question> {
    questions
        .find_one(id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Question {id}")))
}

pub async fn find_category_by_slug(
    categories: &Coll<Category>,
    slug: &str,
) -> Result<Option<Category>> {
    Ok(categories.find_one(doc! { "slug": slug }, None).await?)
}

/// Every question in the category with the given slug, newest first.
///
/// Unlike the index this applies no publication or choice-count filter.
/// An unknown slug yields no questions.
pub async fn list_questions_by_category(
    categories: &Coll<Category>,
    questions: &Coll<Question>,
    slug: &str,
) -> Result<Vec<Question>> {
    match find_category_by_slug(categories, slug).await? {
        Some(category) => {
            QuestionFilter::new()
                .category(category.id)
                .newest_first()
                .find(questions)
                .await
        }
        None => Ok(Vec::new()),
    }
}

/// The choices of a question, in the order they were added.
pub async fn choices_for(choices: &Coll<Choice>, question_id: Id) -> Result<Vec<Choice>> {
    let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
    let found = choices
        .find(doc! { "question_id": question_id }, options)
        .await?
        .try_collect()
        .await?;
    Ok(found)
}
