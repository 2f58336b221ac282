use log::info;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
};

use crate::error::{Error, Result};
use crate::model::{
    db::{choice::Choice, question::Question},
    mongodb::{Coll, Id},
};

use super::get_question;

/// Record one vote for `choice_id` on the question `question_id`.
///
/// The increment is a single atomic update filtered on both IDs, so a choice
/// belonging to another question is never touched and concurrent votes are
/// never lost. Not idempotent: every successful call adds one vote.
pub async fn cast_vote(
    questions: &Coll<Question>,
    choices: &Coll<Choice>,
    question_id: Id,
    choice_id: Option<Id>,
) -> Result<Choice> {
    let question = get_question(questions, question_id).await?;
    let choice_id = choice_id.ok_or_else(|| {
        Error::InvalidSelection(format!("No choice given for question {question_id}"))
    })?;

    let filter = doc! {
        "_id": choice_id,
        "question_id": question.id,
    };
    let update = doc! {
        "$inc": { "votes": 1_i64 }
    };
    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    let choice = choices
        .find_one_and_update(filter, update, options)
        .await?
        .ok_or_else(|| {
            Error::InvalidSelection(format!(
                "Choice {choice_id} does not belong to question {question_id}"
            ))
        })?;

    info!(
        "Vote for choice {} on question {}, now {} votes",
        choice.id, question.id, choice.votes
    );
    Ok(choice)
}
