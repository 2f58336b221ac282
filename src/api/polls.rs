use chrono::Utc;
use log::{info, warn};
use rocket::{form::Form, response::Redirect, serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::logging::RequestId;
use crate::model::{
    api::{
        question::{CategoryListing, QuestionDetail, QuestionIndex, QuestionResults},
        vote::{VoteForm, NO_CHOICE_MESSAGE},
    },
    db::{category::Category, choice::Choice, question::Question},
    mongodb::{Coll, Id},
    query::{
        cast_vote, choices_for, get_displayable_question, get_question,
        list_questions_by_category, list_recent_questions,
    },
};
use crate::Config;

pub fn routes() -> Vec<Route> {
    routes![index, detail, results, vote, category]
}

#[get("/polls")]
async fn index(questions: Coll<Question>, config: &State<Config>) -> Result<Json<QuestionIndex>> {
    let latest = list_recent_questions(&questions, Utc::now(), config.index_size()).await?;
    Ok(Json(QuestionIndex::new(latest)))
}

#[get("/polls/<question_id>")]
async fn detail(
    question_id: Id,
    questions: Coll<Question>,
    choices: Coll<Choice>,
) -> Result<Json<QuestionDetail>> {
    let question = get_displayable_question(&questions, question_id, Utc::now()).await?;
    let question_choices = choices_for(&choices, question.id).await?;
    Ok(Json(QuestionDetail::new(question, question_choices)))
}

#[get("/polls/<question_id>/results")]
async fn results(
    question_id: Id,
    questions: Coll<Question>,
    choices: Coll<Choice>,
) -> Result<Json<QuestionResults>> {
    let question = get_question(&questions, question_id).await?;
    let question_choices = choices_for(&choices, question.id).await?;
    Ok(Json(QuestionResults::new(question, question_choices)))
}

/// Either the vote went through, or the form comes back with an error.
#[derive(Debug, Responder)]
enum VoteResponse {
    /// Redirect-after-post, so reloading the results never votes again.
    Recorded(Redirect),
    #[response(status = 422)]
    Retry(Json<QuestionDetail>),
}

#[post("/polls/<question_id>/vote", data = "<vote>")]
async fn vote(
    question_id: Id,
    vote: Form<VoteForm>,
    request_id: &RequestId,
    questions: Coll<Question>,
    choices: Coll<Choice>,
) -> Result<VoteResponse> {
    match cast_vote(&questions, &choices, question_id, vote.choice).await {
        Ok(choice) => {
            info!("req{request_id} recorded vote for choice {}", choice.id);
            Ok(VoteResponse::Recorded(Redirect::to(uri!(results(
                choice.question_id
            )))))
        }
        Err(Error::InvalidSelection(reason)) => {
            warn!("req{request_id} rejected vote: {reason}");
            let question = get_question(&questions, question_id).await?;
            let question_choices = choices_for(&choices, question.id).await?;
            let form = QuestionDetail::new(question, question_choices);
            Ok(VoteResponse::Retry(Json(form.with_error(NO_CHOICE_MESSAGE))))
        }
        Err(err) => Err(err),
    }
}

#[get("/categories/<slug>")]
async fn category(
    slug: &str,
    categories: Coll<Category>,
    questions: Coll<Question>,
) -> Result<Json<CategoryListing>> {
    let found = list_questions_by_category(&categories, &questions, slug).await?;
    Ok(Json(CategoryListing {
        slug: slug.to_string(),
        questions: found.into_iter().map(Into::into).collect(),
    }))
}
