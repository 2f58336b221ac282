use std::collections::HashMap;

use chrono::Utc;
use log::info;
use mongodb::{
    bson::{doc, Bson},
    error::Error as DbError,
    options::FindOptions,
    results::InsertOneResult,
    Client,
};
use rocket::{futures::TryStreamExt, http::Status, serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    model::{
        api::{
            admin::{validate_text, ChoiceSpec, PubDateFilter, QuestionRow, QuestionSpec},
            category::{CategoryDescription, CategorySpec},
            pagination::{Paginated, PaginationRequest},
            question::{ChoiceResult, QuestionResults},
        },
        db::{
            category::{Category, NewCategory},
            choice::{Choice, NewChoice},
            question::{NewQuestion, Question},
        },
        mongodb::{is_duplicate_key_error, Coll, Id},
        query::{choices_for, get_question, QuestionFilter},
    },
    Config,
};

pub fn routes() -> Vec<Route> {
    routes![
        list_categories,
        get_category,
        create_category,
        modify_category,
        delete_category,
        list_questions,
        get_question_admin,
        create_question,
        modify_question,
        delete_question,
        add_choice,
        rename_choice,
        delete_choice,
    ]
}

/// The ID the store assigned to a freshly inserted document.
fn inserted_id(result: InsertOneResult) -> Result<Id> {
    result
        .inserted_id
        .as_object_id()
        .map(Id::from)
        .ok_or_else(|| {
            Error::Status(
                Status::InternalServerError,
                format!("Inserted document has a non-ObjectId key: {}", result.inserted_id),
            )
        })
}

/// Turn a unique index violation on the category slug into a client error.
fn slug_conflict(slug: &str) -> impl FnOnce(DbError) -> Error + '_ {
    move |err| {
        if is_duplicate_key_error(&err) {
            Error::bad_request(format!("Category slug already in use: {slug}"))
        } else {
            err.into()
        }
    }
}

/// Check that a question's category, if it names one, exists.
async fn check_category(categories: &Coll<Category>, category_id: Option<Id>) -> Result<()> {
    if let Some(category_id) = category_id {
        if categories.find_one(category_id.as_doc(), None).await?.is_none() {
            return Err(Error::bad_request(format!("Unknown category {category_id}")));
        }
    }
    Ok(())
}

async fn find_category(categories: &Coll<Category>, category_id: Id) -> Result<Category> {
    categories
        .find_one(category_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Category {category_id}")))
}

async fn question_results(
    questions: &Coll<Question>,
    choices: &Coll<Choice>,
    question_id: Id,
) -> Result<QuestionResults> {
    let question = get_question(questions, question_id).await?;
    let question_choices = choices_for(choices, question_id).await?;
    Ok(QuestionResults::new(question, question_choices))
}

#[get("/admin/categories")]
async fn list_categories(categories: Coll<Category>) -> Result<Json<Vec<CategoryDescription>>> {
    let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
    let all: Vec<Category> = categories.find(None, options).await?.try_collect().await?;
    Ok(Json(all.into_iter().map(Into::into).collect()))
}

#[get("/admin/categories/<category_id>")]
async fn get_category(
    category_id: Id,
    categories: Coll<Category>,
) -> Result<Json<CategoryDescription>> {
    let category = find_category(&categories, category_id).await?;
    Ok(Json(category.into()))
}

#[post("/admin/categories", data = "<spec>", format = "json")]
async fn create_category(
    spec: Json<CategorySpec>,
    new_categories: Coll<NewCategory>,
    categories: Coll<Category>,
) -> Result<Json<CategoryDescription>> {
    let category: NewCategory = spec.0.try_into()?;
    let result = new_categories
        .insert_one(&category, None)
        .await
        .map_err(slug_conflict(&category.slug))?;
    let category_id = inserted_id(result)?;
    info!("Created category {category_id} '{}'", category.slug);

    let category = find_category(&categories, category_id).await?;
    Ok(Json(category.into()))
}

#[put("/admin/categories/<category_id>", data = "<spec>", format = "json")]
async fn modify_category(
    category_id: Id,
    spec: Json<CategorySpec>,
    new_categories: Coll<NewCategory>,
    categories: Coll<Category>,
) -> Result<Json<CategoryDescription>> {
    let category: NewCategory = spec.0.try_into()?;
    let result = new_categories
        .replace_one(category_id.as_doc(), &category, None)
        .await
        .map_err(slug_conflict(&category.slug))?;
    if result.matched_count == 0 {
        return Err(Error::not_found(format!("Category {category_id}")));
    }
    info!("Modified category {category_id}");

    let category = find_category(&categories, category_id).await?;
    Ok(Json(category.into()))
}

/// Delete a category. Its questions survive, filed under no category.
#[delete("/admin/categories/<category_id>")]
async fn delete_category(
    category_id: Id,
    categories: Coll<Category>,
    questions: Coll<Question>,
    db_client: &State<Client>,
) -> Result<()> {
    find_category(&categories, category_id).await?;

    let mut session = db_client.start_session(None).await?;
    session.start_transaction(None).await?;

    categories
        .delete_one_with_session(category_id.as_doc(), None, &mut session)
        .await?;
    let filter = doc! { "category_id": category_id };
    let update = doc! { "$set": { "category_id": Bson::Null } };
    let result = questions
        .update_many_with_session(filter, update, None, &mut session)
        .await?;

    session.commit_transaction().await?;
    info!(
        "Deleted category {category_id}, uncategorising {} questions",
        result.modified_count
    );
    Ok(())
}

#[get("/admin/questions?<search>&<pub_date>&<pagination..>")]
async fn list_questions(
    search: Option<&str>,
    pub_date: Option<PubDateFilter>,
    pagination: PaginationRequest,
    questions: Coll<Question>,
    categories: Coll<Category>,
    config: &State<Config>,
) -> Result<Json<Paginated<QuestionRow>>> {
    let now = Utc::now();
    let mut filter = QuestionFilter::new();
    if let Some(needle) = search.map(str::trim).filter(|s| !s.is_empty()) {
        filter = filter.text_contains(needle);
    }
    if let Some(bucket) = pub_date {
        let (since, until) = bucket.range(now);
        filter = filter.published_since(since).published_before(until);
    }

    let total = filter.count(&questions).await?;
    let page = filter
        .newest_first()
        .skip(pagination.skip())
        .limit(pagination.page_size())
        .find(&questions)
        .await?;

    // Resolve category slugs for the page in one query.
    let category_ids = page
        .iter()
        .filter_map(|q| q.category_id)
        .collect::<Vec<_>>();
    let slugs: HashMap<Id, String> = categories
        .find(doc! { "_id": { "$in": category_ids } }, None)
        .await?
        .map_ok(|c| (c.id, c.category.slug))
        .try_collect()
        .await?;

    let rows = page
        .into_iter()
        .map(|question| {
            let slug = question.category_id.and_then(|id| slugs.get(&id).cloned());
            QuestionRow::new(question, slug, now, config.recent_window())
        })
        .collect();
    Ok(Json(pagination.to_paginated(total, rows)))
}

#[get("/admin/questions/<question_id>")]
async fn get_question_admin(
    question_id: Id,
    questions: Coll<Question>,
    choices: Coll<Choice>,
) -> Result<Json<QuestionResults>> {
    Ok(Json(question_results(&questions, &choices, question_id).await?))
}

#[post("/admin/questions", data = "<spec>", format = "json")]
#[allow(clippy::too_many_arguments)]
async fn create_question(
    spec: Json<QuestionSpec>,
    new_questions: Coll<NewQuestion>,
    new_choices: Coll<NewChoice>,
    questions: Coll<Question>,
    choices: Coll<Choice>,
    categories: Coll<Category>,
    db_client: &State<Client>,
) -> Result<Json<QuestionResults>> {
    let (question, choice_specs) = spec.0.into_parts()?;
    check_category(&categories, question.category_id).await?;

    let question_id = {
        let mut session = db_client.start_session(None).await?;
        session.start_transaction(None).await?;

        let result = new_questions
            .insert_one_with_session(&question, None, &mut session)
            .await?;
        let question_id = inserted_id(result)?;

        let question_choices = choice_specs
            .into_iter()
            .map(|choice| NewChoice::new(question_id, choice.text))
            .collect::<Vec<_>>();
        if !question_choices.is_empty() {
            new_choices
                .insert_many_with_session(&question_choices, None, &mut session)
                .await?;
        }

        session.commit_transaction().await?;
        question_id
    };
    info!("Created question {question_id}");

    Ok(Json(question_results(&questions, &choices, question_id).await?))
}

/// Replace a question and reconcile its choices against the submitted list.
#[put("/admin/questions/<question_id>", data = "<spec>", format = "json")]
#[allow(clippy::too_many_arguments)]
async fn modify_question(
    question_id: Id,
    spec: Json<QuestionSpec>,
    new_questions: Coll<NewQuestion>,
    new_choices: Coll<NewChoice>,
    questions: Coll<Question>,
    choices: Coll<Choice>,
    categories: Coll<Category>,
    db_client: &State<Client>,
) -> Result<Json<QuestionResults>> {
    get_question(&questions, question_id).await?;
    let (question, choice_specs) = spec.0.into_parts()?;
    check_category(&categories, question.category_id).await?;

    // Only this question's own choices can be renamed.
    let existing = choices_for(&choices, question_id).await?;
    let mut kept = Vec::new();
    let mut added = Vec::new();
    for choice in choice_specs {
        match choice.id {
            Some(choice_id) => {
                let choice_id = Id::from(choice_id);
                if !existing.iter().any(|c| c.id == choice_id) {
                    return Err(Error::bad_request(format!(
                        "Choice {choice_id} does not belong to question {question_id}"
                    )));
                }
                kept.push((choice_id, choice.text));
            }
            None => added.push(NewChoice::new(question_id, choice.text)),
        }
    }

    {
        let mut session = db_client.start_session(None).await?;
        session.start_transaction(None).await?;

        new_questions
            .replace_one_with_session(question_id.as_doc(), &question, None, &mut session)
            .await?;

        let kept_ids = kept.iter().map(|(id, _)| *id).collect::<Vec<_>>();
        let stale = doc! {
            "question_id": question_id,
            "_id": { "$nin": kept_ids },
        };
        choices
            .delete_many_with_session(stale, None, &mut session)
            .await?;

        for (choice_id, text) in kept {
            let update = doc! { "$set": { "text": text } };
            choices
                .update_one_with_session(choice_id.as_doc(), update, None, &mut session)
                .await?;
        }
        if !added.is_empty() {
            new_choices
                .insert_many_with_session(&added, None, &mut session)
                .await?;
        }

        session.commit_transaction().await?;
    }
    info!("Modified question {question_id}");

    Ok(Json(question_results(&questions, &choices, question_id).await?))
}

/// Delete a question along with all of its choices.
#[delete("/admin/questions/<question_id>")]
async fn delete_question(
    question_id: Id,
    questions: Coll<Question>,
    choices: Coll<Choice>,
    db_client: &State<Client>,
) -> Result<()> {
    get_question(&questions, question_id).await?;

    let mut session = db_client.start_session(None).await?;
    session.start_transaction(None).await?;

    questions
        .delete_one_with_session(question_id.as_doc(), None, &mut session)
        .await?;
    let result = choices
        .delete_many_with_session(doc! { "question_id": question_id }, None, &mut session)
        .await?;

    session.commit_transaction().await?;
    info!(
        "Deleted question {question_id} and {} choices",
        result.deleted_count
    );
    Ok(())
}

#[post("/admin/questions/<question_id>/choices", data = "<spec>", format = "json")]
async fn add_choice(
    question_id: Id,
    spec: Json<ChoiceSpec>,
    questions: Coll<Question>,
    new_choices: Coll<NewChoice>,
    choices: Coll<Choice>,
) -> Result<Json<ChoiceResult>> {
    get_question(&questions, question_id).await?;
    let text = validate_text("Choice", spec.0.text)?;

    let result = new_choices
        .insert_one(NewChoice::new(question_id, text), None)
        .await?;
    let choice_id = inserted_id(result)?;
    info!("Added choice {choice_id} to question {question_id}");

    let choice = choices
        .find_one(choice_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Choice {choice_id}")))?;
    Ok(Json(choice.into()))
}

/// Change a choice's text. Its votes are left alone.
#[put("/admin/choices/<choice_id>", data = "<spec>", format = "json")]
async fn rename_choice(
    choice_id: Id,
    spec: Json<ChoiceSpec>,
    choices: Coll<Choice>,
) -> Result<Json<ChoiceResult>> {
    let text = validate_text("Choice", spec.0.text)?;
    let update = doc! { "$set": { "text": text } };
    let result = choices.update_one(choice_id.as_doc(), update, None).await?;
    if result.matched_count == 0 {
        return Err(Error::not_found(format!("Choice {choice_id}")));
    }
    info!("Renamed choice {choice_id}");

    let choice = choices
        .find_one(choice_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Choice {choice_id}")))?;
    Ok(Json(choice.into()))
}

#[delete("/admin/choices/<choice_id>")]
async fn delete_choice(choice_id: Id, choices: Coll<Choice>) -> Result<()> {
    let result = choices.delete_one(choice_id.as_doc(), None).await?;
    if result.deleted_count == 0 {
        return Err(Error::not_found(format!("Choice {choice_id}")));
    }
    info!("Deleted choice {choice_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use mongodb::Database;
    use rocket::{
        http::ContentType,
        local::asynchronous::{Client, LocalRequest, LocalResponse},
        serde::json::serde_json,
    };
    use serde::Serialize;

    use crate::model::{
        api::id::ApiId,
        db::question::now_millis,
        query::fixtures::insert_question,
    };

    use super::*;

    async fn send_json<'c, T: Serialize>(request: LocalRequest<'c>, body: &T) -> LocalResponse<'c> {
        request
            .header(ContentType::JSON)
            .body(serde_json::to_string(body).unwrap())
            .dispatch()
            .await
    }

    async fn create_example_category(client: &Client, spec: &CategorySpec) -> CategoryDescription {
        let response = send_json(client.post(uri!(create_category)), spec).await;
        assert_eq!(Status::Ok, response.status());
        response.into_json().await.unwrap()
    }

    async fn create_example_question(client: &Client, spec: &QuestionSpec) -> QuestionResults {
        let response = send_json(client.post(uri!(create_question)), spec).await;
        assert_eq!(Status::Ok, response.status());
        response.into_json().await.unwrap()
    }

    #[backend_test]
    async fn category_lifecycle(client: Client) {
        let created = create_example_category(&client, &CategorySpec::example()).await;
        assert_eq!(created.slug, NewCategory::example().slug);

        let response = client.get(uri!(get_category(Id::from(created.id)))).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(response.into_json::<CategoryDescription>().await.unwrap(), created);

        let renamed = CategorySpec {
            name: "Food".to_string(),
            slug: "food".to_string(),
        };
        let response = send_json(client.put(uri!(modify_category(Id::from(created.id)))),
            &renamed,
        )
        .await;
        assert_eq!(Status::Ok, response.status());
        let modified = response.into_json::<CategoryDescription>().await.unwrap();
        assert_eq!(modified.id, created.id);
        assert_eq!(modified.slug, "food");

        let listed = client
            .get(uri!(list_categories))
            .dispatch()
            .await
            .into_json::<Vec<CategoryDescription>>()
            .await
            .unwrap();
        assert_eq!(listed, vec![modified]);

        let response = client
            .delete(uri!(delete_category(Id::from(created.id))))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let response = client.get(uri!(get_category(Id::from(created.id)))).dispatch().await;
        assert_eq!(Status::NotFound, response.status());
    }

    #[backend_test]
    async fn bad_categories_are_rejected(client: Client, db: Database) {
        create_example_category(&client, &CategorySpec::example()).await;

        // Same slug, different name.
        let duplicate = CategorySpec {
            name: "Something else".to_string(),
            slug: CategorySpec::example().slug,
        };
        let response = send_json(client.post(uri!(create_category)), &duplicate).await;
        assert_eq!(Status::BadRequest, response.status());

        let bad_slug = CategorySpec {
            name: "Spaces".to_string(),
            slug: "has spaces".to_string(),
        };
        let response = send_json(client.post(uri!(create_category)), &bad_slug).await;
        assert_eq!(Status::BadRequest, response.status());

        let count = Coll::<Category>::from_db(&db)
            .count_documents(None, None)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[backend_test]
    async fn deleting_category_keeps_questions(client: Client, questions: Coll<Question>) {
        let category = create_example_category(&client, &CategorySpec::example()).await;
        let mut spec = QuestionSpec::example();
        spec.category_id = Some(category.id);
        let created = create_example_question(&client, &spec).await;
        assert_eq!(created.question.category_id, Some(category.id));

        let response = client
            .delete(uri!(delete_category(Id::from(category.id))))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());

        let question = get_question(&questions, created.question.id.into())
            .await
            .unwrap();
        assert_eq!(question.category_id, None);
    }

    #[backend_test]
    async fn question_with_unknown_category_is_rejected(client: Client, questions: Coll<Question>) {
        let mut spec = QuestionSpec::example();
        spec.category_id = Some(ApiId::from(Id::new()));
        let response = send_json(client.post(uri!(create_question)), &spec).await;
        assert_eq!(Status::BadRequest, response.status());
        assert_eq!(questions.count_documents(None, None).await.unwrap(), 0);
    }

    #[backend_test]
    async fn create_and_get_question(client: Client) {
        let created = create_example_question(&client, &QuestionSpec::example()).await;
        assert_eq!(created.question.text, QuestionSpec::example().text);
        let texts = created
            .choices
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["Red", "Blue"]);
        assert_eq!(created.total_votes, 0);

        let response = client
            .get(uri!(get_question_admin(Id::from(created.question.id))))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(response.into_json::<QuestionResults>().await.unwrap(), created);
    }

    #[backend_test]
    async fn modify_question_reconciles_choices(client: Client, choices: Coll<Choice>) {
        let mut spec = QuestionSpec::example();
        spec.choices.push(ChoiceSpec::new("Green"));
        let created = create_example_question(&client, &spec).await;
        let question_id = Id::from(created.question.id);
        let red = Id::from(created.choices[0].id);
        let blue = Id::from(created.choices[1].id);

        // Give "Red" some votes so we can see they survive the rename.
        choices
            .update_one(red.as_doc(), doc! { "$set": { "votes": 3_i64 } }, None)
            .await
            .unwrap();

        let modified_spec = QuestionSpec {
            text: "Which colour?".to_string(),
            pub_date: spec.pub_date,
            category_id: None,
            choices: vec![
                ChoiceSpec {
                    id: Some(red.into()),
                    text: "Crimson".to_string(),
                },
                ChoiceSpec::new("Yellow"),
            ],
        };
        let response = send_json(client.put(uri!(modify_question(question_id))),
            &modified_spec,
        )
        .await;
        assert_eq!(Status::Ok, response.status());
        let modified = response.into_json::<QuestionResults>().await.unwrap();
        assert_eq!(modified.question.text, "Which colour?");
        assert_eq!(modified.choices.len(), 2);
        assert_eq!(Id::from(modified.choices[0].id), red);
        assert_eq!(modified.choices[0].text, "Crimson");
        assert_eq!(modified.choices[0].votes, 3);
        assert_eq!(modified.choices[1].text, "Yellow");
        assert_eq!(modified.choices[1].votes, 0);
        assert!(modified.choices.iter().all(|c| Id::from(c.id) != blue));
    }

    #[backend_test]
    async fn modify_question_rejects_foreign_choice(client: Client) {
        let first = create_example_question(&client, &QuestionSpec::example()).await;
        let second = create_example_question(&client, &QuestionSpec::example()).await;

        let mut spec = QuestionSpec::example();
        spec.choices = vec![ChoiceSpec {
            id: Some(second.choices[0].id),
            text: "Stolen".to_string(),
        }];
        let response = send_json(client.put(uri!(modify_question(Id::from(first.question.id)))),
            &spec,
        )
        .await;
        assert_eq!(Status::BadRequest, response.status());

        let unchanged = client
            .get(uri!(get_question_admin(Id::from(second.question.id))))
            .dispatch()
            .await
            .into_json::<QuestionResults>()
            .await
            .unwrap();
        assert_eq!(unchanged, second);
    }

    #[backend_test]
    async fn deleting_question_removes_choices(client: Client, choices: Coll<Choice>) {
        let created = create_example_question(&client, &QuestionSpec::example()).await;
        let question_id = Id::from(created.question.id);

        let response = client.delete(uri!(delete_question(question_id))).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(choices.count_documents(None, None).await.unwrap(), 0);

        let response = client.get(uri!(get_question_admin(question_id))).dispatch().await;
        assert_eq!(Status::NotFound, response.status());
        let response = client.delete(uri!(delete_question(question_id))).dispatch().await;
        assert_eq!(Status::NotFound, response.status());
    }

    #[backend_test]
    async fn choice_endpoints(client: Client) {
        let created = create_example_question(&client, &QuestionSpec::example()).await;
        let question_id = Id::from(created.question.id);

        let response = send_json(client.post(uri!(add_choice(question_id))),
            &ChoiceSpec::new("Green"),
        )
        .await;
        assert_eq!(Status::Ok, response.status());
        let green = response.into_json::<ChoiceResult>().await.unwrap();
        assert_eq!(green.text, "Green");
        assert_eq!(green.votes, 0);

        let response = send_json(client.put(uri!(rename_choice(Id::from(green.id)))),
            &ChoiceSpec::new("Emerald"),
        )
        .await;
        assert_eq!(Status::Ok, response.status());
        let emerald = response.into_json::<ChoiceResult>().await.unwrap();
        assert_eq!(emerald.id, green.id);
        assert_eq!(emerald.text, "Emerald");

        let response = send_json(client.put(uri!(rename_choice(Id::from(green.id)))),
            &ChoiceSpec::new("  "),
        )
        .await;
        assert_eq!(Status::BadRequest, response.status());

        let response = client
            .delete(uri!(delete_choice(Id::from(green.id))))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let response = client
            .delete(uri!(delete_choice(Id::from(green.id))))
            .dispatch()
            .await;
        assert_eq!(Status::NotFound, response.status());

        let response = send_json(client.post(uri!(add_choice(Id::new()))),
            &ChoiceSpec::new("Orphan"),
        )
        .await;
        assert_eq!(Status::NotFound, response.status());
    }

    #[backend_test]
    async fn list_questions_filters_and_pages(
        client: Client,
        new_questions: Coll<NewQuestion>,
        new_choices: Coll<NewChoice>,
    ) {
        let now = now_millis();
        for (text, offset) in [
            ("Future question?", Duration::days(30)),
            ("Fresh question?", -Duration::hours(1)),
            ("Week old question?", -Duration::days(3)),
            ("Ancient question?", -Duration::days(400)),
            ("Another ancient one?", -Duration::days(500)),
        ] {
            let question = NewQuestion {
                text: text.to_string(),
                pub_date: now + offset,
                category_id: None,
            };
            insert_question(&new_questions, &new_choices, question, 2).await;
        }

        let all = client
            .get("/admin/questions")
            .dispatch()
            .await
            .into_json::<Paginated<QuestionRow>>()
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 5);
        assert_eq!(all.items[0].text, "Future question?");
        assert!(!all.items[0].was_published_recently);
        assert_eq!(all.items[1].text, "Fresh question?");
        assert!(all.items[1].was_published_recently);
        assert!(!all.items[2].was_published_recently);

        let week = client
            .get("/admin/questions?pub_date=past_7_days")
            .dispatch()
            .await
            .into_json::<Paginated<QuestionRow>>()
            .await
            .unwrap();
        assert_eq!(week.pagination.total, 2);
        assert!(week.items.iter().all(|row| row.text != "Future question?"));

        let today = client
            .get("/admin/questions?pub_date=today")
            .dispatch()
            .await
            .into_json::<Paginated<QuestionRow>>()
            .await
            .unwrap();
        assert!(today.items.iter().all(|row| row.text != "Future question?"));

        let search = client
            .get("/admin/questions?search=ANCIENT&page_size=1&page_num=2")
            .dispatch()
            .await
            .into_json::<Paginated<QuestionRow>>()
            .await
            .unwrap();
        assert_eq!(search.pagination.total, 2);
        assert_eq!(search.items.len(), 1);
        assert_eq!(search.items[0].text, "Another ancient one?");
    }

    #[backend_test]
    async fn list_questions_past_the_last_page_is_empty(
        client: Client,
        new_questions: Coll<NewQuestion>,
        new_choices: Coll<NewChoice>,
    ) {
        insert_question(&new_questions, &new_choices, NewQuestion::example_past(), 2).await;

        let response = client
            .get(format!(
                "/admin/questions?page_num={}&page_size={}",
                u32::MAX,
                u32::MAX
            ))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let page = response
            .into_json::<Paginated<QuestionRow>>()
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert!(page.items.is_empty());
    }

    #[backend_test]
    async fn list_questions_shows_category_slug(client: Client) {
        let category = create_example_category(&client, &CategorySpec::example()).await;
        let mut spec = QuestionSpec::example();
        spec.category_id = Some(category.id);
        create_example_question(&client, &spec).await;
        create_example_question(&client, &QuestionSpec::example()).await;

        let rows = client
            .get("/admin/questions")
            .dispatch()
            .await
            .into_json::<Paginated<QuestionRow>>()
            .await
            .unwrap()
            .items;
        let mut slugs = rows.into_iter().map(|r| r.category).collect::<Vec<_>>();
        slugs.sort();
        assert_eq!(slugs, vec![None, Some(category.slug)]);
    }
}
