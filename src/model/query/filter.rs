use chrono::{DateTime, Utc};
use mongodb::bson::{doc, from_document, Bson, DateTime as BsonDateTime, Document};
use rocket::futures::TryStreamExt;

use crate::error::Result;
use crate::model::{
    db::question::{Question, MIN_DISPLAYABLE_CHOICES},
    mongodb::{Coll, Id, CHOICES},
};

/// A question query over a fixed set of predicates, compiled to an
/// aggregation pipeline.
///
/// Every predicate is optional; an empty filter matches every question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    id: Option<Id>,
    published_at: Option<DateTime<Utc>>,
    published_since: Option<DateTime<Utc>>,
    published_before: Option<DateTime<Utc>>,
    min_choices: Option<usize>,
    category_id: Option<Id>,
    text_contains: Option<String>,
    newest_first: bool,
    skip: Option<u64>,
    limit: Option<i64>,
}

impl QuestionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Questions the public may see at `now`: published, with enough choices.
    pub fn displayable(now: DateTime<Utc>) -> Self {
        Self::new()
            .published_at(now)
            .min_choices(MIN_DISPLAYABLE_CHOICES)
    }

    pub fn id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Only questions whose publication time is at or before `now`.
    pub fn published_at(mut self, now: DateTime<Utc>) -> Self {
        self.published_at = Some(now);
        self
    }

    /// Only questions published at or after `since`.
    pub fn published_since(mut self, since: DateTime<Utc>) -> Self {
        self.published_since = Some(since);
        self
    }

    /// Only questions published strictly before `until`.
    pub fn published_before(mut self, until: DateTime<Utc>) -> Self {
        self.published_before = Some(until);
        self
    }

    /// Only questions with at least `count` choices.
    pub fn min_choices(mut self, count: usize) -> Self {
        self.min_choices = Some(count);
        self
    }

    pub fn category(mut self, category_id: Id) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Only questions whose text contains `needle`, ignoring case.
    pub fn text_contains(mut self, needle: impl Into<String>) -> Self {
        self.text_contains = Some(needle.into());
        self
    }

    /// Order by publication time, most recent first.
    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// The `$match` document for the predicates held directly on questions.
    fn match_doc(&self) -> Document {
        let mut filter = Document::new();
        if let Some(id) = self.id {
            filter.insert("_id", id);
        }
        let mut pub_date = Document::new();
        if let Some(now) = self.published_at {
            pub_date.insert("$lte", BsonDateTime::from_chrono(now));
        }
        if let Some(since) = self.published_since {
            pub_date.insert("$gte", BsonDateTime::from_chrono(since));
        }
        if let Some(until) = self.published_before {
            pub_date.insert("$lt", BsonDateTime::from_chrono(until));
        }
        if !pub_date.is_empty() {
            filter.insert("pub_date", pub_date);
        }
        if let Some(category_id) = self.category_id {
            filter.insert("category_id", category_id);
        }
        if let Some(ref needle) = self.text_contains {
            filter.insert(
                "text",
                doc! {
                    "$regex": escape_regex(needle),
                    "$options": "i",
                },
            );
        }
        filter
    }

    /// Stages that select matching questions, before any ordering or paging.
    fn selection_stages(&self) -> Vec<Document> {
        let mut stages = vec![doc! { "$match": self.match_doc() }];
        if let Some(min_choices) = self.min_choices {
            let min_choices = min_choices as i64;
            stages.push(doc! {
                "$lookup": {
                    "from": CHOICES,
                    "localField": "_id",
                    "foreignField": "question_id",
                    "as": "choices",
                }
            });
            stages.push(doc! {
                "$match": {
                    "$expr": { "$gte": [{ "$size": "$choices" }, min_choices] }
                }
            });
            stages.push(doc! { "$project": { "choices": 0 } });
        }
        stages
    }

    /// The full aggregation pipeline for this filter.
    pub fn pipeline(&self) -> Vec<Document> {
        let mut stages = self.selection_stages();
        if self.newest_first {
            // Tie-break on ID so equal publication times page consistently.
            stages.push(doc! { "$sort": { "pub_date": -1, "_id": -1 } });
        }
        if let Some(skip) = self.skip.filter(|&skip| skip > 0) {
            // Past i64::MAX there is nothing left to return anyway.
            let skip = i64::try_from(skip).unwrap_or(i64::MAX);
            stages.push(doc! { "$skip": skip });
        }
        // `$limit` must be positive; `find` handles a zero limit itself.
        if let Some(limit) = self.limit.filter(|&limit| limit > 0) {
            stages.push(doc! { "$limit": limit });
        }
        stages
    }

    /// Fetch all matching questions.
    pub async fn find(&self, questions: &Coll<Question>) -> Result<Vec<Question>> {
        if self.limit == Some(0) {
            return Ok(Vec::new());
        }
        let mut cursor = questions.aggregate(self.pipeline(), None).await?;
        let mut found = Vec::new();
        while let Some(question) = cursor.try_next().await? {
            found.push(from_document(question)?);
        }
        Ok(found)
    }

    /// Fetch the first matching question, if any.
    pub async fn find_one(&self, questions: &Coll<Question>) -> Result<Option<Question>> {
        let filter = self.clone().limit(1);
        Ok(filter.find(questions).await?.into_iter().next())
    }

    /// Count matching questions, ignoring paging.
    pub async fn count(&self, questions: &Coll<Question>) -> Result<u64> {
        let mut stages = self.selection_stages();
        stages.push(doc! { "$count": "count" });
        let mut cursor = questions.aggregate(stages, None).await?;
        let count = match cursor.try_next().await? {
            Some(result) => match result.get("count") {
                Some(Bson::Int32(n)) => *n as u64,
                Some(Bson::Int64(n)) => *n as u64,
                _ => 0,
            },
            // `$count` emits nothing when no documents match.
            None => 0,
        };
        Ok(count)
    }
}

/// Escape regex metacharacters so `text` matches literally.
fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
