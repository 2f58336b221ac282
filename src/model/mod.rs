//! Data model and store access.
//!
//! - [`db`] holds the records as they are stored.
//! - [`api`] holds the request and response bodies served over HTTP.
//! - [`query`] holds the visibility rules and the vote mutator.
//! - [`mongodb`] holds the collection plumbing shared by all of them.

pub mod api;
pub mod db;
pub mod mongodb;
pub mod query;
