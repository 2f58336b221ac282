mod bson;
mod collection;
mod errors;

pub use bson::Id;
pub use collection::{ensure_indexes_exist, Coll, MongoCollection, CHOICES};
pub use errors::is_duplicate_key_error;
