//! The mongodb crate doesn't provide server error code constants, so the ones
//! we react to are listed here.

use mongodb::error::{Error as DbError, ErrorKind, WriteFailure};

/// Server code for a write that violates a unique index.
pub const DUPLICATE_KEY: i32 = 11000;

/// Return true if the given error is a unique index violation.
pub fn is_duplicate_key_error(err: &DbError) -> bool {
    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref e)) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}
