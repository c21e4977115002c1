//! Query text layer.
//!
//! Every query passes through [`normalize_query`] before anything else looks
//! at it: leading and trailing whitespace is removed and internal runs are
//! collapsed to a single space. Case and punctuation are left alone; the
//! intent classifier and the embedders decide how to fold them.
//!
//! [`terms`] is the shared word tokenizer used by the hashing embedder.
//!
//! Everything here is a pure function with no I/O.

mod query;
mod token;
mod whitespace;

pub use crate::query::{normalize_query, NormalizedQuery};
pub use crate::token::terms;
pub use crate::whitespace::collapse_whitespace;
