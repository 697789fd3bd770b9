//! Session state machines.
//!
//! `upload` owns the single candidate file and its lifecycle through
//! selection, validation, upload, and confirmation. `chat` owns the
//! question/answer transcript and the in-flight query registry. The two
//! compose top-down: a successful upload produces the file id the
//! conversation queries against.

pub mod chat;
pub mod upload;

pub use chat::{Conversation, SubmittedQuery};
pub use upload::{FileHandle, FileSession, UploadSession};
