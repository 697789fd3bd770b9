//! Papyrus - session orchestration for document question answering.
//!
//! A user uploads a document, then asks natural-language questions answered
//! by a retrieval backend. This crate is the client-side layer in between:
//! the upload lifecycle, the conversation transcript with its optimistic
//! "Thinking..." placeholders, and the request/response contracts of the two
//! remote operations. Rendering is someone else's job.

pub mod api;
pub mod config;
pub mod session;
pub mod types;
pub mod util;

pub use api::{ApiError, DocumentBackend, HttpBackend};
pub use config::Config;
pub use session::{Conversation, FileHandle, UploadSession};
pub use types::{Message, Sender};
pub use util::{IdGen, RandomIds};
