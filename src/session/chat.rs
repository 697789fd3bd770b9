use std::collections::HashSet;

use tracing::{info, warn};
use uuid::Uuid;

use crate::api::{ApiError, DocumentBackend};
use crate::types::{Message, Sender};
use crate::util::IdGen;

/// Appended when the backend answers with an empty payload.
pub const EMPTY_ANSWER_TEXT: &str = "Couldn't find an answer in the file.";
/// Appended when the query call itself fails.
pub const QUERY_ERROR_TEXT: &str = "Error while querying. Please try again.";

/// Handed back by [`Conversation::submit`]; the driver sends the question and
/// settles it through [`Conversation::resolve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmittedQuery {
    pub placeholder_id: Uuid,
    pub question: String,
}

/// The question/answer transcript plus the registry of in-flight queries.
///
/// The transcript is append-only except for one mutation: removing a pending
/// placeholder once its query settles. Placeholders are identified by id, not
/// position, so any number of queries may be in flight at once and each
/// resolution only ever touches its own.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    pending: HashSet<Uuid>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Appends the user message and its pending placeholder, and registers
    /// the placeholder id. Returns `None` (touching nothing) when the
    /// question trims to empty.
    pub fn submit(&mut self, question: &str, ids: &mut dyn IdGen) -> Option<SubmittedQuery> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        self.messages
            .push(Message::new(ids, Sender::User, question));
        let placeholder = Message::pending(ids);
        let placeholder_id = placeholder.id;
        self.messages.push(placeholder);
        self.pending.insert(placeholder_id);
        info!(%placeholder_id, "question submitted");

        Some(SubmittedQuery {
            placeholder_id,
            question: question.to_string(),
        })
    }

    /// Settles one in-flight query: drops its placeholder from the transcript
    /// and appends the answer, the empty-answer notice, or the error notice.
    /// Ids that are unknown or already settled are ignored, so a stray double
    /// resolution cannot disturb other pending queries.
    pub fn resolve(
        &mut self,
        placeholder_id: Uuid,
        outcome: Result<String, ApiError>,
        ids: &mut dyn IdGen,
    ) {
        if !self.pending.remove(&placeholder_id) {
            warn!(%placeholder_id, "resolution for unknown query ignored");
            return;
        }
        self.messages.retain(|msg| msg.id != placeholder_id);

        let text = match outcome {
            Ok(answer) if answer.is_empty() => EMPTY_ANSWER_TEXT.to_string(),
            Ok(answer) => answer,
            Err(err) => {
                warn!(%placeholder_id, error = %err, "query failed");
                QUERY_ERROR_TEXT.to_string()
            }
        };
        self.messages.push(Message::new(ids, Sender::Assistant, text));
    }

    /// Drives a full exchange against the backend: submit, remote query,
    /// resolve. Returns the placeholder id the exchange was tracked under,
    /// or `None` for an empty question.
    pub async fn ask(
        &mut self,
        backend: &dyn DocumentBackend,
        file_id: &str,
        question: &str,
        ids: &mut dyn IdGen,
    ) -> Option<Uuid> {
        let submitted = self.submit(question, ids)?;
        let outcome = backend.query(file_id, &submitted.question).await;
        self.resolve(submitted.placeholder_id, outcome, ids);
        Some(submitted.placeholder_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PLACEHOLDER_TEXT;

    struct SeqIds(u128);

    impl IdGen for SeqIds {
        fn next_id(&mut self) -> Uuid {
            self.0 += 1;
            Uuid::from_u128(self.0)
        }
    }

    #[test]
    fn empty_question_is_a_no_op() {
        let mut chat = Conversation::new();
        let mut ids = SeqIds(0);
        assert!(chat.submit("   ", &mut ids).is_none());
        assert!(chat.messages().is_empty());
        assert_eq!(chat.pending_count(), 0);
    }

    #[test]
    fn submit_appends_user_then_placeholder() {
        let mut chat = Conversation::new();
        let mut ids = SeqIds(0);
        let submitted = chat.submit("  What is this about?  ", &mut ids).unwrap();

        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[0].text, "What is this about?");
        assert_eq!(messages[1].sender, Sender::Assistant);
        assert_eq!(messages[1].text, PLACEHOLDER_TEXT);
        assert_eq!(messages[1].id, submitted.placeholder_id);
        assert_eq!(chat.pending_count(), 1);
    }

    #[test]
    fn round_trip_replaces_placeholder_with_answer() {
        let mut chat = Conversation::new();
        let mut ids = SeqIds(0);
        let submitted = chat.submit("Summarize this document", &mut ids).unwrap();
        chat.resolve(submitted.placeholder_id, Ok("X".to_string()), &mut ids);

        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[0].text, "Summarize this document");
        assert_eq!(messages[1].sender, Sender::Assistant);
        assert_eq!(messages[1].text, "X");
        assert_eq!(chat.pending_count(), 0);
    }

    #[test]
    fn empty_answer_falls_back_to_notice() {
        let mut chat = Conversation::new();
        let mut ids = SeqIds(0);
        let submitted = chat.submit("Anything?", &mut ids).unwrap();
        chat.resolve(submitted.placeholder_id, Ok(String::new()), &mut ids);
        assert_eq!(chat.messages().last().unwrap().text, EMPTY_ANSWER_TEXT);
    }

    #[test]
    fn failure_replaces_placeholder_with_error_notice() {
        let mut chat = Conversation::new();
        let mut ids = SeqIds(0);
        let submitted = chat.submit("Anything?", &mut ids).unwrap();
        let err = ApiError::Backend {
            status: 500,
            body: "internal".to_string(),
        };
        chat.resolve(submitted.placeholder_id, Err(err), &mut ids);

        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, QUERY_ERROR_TEXT);
        assert_eq!(chat.pending_count(), 0);
    }

    #[test]
    fn resolution_only_removes_its_own_placeholder() {
        let mut chat = Conversation::new();
        let mut ids = SeqIds(0);
        let first = chat.submit("First question", &mut ids).unwrap();
        let second = chat.submit("Second question", &mut ids).unwrap();
        assert_eq!(chat.pending_count(), 2);

        // second settles before first
        chat.resolve(second.placeholder_id, Ok("B".to_string()), &mut ids);

        assert_eq!(chat.pending_count(), 1);
        let texts: Vec<&str> = chat.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "First question",
                PLACEHOLDER_TEXT,
                "Second question",
                "B"
            ]
        );
        assert!(chat.messages().iter().any(|m| m.id == first.placeholder_id));

        chat.resolve(first.placeholder_id, Ok("A".to_string()), &mut ids);
        let texts: Vec<&str> = chat.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["First question", "Second question", "B", "A"]);
        assert_eq!(chat.pending_count(), 0);
    }

    #[test]
    fn double_resolution_is_ignored() {
        let mut chat = Conversation::new();
        let mut ids = SeqIds(0);
        let submitted = chat.submit("Once", &mut ids).unwrap();
        chat.resolve(submitted.placeholder_id, Ok("answer".to_string()), &mut ids);
        chat.resolve(submitted.placeholder_id, Ok("again".to_string()), &mut ids);
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[1].text, "answer");
    }
}
