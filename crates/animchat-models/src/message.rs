//! Chat messages and the session transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::is_video_url;

/// Shown to the user for any failed request; the failing stage is not exposed.
pub const GENERIC_ERROR_MESSAGE: &str =
    "Sorry, there was an error processing your request. Please try again.";

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub role: Role,
    /// Set when the message carries a playable video link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: String, video_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            role,
            video_url,
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), None)
    }

    /// Assistant message. Content that classifies as a video URL is flagged.
    pub fn assistant(content: impl Into<String>) -> Self {
        let content = content.into();
        let video_url = is_video_url(&content).then(|| content.clone());
        Self::new(Role::Assistant, content, video_url)
    }

    /// Assistant message for a link returned by the render pipeline.
    pub fn video(url: impl Into<String>) -> Self {
        let url = url.into();
        Self::new(Role::Assistant, url.clone(), Some(url))
    }

    pub fn is_video(&self) -> bool {
        self.video_url.is_some()
    }
}

/// Append-only, ordered list of messages for one session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    loading: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True while a pipeline request is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Record the user's submission and mark a request as in flight.
    pub fn begin_request(&mut self, content: impl Into<String>) -> &Message {
        self.loading = true;
        self.push(Message::user(content))
    }

    /// Append one video message per returned link and clear the loading flag.
    ///
    /// Returns the messages that were appended.
    pub fn complete_with_links<I, S>(&mut self, links: I) -> &[Message]
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let start = self.messages.len();
        self.messages.extend(links.into_iter().map(Message::video));
        self.loading = false;
        &self.messages[start..]
    }

    /// Append the generic error message and clear the loading flag.
    pub fn complete_with_error(&mut self) -> &Message {
        self.loading = false;
        self.push(Message::assistant(GENERIC_ERROR_MESSAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_request_lifecycle() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());

        transcript.begin_request("explain pythagoras");
        assert!(transcript.is_loading());
        assert_eq!(transcript.messages()[0].role, Role::User);

        let appended = transcript.complete_with_links(vec![
            "https://res.cloudinary.com/demo/video/upload/a.mp4",
            "https://res.cloudinary.com/demo/video/upload/b.mp4",
        ]);
        assert_eq!(appended.len(), 2);
        assert!(appended.iter().all(Message::is_video));
        assert!(!transcript.is_loading());
        assert_eq!(transcript.len(), 3);
    }

    #[test]
    fn test_transcript_error_message() {
        let mut transcript = Transcript::new();
        transcript.begin_request("hi");
        let msg = transcript.complete_with_error();
        assert_eq!(msg.content, GENERIC_ERROR_MESSAGE);
        assert_eq!(msg.role, Role::Assistant);
        assert!(!msg.is_video());
        assert!(!transcript.is_loading());
    }

    #[test]
    fn test_assistant_message_classifies_content() {
        let video = Message::assistant("https://ffmpeg-backend.up.railway.app/out/1");
        assert!(video.is_video());
        let text = Message::assistant("just text");
        assert!(!text.is_video());
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::user("a");
        let b = Message::user("a");
        assert_ne!(a.id, b.id);
    }
}
