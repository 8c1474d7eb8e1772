//! Chat input draft: text plus an optional attached image.

use std::path::{Path, PathBuf};

/// Image attached to the draft (pasted or picked from disk).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Display name used for the preview line
    pub name: String,
    pub bytes: Vec<u8>,
    pub source: Option<PathBuf>,
}

impl Attachment {
    /// Image pasted from the clipboard.
    pub fn pasted(bytes: Vec<u8>) -> Self {
        Self {
            name: "pasted image".to_string(),
            bytes,
            source: None,
        }
    }

    /// Image picked from a file on disk.
    pub fn from_file(path: &Path, bytes: Vec<u8>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            bytes,
            source: Some(path.to_path_buf()),
        }
    }

    /// One-line preview, e.g. `diagram.png (12.3 KB)`.
    pub fn preview(&self) -> String {
        format!("{} ({:.1} KB)", self.name, self.bytes.len() as f64 / 1024.0)
    }
}

/// Key events the input understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter { shift: bool },
}

/// Emitted when the draft is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub text: String,
    pub image: Option<Attachment>,
}

/// Editable draft state.
#[derive(Debug, Clone, Default)]
pub struct ChatInput {
    draft: String,
    image: Option<Attachment>,
}

impl ChatInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn image(&self) -> Option<&Attachment> {
        self.image.as_ref()
    }

    pub fn insert_str(&mut self, text: &str) {
        self.draft.push_str(text);
    }

    /// Attach an image, replacing any previous one.
    pub fn attach(&mut self, attachment: Attachment) {
        self.image = Some(attachment);
    }

    pub fn remove_image(&mut self) -> Option<Attachment> {
        self.image.take()
    }

    /// Apply a key event. Enter submits, Shift+Enter inserts a newline.
    pub fn handle_key(&mut self, key: Key) -> Option<Submission> {
        match key {
            Key::Char(c) => {
                self.draft.push(c);
                None
            }
            Key::Backspace => {
                self.draft.pop();
                None
            }
            Key::Enter { shift: true } => {
                self.draft.push('\n');
                None
            }
            Key::Enter { shift: false } => self.submit(),
        }
    }

    /// Take the draft if it has text or an image; otherwise leave it untouched.
    pub fn submit(&mut self) -> Option<Submission> {
        if self.draft.trim().is_empty() && self.image.is_none() {
            return None;
        }
        Some(Submission {
            text: std::mem::take(&mut self.draft),
            image: self.image.take(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(input: &mut ChatInput, text: &str) {
        for c in text.chars() {
            assert!(input.handle_key(Key::Char(c)).is_none());
        }
    }

    #[test]
    fn test_empty_draft_does_not_submit() {
        let mut input = ChatInput::new();
        assert!(input.handle_key(Key::Enter { shift: false }).is_none());

        type_text(&mut input, "   ");
        assert!(input.submit().is_none());
        assert_eq!(input.draft(), "   ");
    }

    #[test]
    fn test_enter_submits_and_clears() {
        let mut input = ChatInput::new();
        type_text(&mut input, "sine wave");
        let submission = input.handle_key(Key::Enter { shift: false }).unwrap();
        assert_eq!(submission.text, "sine wave");
        assert!(submission.image.is_none());
        assert_eq!(input.draft(), "");
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut input = ChatInput::new();
        type_text(&mut input, "line one");
        assert!(input.handle_key(Key::Enter { shift: true }).is_none());
        type_text(&mut input, "line two");
        let submission = input.submit().unwrap();
        assert_eq!(submission.text, "line one\nline two");
    }

    #[test]
    fn test_image_only_submission() {
        let mut input = ChatInput::new();
        input.attach(Attachment::pasted(vec![0u8; 2048]));
        assert_eq!(input.image().unwrap().preview(), "pasted image (2.0 KB)");

        let submission = input.submit().unwrap();
        assert_eq!(submission.text, "");
        assert!(submission.image.is_some());
        assert!(input.image().is_none());
    }

    #[test]
    fn test_remove_image() {
        let mut input = ChatInput::new();
        input.attach(Attachment::from_file(Path::new("/tmp/graph.png"), vec![1, 2, 3]));
        assert_eq!(input.image().unwrap().name, "graph.png");
        assert!(input.remove_image().is_some());
        assert!(input.submit().is_none());
    }

    #[test]
    fn test_backspace() {
        let mut input = ChatInput::new();
        type_text(&mut input, "ab");
        input.handle_key(Key::Backspace);
        assert_eq!(input.draft(), "a");
    }
}
