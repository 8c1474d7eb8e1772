//! Line-oriented chat session: draft editing, commands and transcript output.

use std::path::Path;

use animchat_models::{is_video_url, Attachment, ChatInput, Key, Message, Role, Submission, Transcript};

/// One line of terminal input, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Attach(&'a str),
    Detach,
    Quit,
    /// Draft text. `more` is set when the line ended in `\`.
    Text { text: &'a str, more: bool },
}

pub fn parse_line(line: &str) -> Line<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    let command = line.trim();

    if command == "/quit" || command == "/exit" {
        return Line::Quit;
    }
    if command == "/detach" {
        return Line::Detach;
    }
    if command == "/attach" {
        return Line::Attach("");
    }
    if let Some(path) = command.strip_prefix("/attach ") {
        return Line::Attach(path.trim());
    }

    match line.strip_suffix('\\') {
        Some(text) => Line::Text { text, more: true },
        None => Line::Text {
            text: line,
            more: false,
        },
    }
}

const ATTACH_USAGE: &str = "Usage: /attach <path>";

/// What the caller should do after a line was handled.
#[derive(Debug)]
pub enum Action {
    /// Keep reading; the draft may have changed.
    Continue,
    /// Print a status line and keep reading.
    Notice(String),
    Submit(Submission),
    Quit,
}

/// Draft and transcript for one terminal session.
#[derive(Debug, Default)]
pub struct Session {
    pub input: ChatInput,
    pub transcript: Transcript,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_line(&mut self, line: &str) -> Action {
        match parse_line(line) {
            Line::Quit => Action::Quit,
            Line::Detach => match self.input.remove_image() {
                Some(image) => Action::Notice(format!("Removed {}", image.preview())),
                None => Action::Notice("No image attached".to_string()),
            },
            Line::Attach("") => Action::Notice(ATTACH_USAGE.to_string()),
            Line::Attach(path) => self.attach_file(Path::new(path)),
            Line::Text { text, more } => {
                self.input.insert_str(text);
                match self.input.handle_key(Key::Enter { shift: more }) {
                    Some(submission) => Action::Submit(submission),
                    None => Action::Continue,
                }
            }
        }
    }

    fn attach_file(&mut self, path: &Path) -> Action {
        match std::fs::read(path) {
            Ok(bytes) => {
                let attachment = Attachment::from_file(path, bytes);
                let notice = format!("Attached {}", attachment.preview());
                self.input.attach(attachment);
                Action::Notice(notice)
            }
            Err(e) => Action::Notice(format!("Cannot attach {}: {}", path.display(), e)),
        }
    }
}

/// Render one transcript message for the terminal.
pub fn format_message(message: &Message) -> String {
    match message.role {
        Role::User => format!("you  > {}", message.content.replace('\n', "\n       ")),
        Role::Assistant if is_video_url(&message.content) => {
            format!("video> {}", message.content)
        }
        Role::Assistant => format!("bot  > {}", message.content),
    }
}
