//! Error notices shown above the wizard form.

use kismet_core::i18n::{Message, Translator};

const VALIDATION_TITLE: Message =
    Message::new("profile.errors.validation_title", "Please fix the following");
const SUBMISSION_TITLE: Message =
    Message::new("profile.errors.submission_title", "Could not save your profile");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Client-side or server-side field validation.
    Validation,
    /// The profile could not be saved for any other reason.
    Submission,
}

/// One aggregated set of messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub kind: NoticeKind,
    pub messages: Vec<String>,
}

impl ErrorNotice {
    pub fn new(kind: NoticeKind, messages: Vec<String>) -> Self {
        Self { kind, messages }
    }

    pub fn title(&self, translator: &dyn Translator) -> String {
        match self.kind {
            NoticeKind::Validation => VALIDATION_TITLE.resolve(translator),
            NoticeKind::Submission => SUBMISSION_TITLE.resolve(translator),
        }
    }

    /// One bullet per message.
    pub fn render(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("• {m}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Holds at most one notice until dismissed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorPanel {
    current: Option<ErrorNotice>,
}

impl ErrorPanel {
    /// Replace whatever is showing.
    pub fn show(&mut self, notice: ErrorNotice) {
        self.current = Some(notice);
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&ErrorNotice> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }
}
