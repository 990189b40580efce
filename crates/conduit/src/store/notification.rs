//! Error notification slice.

/// Holds the single error message currently shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    /// Current message, if any.
    pub error_message: Option<String>,
}

impl NotificationState {
    pub(super) fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    pub(super) fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Check if an error is being shown.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }
}
