//! Feed pagination slice.

use crate::page::Page;

/// Page state that survives navigation between feed routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArticlesState {
    /// The stored page number.
    pub page: Page,
}

impl ArticlesState {
    pub(super) fn set_page(&mut self, page: Page) {
        self.page = page;
    }
}
