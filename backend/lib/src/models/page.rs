use serde::Serialize;

use crate::pagination::Page;

/// Envelope of every paginated listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    pub has_next: bool,
}

impl<T> PageResponse<T> {
    /// Convert each record of `page` into its response form.
    pub fn from_page<R>(page: Page<R>, f: impl FnMut(R) -> T) -> Self {
        let page = page.map(f);
        Self {
            data: page.items,
            next_token: page.next_token,
            has_next: page.has_next,
        }
    }
}
