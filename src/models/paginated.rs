/// One page of results plus the cursor for the page after it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResponse<T> {
    pub data: T,
    /// `None` once the last page has been served.
    pub next_page: Option<u32>,
}

impl<T> PaginatedResponse<T> {
    pub fn is_exhausted(&self) -> bool {
        self.next_page.is_none()
    }
}
