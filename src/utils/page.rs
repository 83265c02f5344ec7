/// Cursor-paged results kept in memory so `prev` never refetches
pub struct Page<T> {
    pub pages: Vec<T>,
    pub current_page: usize,
    /// Cursor for the page after the last one fetched; `None` once exhausted
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Create a pager holding its first page
    pub fn new(first: T, next_cursor: Option<String>) -> Self {
        Page {
            pages: vec![first],
            current_page: 0,
            next_cursor,
        }
    }

    /// Get the current page
    pub fn current(&self) -> &T {
        &self.pages[self.current_page]
    }

    /// Append a freshly fetched page and move onto it
    pub fn push(&mut self, page: T, next_cursor: Option<String>) {
        self.pages.push(page);
        self.current_page = self.pages.len() - 1;
        self.next_cursor = next_cursor;
    }

    /// Move to next page if already fetched
    pub fn next(&mut self) -> bool {
        if self.current_page < self.pages.len() - 1 {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Move to previous page
    pub fn previous(&mut self) -> bool {
        if self.current_page > 0 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to an already fetched page (1-based)
    pub fn goto(&mut self, page_number: usize) -> bool {
        if page_number >= 1 && page_number <= self.pages.len() {
            self.current_page = page_number - 1;
            true
        } else {
            false
        }
    }

    /// Number of pages fetched so far
    pub fn fetched_pages(&self) -> usize {
        self.pages.len()
    }

    /// 1-based number of the current page
    pub fn page_number(&self) -> usize {
        self.current_page + 1
    }

    /// Check if on first page
    pub fn is_first(&self) -> bool {
        self.current_page == 0
    }

    /// Check if on the last page we have and there is nothing more to fetch
    pub fn is_last(&self) -> bool {
        self.current_page == self.pages.len() - 1 && self.next_cursor.is_none()
    }
}
