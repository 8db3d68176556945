/// Current page of a paginated catalog, kept within `1..=total_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    total_pages: usize,
}

impl Pager {
    /// Starts on page 1. A source always has at least one page.
    pub fn new(total_pages: usize) -> Self {
        Self {
            page: 1,
            total_pages: total_pages.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Clamps an arbitrary page number into range.
    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages)
    }

    /// Moves to the next page. Returns false on the last page.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Moves to the previous page. Returns false on the first page.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Jumps to `page`, clamped into range.
    pub fn go_to(&mut self, page: usize) {
        self.page = self.clamp(page);
    }
}
