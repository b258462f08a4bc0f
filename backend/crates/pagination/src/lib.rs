//! Page-request and page-envelope primitives shared by list endpoints.
//!
//! Endpoints that return collections accept a zero-based page number and a
//! bounded page size, and respond with a [`Page`] envelope carrying the
//! slice plus enough metadata for clients to walk the collection without
//! guessing.

use serde::{Deserialize, Serialize};

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default page size applied when a caller omits one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Validation failures for page requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The requested size was zero.
    #[error("page size must be at least 1")]
    ZeroSize,
    /// The requested size exceeded [`MAX_PAGE_SIZE`].
    #[error("page size {requested} exceeds the maximum of {MAX_PAGE_SIZE}")]
    SizeTooLarge { requested: u32 },
}

/// A validated, zero-based page request.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(2, 10).expect("valid request");
/// assert_eq!(request.offset(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Build a request, rejecting sizes outside `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, size: u32) -> Result<Self, PageRequestError> {
        if size == 0 {
            return Err(PageRequestError::ZeroSize);
        }
        if size > MAX_PAGE_SIZE {
            return Err(PageRequestError::SizeTooLarge { requested: size });
        }
        Ok(Self { page, size })
    }

    /// First page with the default size.
    #[must_use]
    pub fn first() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Zero-based page index.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Row offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Row limit for this page.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// A page of results plus traversal metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub last: bool,
}

impl<T> Page<T> {
    /// Assemble an envelope from one page of content and the collection
    /// total.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    ///
    /// let request = PageRequest::new(0, 2).expect("valid request");
    /// let page = Page::new(vec!["a", "b"], request, 5);
    /// assert_eq!(page.total_pages, 3);
    /// assert!(!page.last);
    /// ```
    #[must_use]
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let total_pages = total_pages(total_elements, request.size());
        let last = request.page() + 1 >= total_pages.max(1);
        Self {
            content,
            page: request.page(),
            size: request.size(),
            total_elements,
            total_pages,
            last,
        }
    }

    /// An empty page for the given request.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Map the content, keeping the envelope metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            last: self.last,
        }
    }
}

fn total_pages(total_elements: u64, size: u32) -> u32 {
    let size = u64::from(size.max(1));
    let pages = total_elements.div_ceil(size);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
