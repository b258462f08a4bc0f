//! Pagination envelope and query parameters for list endpoints.

use pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;

/// Query parameters selecting a page.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// Zero-based page index; defaults to 0.
    pub page: Option<u32>,
    /// Page size; defaults to 20, capped at 100.
    pub size: Option<u32>,
}

impl PageQuery {
    /// Validate the query into a domain page request.
    pub fn into_request(self) -> Result<PageRequest, Error> {
        PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

/// Serialized page envelope returned by list endpoints.
#[derive(Debug, Clone, serde::Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageBody<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub last: bool,
}

impl<T> PageBody<T> {
    /// Convert a domain page, mapping each item into its response body.
    pub fn from_page<S>(page: Page<S>) -> Self
    where
        T: From<S>,
    {
        Self {
            content: page.content.into_iter().map(T::from).collect(),
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            last: page.last,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    fn defaults_apply_when_params_are_omitted() {
        let request = PageQuery {
            page: None,
            size: None,
        }
        .into_request()
        .expect("defaults are valid");
        assert_eq!(request.page(), 0);
        assert_eq!(request.size(), DEFAULT_PAGE_SIZE);
    }

    #[rstest]
    fn oversized_page_is_invalid_request() {
        let error = PageQuery {
            page: Some(0),
            size: Some(1000),
        }
        .into_request()
        .expect_err("too large");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn from_page_maps_content_and_keeps_metadata() {
        let request = PageRequest::new(0, 2).expect("valid request");
        let page = Page::new(vec![1_u32, 2], request, 5);
        let body: PageBody<u64> = PageBody::from_page(page);
        assert_eq!(body.content, vec![1_u64, 2]);
        assert_eq!(body.total_pages, 3);
        assert!(!body.last);
    }
}
