// # Zone Pager Trait
//
// A single-page view of the provider's zone listing. The paging loop and
// the cache live in `crate::zones`; providers only know how to fetch one page.

use async_trait::async_trait;

/// One page of a zone listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZonePage {
    /// Zone names on this page
    pub zones: Vec<String>,
    /// Total number of zones the provider reports for the account
    pub total: usize,
}

/// Trait for fetching zone listing pages
#[async_trait]
pub trait ZonePager: Send + Sync {
    /// Fetch one page
    ///
    /// # Parameters
    ///
    /// - `page`: 1-based page number
    /// - `page_limit`: Maximum number of zones per page
    async fn fetch_zone_page(&self, page: u32, page_limit: u32) -> Result<ZonePage, crate::Error>;
}
