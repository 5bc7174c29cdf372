//! Driven port for fetching one page of a remote list.
//!
//! Every list screen (wallet transactions, notifications, rebates, recharge
//! logs) talks to the API through this port, so paging and staleness rules
//! stay in the domain while adapters own only transport details.

use async_trait::async_trait;
use pagination::PageRequest;

use super::ApiError;
use crate::domain::SessionToken;

/// Page query handed to a [`ListSource`].
#[derive(Debug)]
pub struct ListQuery<'a, F> {
    /// Token of the signed-in user, sent in the request body.
    pub token: &'a SessionToken,
    /// Page cursor for this request.
    pub page: PageRequest,
    /// Domain-specific filters flattened into the request body.
    pub filters: &'a F,
}

/// Port for fetching pages of `T` filtered by `F`.
#[async_trait]
pub trait ListSource<T, F>: Send + Sync
where
    T: Send,
    F: Sync,
{
    /// Fetch one page.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let page = source
    ///     .fetch_page(ListQuery {
    ///         token: &token,
    ///         page: PageRequest::first(PageSize::DEFAULT),
    ///         filters: &NotificationFilter::All,
    ///     })
    ///     .await?;
    /// assert!(page.len() <= 10);
    /// ```
    async fn fetch_page(&self, query: ListQuery<'_, F>) -> Result<Vec<T>, ApiError>;
}
