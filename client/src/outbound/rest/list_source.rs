//! [`ListSource`] adapter for the paged list endpoints.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::dto::PageBody;
use super::{Endpoint, RestApiClient};
use crate::domain::ports::{ApiError, ListQuery, ListSource};

/// Pages of `T` read from one list endpoint.
pub struct RestListSource<T> {
    client: Arc<RestApiClient>,
    endpoint: Endpoint,
    rows: PhantomData<fn() -> T>,
}

impl<T> RestListSource<T> {
    /// Read pages from `endpoint` through `client`.
    pub fn new(client: Arc<RestApiClient>, endpoint: Endpoint) -> Self {
        Self {
            client,
            endpoint,
            rows: PhantomData,
        }
    }
}

impl<T> fmt::Debug for RestListSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestListSource")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T, F> ListSource<T, F> for RestListSource<T>
where
    T: DeserializeOwned + Send + 'static,
    F: Serialize + Sync + 'static,
{
    async fn fetch_page(&self, query: ListQuery<'_, F>) -> Result<Vec<T>, ApiError> {
        let body = PageBody {
            token: query.token.expose(),
            page: query.page.page,
            page_size: query.page.page_size.get(),
            filters: query.filters,
        };
        self.client.post_page(self.endpoint, &body).await
    }
}
