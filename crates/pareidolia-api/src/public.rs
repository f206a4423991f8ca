//! The public catalogue. No login needed; no token is sent.

use pareidolia_model::{EventDto, Page, PageRequest, Promoter};
use pareidolia_session::{SessionError, SessionStore};
use pareidolia_transport::HttpTransport;

use crate::scoped::{Scope, ScopedClient, page_or};

/// Client for `{api}/generic/service`.
#[derive(Debug)]
pub struct PublicClient<T> {
    core: ScopedClient<T>,
}

impl<T> Clone for PublicClient<T> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<T: HttpTransport> PublicClient<T> {
    pub fn new(store: SessionStore<T>) -> Self {
        Self {
            core: ScopedClient::new(store, Scope::Public),
        }
    }

    pub async fn promoter(&self, id: i64) -> Result<Promoter, SessionError> {
        self.core.get(&format!("promoter/{id}")).await
    }

    pub async fn promoters(
        &self,
        page: Option<PageRequest>,
    ) -> Result<Page<Promoter>, SessionError> {
        self.core
            .get_page("promoter/list", page_or(page, 10), &[])
            .await
    }

    pub async fn event(&self, id: i64) -> Result<EventDto, SessionError> {
        self.core.get(&format!("event/{id}")).await
    }

    /// Published events, 10 per page by default.
    pub async fn events(&self, page: Option<PageRequest>) -> Result<Page<EventDto>, SessionError> {
        self.core.get_page("event/list", page_or(page, 10), &[]).await
    }

    pub async fn promoter_events(
        &self,
        promoter_id: i64,
        page: Option<PageRequest>,
    ) -> Result<Page<EventDto>, SessionError> {
        self.core
            .get_page(
                &format!("promoter/{promoter_id}/events"),
                page_or(page, 10),
                &[],
            )
            .await
    }
}
