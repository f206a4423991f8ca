//! Calls available to a logged-in consumer.

use pareidolia_model::{
    Account, AccountLogin, BookingDto, EventDto, Page, PageRequest, PasswordUpdateDto, ReviewDto,
    Role,
};
use pareidolia_session::{SessionError, SessionStore};
use pareidolia_transport::HttpTransport;

use crate::scoped::{Scope, ScopedClient, page_or};

/// Client for `{api}/consumer`.
#[derive(Debug)]
pub struct ConsumerClient<T> {
    core: ScopedClient<T>,
}

impl<T> Clone for ConsumerClient<T> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<T: HttpTransport> ConsumerClient<T> {
    pub fn new(store: SessionStore<T>) -> Self {
        Self {
            core: ScopedClient::new(store, Scope::Role(Role::Consumer)),
        }
    }

    /// Updates the profile. The response carries a fresh token.
    pub async fn update(&self, account: &Account) -> Result<AccountLogin, SessionError> {
        self.core.post("update", account).await
    }

    pub async fn update_password(
        &self,
        passwords: &PasswordUpdateDto,
    ) -> Result<AccountLogin, SessionError> {
        self.core.post("update/password", passwords).await
    }

    // -- Bookings ---------------------------------------------------------

    pub async fn booking(&self, id: i64) -> Result<BookingDto, SessionError> {
        self.core.get(&format!("booking/{id}")).await
    }

    /// The consumer's bookings, 20 per page by default.
    pub async fn bookings(
        &self,
        page: Option<PageRequest>,
    ) -> Result<Page<BookingDto>, SessionError> {
        self.core
            .get_page("booking/list", page_or(page, 20), &[])
            .await
    }

    pub async fn book_event(&self, event_id: i64) -> Result<BookingDto, SessionError> {
        self.core.post_action(&format!("booking/{event_id}")).await
    }

    pub async fn cancel_booking(&self, id: i64) -> Result<(), SessionError> {
        self.core.delete(&format!("booking/{id}")).await
    }

    /// Cancels the consumer's booking for an event, whatever its id.
    pub async fn cancel_booking_for_event(&self, event_id: i64) -> Result<(), SessionError> {
        self.core.delete(&format!("booking/event/{event_id}")).await
    }

    // -- Events and reviews -----------------------------------------------

    /// An event, with `booked` filled in for this consumer.
    pub async fn event(&self, id: i64) -> Result<EventDto, SessionError> {
        self.core.get(&format!("event/{id}")).await
    }

    pub async fn events(&self, page: Option<PageRequest>) -> Result<Page<EventDto>, SessionError> {
        self.core.get_page("event/list", page_or(page, 10), &[]).await
    }

    pub async fn event_reviews(
        &self,
        event_id: i64,
        page: Option<PageRequest>,
    ) -> Result<Page<ReviewDto>, SessionError> {
        self.core
            .get_page(&format!("review/{event_id}/list"), page_or(page, 10), &[])
            .await
    }

    pub async fn create_review(&self, review: &ReviewDto) -> Result<ReviewDto, SessionError> {
        self.core.post("review/create", review).await
    }
}
