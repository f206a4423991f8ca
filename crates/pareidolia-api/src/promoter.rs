//! Calls available to a logged-in promoter.

use pareidolia_model::{
    AccountLogin, BookingDto, EventDto, EventState, EventUpdateDto, MessageDto, Page,
    PageRequest, PasswordUpdateDto, Promoter, ReviewDto, Role,
};
use pareidolia_session::{SessionError, SessionStore};
use pareidolia_transport::HttpTransport;

use crate::scoped::{ImageFile, Scope, ScopedClient, page_or};

/// Client for `{api}/promoter`.
///
/// Event listings only include events the promoter is attached to.
#[derive(Debug)]
pub struct PromoterClient<T> {
    core: ScopedClient<T>,
}

impl<T> Clone for PromoterClient<T> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<T: HttpTransport> PromoterClient<T> {
    pub fn new(store: SessionStore<T>) -> Self {
        Self {
            core: ScopedClient::new(store, Scope::Role(Role::Promoter)),
        }
    }

    pub async fn update(&self, promoter: &Promoter) -> Result<AccountLogin, SessionError> {
        self.core.post("update", promoter).await
    }

    pub async fn update_password(
        &self,
        passwords: &PasswordUpdateDto,
    ) -> Result<AccountLogin, SessionError> {
        self.core.post("update/password", passwords).await
    }

    pub async fn update_image(&self, image: ImageFile) -> Result<Promoter, SessionError> {
        self.core.upload("update/image", image).await
    }

    pub async fn delete_image(&self) -> Result<Promoter, SessionError> {
        self.core.delete_returning("image").await
    }

    // -- Events -----------------------------------------------------------

    pub async fn events(&self, page: Option<PageRequest>) -> Result<Page<EventDto>, SessionError> {
        self.core.get_page("event/list", page_or(page, 10), &[]).await
    }

    pub async fn published_events(
        &self,
        page: Option<PageRequest>,
    ) -> Result<Page<EventDto>, SessionError> {
        self.core
            .get_page(
                "event/list",
                page_or(page, 10),
                &[("state", EventState::Published.as_str())],
            )
            .await
    }

    pub async fn event(&self, id: i64) -> Result<EventDto, SessionError> {
        self.core.get(&format!("event/{id}")).await
    }

    pub async fn create_event(&self, event: &EventUpdateDto) -> Result<EventDto, SessionError> {
        self.core.post("event/create", event).await
    }

    pub async fn update_event(&self, event: &EventUpdateDto) -> Result<EventDto, SessionError> {
        self.core.post("event/update", event).await
    }

    /// Attaches another promoter to an event.
    pub async fn add_promoter(
        &self,
        event_id: i64,
        promoter_id: i64,
    ) -> Result<EventDto, SessionError> {
        self.core
            .post_action(&format!("event/{event_id}/add-promoter/{promoter_id}"))
            .await
    }

    /// Submits a draft for administrator review.
    pub async fn request_review(&self, event_id: i64) -> Result<EventDto, SessionError> {
        self.core.post_action(&format!("event/{event_id}/review")).await
    }

    pub async fn update_event_image(
        &self,
        event_id: i64,
        image: ImageFile,
    ) -> Result<EventDto, SessionError> {
        self.core.upload(&format!("event/{event_id}/image"), image).await
    }

    pub async fn delete_event_image(&self, event_id: i64) -> Result<EventDto, SessionError> {
        self.core
            .delete_returning(&format!("event/{event_id}/image"))
            .await
    }

    // -- Reviews, bookings, messages --------------------------------------

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

    pub async fn event_bookings(
        &self,
        event_id: i64,
        page: Option<PageRequest>,
    ) -> Result<Page<BookingDto>, SessionError> {
        self.core
            .get_page(&format!("booking/event/{event_id}"), page_or(page, 20), &[])
            .await
    }

    pub async fn messages(
        &self,
        event_id: i64,
        page: Option<PageRequest>,
    ) -> Result<Page<MessageDto>, SessionError> {
        self.core
            .get_page(&format!("message/{event_id}/list"), page_or(page, 10), &[])
            .await
    }

    /// Posts a message on an event's board. The body is the bare text.
    pub async fn create_message(
        &self,
        event_id: i64,
        message: &str,
    ) -> Result<MessageDto, SessionError> {
        self.core
            .post_text(&format!("message/{event_id}/create"), message)
            .await
    }
}
