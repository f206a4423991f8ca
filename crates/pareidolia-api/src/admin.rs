//! Calls available to a logged-in administrator.
//!
//! Administrators manage every account and every event, so this is the
//! largest surface. Grouped by resource below.

use pareidolia_model::{
    Account, AccountLogin, BookingDto, EventDto, EventState, EventUpdateDto, MessageDto, Page,
    PageRequest, PasswordUpdateDto, Promoter, RegistrationDto, ReviewDto, Role,
};
use pareidolia_session::{SessionError, SessionStore};
use pareidolia_transport::HttpTransport;

use crate::scoped::{ImageFile, Scope, ScopedClient, page_or};

/// Client for `{api}/admin`.
#[derive(Debug)]
pub struct AdminClient<T> {
    core: ScopedClient<T>,
}

impl<T> Clone for AdminClient<T> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<T: HttpTransport> AdminClient<T> {
    pub fn new(store: SessionStore<T>) -> Self {
        Self {
            core: ScopedClient::new(store, Scope::Role(Role::Admin)),
        }
    }

    // -- Own account and administrators -----------------------------------

    pub async fn update(&self, account: &Account) -> Result<AccountLogin, SessionError> {
        self.core.post("update", account).await
    }

    pub async fn update_password(
        &self,
        passwords: &PasswordUpdateDto,
    ) -> Result<AccountLogin, SessionError> {
        self.core.post("update/password", passwords).await
    }

    pub async fn account(&self, id: i64) -> Result<Account, SessionError> {
        self.core.get(&format!("data/{id}")).await
    }

    pub async fn admins(&self, page: Option<PageRequest>) -> Result<Page<Account>, SessionError> {
        self.core.get_page("list", page_or(page, 20), &[]).await
    }

    /// Creates an account of any role.
    pub async fn create_account(
        &self,
        registration: &RegistrationDto,
        role: Role,
    ) -> Result<Account, SessionError> {
        self.core
            .post(&format!("create/{}", role.as_str()), registration)
            .await
    }

    pub async fn delete_account(&self, id: i64) -> Result<(), SessionError> {
        self.core.delete(&id.to_string()).await
    }

    // -- Consumers --------------------------------------------------------

    pub async fn consumers(&self, page: Option<PageRequest>) -> Result<Page<Account>, SessionError> {
        self.core
            .get_page("consumer/list", page_or(page, 20), &[])
            .await
    }

    pub async fn consumer(&self, id: i64) -> Result<Account, SessionError> {
        self.core.get(&format!("consumer/{id}/data")).await
    }

    pub async fn update_consumer(&self, consumer: &Account) -> Result<Account, SessionError> {
        self.core.post("consumer/update", consumer).await
    }

    pub async fn delete_consumer(&self, id: i64) -> Result<(), SessionError> {
        self.core.delete(&format!("consumer/{id}")).await
    }

    // -- Promoters --------------------------------------------------------

    pub async fn create_promoter(
        &self,
        registration: &RegistrationDto,
    ) -> Result<Promoter, SessionError> {
        self.core.post("promoter/create", registration).await
    }

    pub async fn update_promoter(&self, promoter: &Promoter) -> Result<Promoter, SessionError> {
        self.core.post("promoter/update", promoter).await
    }

    pub async fn delete_promoter(&self, id: i64) -> Result<(), SessionError> {
        self.core.delete(&format!("promoter/{id}")).await
    }

    pub async fn update_promoter_image(
        &self,
        promoter_id: i64,
        image: ImageFile,
    ) -> Result<Promoter, SessionError> {
        self.core
            .upload(&format!("promoter/{promoter_id}/image"), image)
            .await
    }

    pub async fn delete_promoter_image(&self, promoter_id: i64) -> Result<Promoter, SessionError> {
        self.core
            .delete_returning(&format!("promoter/{promoter_id}/image"))
            .await
    }

    // -- Events -----------------------------------------------------------

    pub async fn event(&self, id: i64) -> Result<EventDto, SessionError> {
        self.core.get(&format!("event/{id}")).await
    }

    /// All events, optionally filtered by state. 20 per page by default.
    pub async fn events(
        &self,
        page: Option<PageRequest>,
        state: Option<EventState>,
    ) -> Result<Page<EventDto>, SessionError> {
        let filter: Vec<(&str, &str)> = state.map(|s| ("state", s.as_str())).into_iter().collect();
        self.core
            .get_page("event/list", page_or(page, 20), &filter)
            .await
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

    pub async fn create_event(&self, event: &EventUpdateDto) -> Result<EventDto, SessionError> {
        self.core.post("event/create", event).await
    }

    pub async fn update_event(&self, event: &EventUpdateDto) -> Result<EventDto, SessionError> {
        self.core.post("event/update", event).await
    }

    pub async fn delete_event(&self, id: i64) -> Result<(), SessionError> {
        self.core.delete(&format!("event/{id}")).await
    }

    /// Moves an event one state back (`Published → Review → Draft`).
    pub async fn move_backwards(&self, event_id: i64) -> Result<EventDto, SessionError> {
        self.core
            .post_action(&format!("event/{event_id}/backwards"))
            .await
    }

    /// Moves an event one state forward (`Draft → Review → Published`).
    pub async fn move_forward(&self, event_id: i64) -> Result<EventDto, SessionError> {
        self.core
            .post_action(&format!("event/{event_id}/forward"))
            .await
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

    // -- Reviews and messages ---------------------------------------------

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

    pub async fn messages(
        &self,
        event_id: i64,
        page: Option<PageRequest>,
    ) -> Result<Page<MessageDto>, SessionError> {
        self.core
            .get_page(&format!("message/{event_id}/list"), page_or(page, 20), &[])
            .await
    }

    pub async fn create_message(
        &self,
        event_id: i64,
        message: &str,
    ) -> Result<MessageDto, SessionError> {
        self.core
            .post_text(&format!("message/{event_id}/create"), message)
            .await
    }

    pub async fn delete_message(&self, id: i64) -> Result<(), SessionError> {
        self.core.delete(&format!("message/{id}")).await
    }

    // -- Bookings ---------------------------------------------------------

    pub async fn booking(&self, id: i64) -> Result<BookingDto, SessionError> {
        self.core.get(&format!("booking/{id}")).await
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

    pub async fn delete_booking(&self, id: i64) -> Result<(), SessionError> {
        self.core.delete(&format!("booking/{id}")).await
    }
}
