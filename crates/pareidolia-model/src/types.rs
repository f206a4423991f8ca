//! Request and response bodies for the Pareidolia API.
//!
//! These mirror the backend's DTOs field for field. Field names are
//! camelCase on the wire (`#[serde(rename_all = "camelCase")]`), snake_case
//! in Rust.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Account, Promoter, Role};

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

/// Credentials posted to the login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

/// Hand-written so passwords never end up in logs.
impl fmt::Debug for LoginDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginDto")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a sign-up, and of account creation by an administrator.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDto {
    pub email: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub phone: String,
}

impl fmt::Debug for RegistrationDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationDto")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("phone", &self.phone)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateDto {
    pub current_password: String,
    pub new_password: String,
}

impl fmt::Debug for PasswordUpdateDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordUpdateDto { .. }")
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Publication state of an event.
///
/// Events move `Draft → Review → Published`; administrators can move them
/// forward or backwards one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventState {
    #[default]
    Draft,
    Review,
    Published,
}

impl EventState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Review => "REVIEW",
            Self::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event as returned by the backend.
///
/// `date` and `time` are kept in the backend's text form
/// (`yyyy-MM-dd`, `HH:mm`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    /// Duration in minutes.
    #[serde(default)]
    pub duration: i32,
    #[serde(default)]
    pub max_number_of_participants: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_participants: Option<i32>,
    /// Average review score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Whether the current consumer has booked it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booked: Option<bool>,
    #[serde(default)]
    pub promoters: Vec<Promoter>,
    #[serde(default)]
    pub state: EventState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
}

/// Body for creating or updating an event. Promoters are referenced by
/// email instead of being embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdateDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub place: String,
    pub date: String,
    pub time: String,
    pub duration: i32,
    pub max_number_of_participants: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_participants: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default)]
    pub promoter_emails: Vec<String>,
    pub state: EventState,
}

// ---------------------------------------------------------------------------
// Bookings, reviews, messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: i64,
    pub event: EventDto,
    pub consumer: Account,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    /// 1 to 5.
    pub score: i32,
    pub id_event: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_consumer: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_anonymous: Option<bool>,
}

/// A message on an event's board. Only promoters and admins write them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: i64,
    pub id_event: i64,
    pub id_account: i64,
    pub message: String,
    #[serde(default)]
    pub account_name: String,
    pub account_reference_type: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// One page of a paginated listing, in the backend's page format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    /// Zero-based index of this page.
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

impl<T> Page<T> {
    /// Returns `true` if there is a page after this one.
    pub fn has_next(&self) -> bool {
        self.number.saturating_add(1) < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Which page to ask for. Rendered as `page` and `size` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// The first page with `size` items.
    pub fn first(size: u32) -> Self {
        Self { page: 0, size }
    }

    /// The page after this one, same size. Stays put at `u32::MAX`.
    pub fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
        }
    }

    /// Query parameters in the order the backend documents them.
    pub fn to_query(self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ]
    }
}

// ---------------------------------------------------------------------------
// ErrorResponse
// ---------------------------------------------------------------------------

/// The normalized error payload.
///
/// Every failed call returns one of these, whatever the endpoint. The
/// backend sends it as the body of error responses; when a body isn't in
/// this shape, the gateway synthesizes one from the status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
}

impl ErrorResponse {
    /// Builds a payload without a server timestamp.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            timestamp: None,
            status: Some(status),
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}
