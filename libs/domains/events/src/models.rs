use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::error::{EventError, EventResult};

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 1000;
pub const LOCATION_MAX_LEN: usize = 200;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 2000;

/// The four user-editable fields of an event, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDetails {
    pub title: String,
    pub description: Option<String>,
    pub event_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

/// Event entity.
///
/// Fields are private: every change goes through [`Event::update`],
/// [`Event::mark_as_deleted`] or [`Event::restore`], which keep the title
/// non-empty and trimmed and refresh `updated_at`.
#[derive(Debug, Clone)]
pub struct Event {
    id: Option<i64>,
    title: String,
    description: Option<String>,
    event_at: DateTime<Utc>,
    location: Option<String>,
    deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Normalized field values that passed every check.
struct ValidFields {
    title: String,
    description: Option<String>,
    event_at: DateTime<Utc>,
    location: Option<String>,
}

impl ValidFields {
    fn check(details: EventDetails, reject_past: bool) -> EventResult<Self> {
        let title = details.title.trim();
        if title.is_empty() {
            return Err(EventError::InvalidArgument(
                "Title must not be null or empty".to_string(),
            ));
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(EventError::InvalidArgument(format!(
                "Title must not exceed {TITLE_MAX_LEN} characters"
            )));
        }

        let description = normalize_optional(details.description);
        if exceeds(&description, DESCRIPTION_MAX_LEN) {
            return Err(EventError::InvalidArgument(format!(
                "Description must not exceed {DESCRIPTION_MAX_LEN} characters"
            )));
        }

        let event_at = details.event_at.ok_or_else(|| {
            EventError::InvalidArgument("EventAt must not be null".to_string())
        })?;
        if reject_past && event_at < Utc::now() {
            return Err(EventError::InvalidArgument(
                "EventAt must not be in the past".to_string(),
            ));
        }

        let location = normalize_optional(details.location);
        if exceeds(&location, LOCATION_MAX_LEN) {
            return Err(EventError::InvalidArgument(format!(
                "Location must not exceed {LOCATION_MAX_LEN} characters"
            )));
        }

        Ok(Self {
            title: title.to_string(),
            description,
            event_at,
            location,
        })
    }
}

/// Trims, and maps empty to `None`.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn exceeds(value: &Option<String>, max: usize) -> bool {
    value.as_ref().is_some_and(|v| v.chars().count() > max)
}

impl Event {
    /// Builds a new, unpersisted event scheduled now or later.
    pub fn create(details: EventDetails) -> EventResult<Self> {
        let fields = ValidFields::check(details, true)?;
        let now = Utc::now();

        Ok(Self {
            id: None,
            title: fields.title,
            description: fields.description,
            event_at: fields.event_at,
            location: fields.location,
            deleted: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrates a stored event. Past `event_at` values are accepted.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: i64,
        title: String,
        description: Option<String>,
        event_at: DateTime<Utc>,
        location: Option<String>,
        deleted: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> EventResult<Self> {
        let fields = ValidFields::check(
            EventDetails {
                title,
                description,
                event_at: Some(event_at),
                location,
            },
            false,
        )?;

        Ok(Self {
            id: Some(id),
            title: fields.title,
            description: fields.description,
            event_at: fields.event_at,
            location: fields.location,
            deleted,
            created_at,
            updated_at,
        })
    }

    /// Replaces all four editable fields, or none of them on error.
    pub fn update(&mut self, details: EventDetails) -> EventResult<()> {
        let fields = ValidFields::check(details, true)?;

        self.title = fields.title;
        self.description = fields.description;
        self.event_at = fields.event_at;
        self.location = fields.location;
        self.touch();
        Ok(())
    }

    pub fn mark_as_deleted(&mut self) {
        self.deleted = true;
        self.touch();
    }

    pub fn restore(&mut self) {
        self.deleted = false;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Called by a store when it assigns the identifier on first save.
    pub(crate) fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn event_at(&self) -> DateTime<Utc> {
        self.event_at
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Identity equality: only persisted events with the same id are equal.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

fn not_in_past(value: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *value < Utc::now() {
        return Err(ValidationError::new("future_or_present"));
    }
    Ok(())
}

/// Body of `POST /events` and `PUT /events/{id}`
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[validate(
        required(message = "Title is required"),
        length(max = 100, message = "Title must not exceed 100 characters"),
        custom(function = "not_blank", message = "Title is required")
    )]
    #[schema(example = "Rust Workshop", max_length = 100)]
    pub title: Option<String>,

    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    #[schema(max_length = 1000)]
    pub description: Option<String>,

    #[validate(
        required(message = "EventAt is required"),
        custom(function = "not_in_past", message = "EventAt must be now or in the future")
    )]
    pub event_at: Option<DateTime<Utc>>,

    #[validate(
        required(message = "Location is required"),
        length(max = 200, message = "Location must not exceed 200 characters"),
        custom(function = "not_blank", message = "Location is required")
    )]
    #[schema(example = "Room 1", max_length = 200)]
    pub location: Option<String>,
}

impl From<EventRequest> for EventDetails {
    fn from(request: EventRequest) -> Self {
        Self {
            title: request.title.unwrap_or_default(),
            description: request.description,
            event_at: request.event_at,
            location: request.location,
        }
    }
}

/// Event as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_at: DateTime<Utc>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<Event> for EventResponse {
    type Error = EventError;

    fn try_from(event: Event) -> EventResult<Self> {
        let id = event
            .id
            .ok_or_else(|| EventError::Internal("Event has not been persisted".to_string()))?;

        Ok(Self {
            id,
            title: event.title,
            description: event.description,
            event_at: event.event_at,
            location: event.location,
            created_at: event.created_at,
        })
    }
}

/// `page` / `size` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Zero-based page index
    #[serde(default)]
    #[param(default = 0, minimum = 0)]
    pub page: u64,
    /// Page size; 0 means the default, values above 2000 are capped
    #[serde(default = "default_page_size")]
    #[param(default = 20, minimum = 0, maximum = 2000)]
    pub size: u64,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self { page, size }.normalized()
    }

    pub fn normalized(self) -> Self {
        let size = match self.size {
            0 => DEFAULT_PAGE_SIZE,
            s => s.min(MAX_PAGE_SIZE),
        };
        Self {
            page: self.page,
            size,
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the totals needed to navigate.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u64,
    pub size: u64,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            number: request.page,
            size: request.size,
            total_elements,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(self.size)
    }

    /// Converts every item, failing on the first error.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            content: self.content.into_iter().map(f).collect::<Result<_, E>>()?,
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        })
    }
}

/// Response of `GET /events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    pub content: Vec<EventResponse>,
    pub number: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number_of_elements: u64,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl From<Page<EventResponse>> for EventPage {
    fn from(page: Page<EventResponse>) -> Self {
        let total_pages = page.total_pages();
        let number_of_elements = page.content.len() as u64;

        Self {
            number: page.number,
            size: page.size,
            total_elements: page.total_elements,
            total_pages,
            number_of_elements,
            first: page.number == 0,
            last: page.number.saturating_add(1) >= total_pages,
            empty: page.content.is_empty(),
            content: page.content,
        }
    }
}
