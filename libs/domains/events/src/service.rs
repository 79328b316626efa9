use observability::{EventMetrics, EventOperation, EventTimer};
use std::sync::Arc;

use crate::error::{EventError, EventResult};
use crate::models::{Event, EventDetails, EventPage, EventResponse, PageRequest};
use crate::repository::EventRepository;

/// Event use cases over an [`EventRepository`].
#[derive(Clone)]
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn create_event(&self, details: EventDetails) -> EventResult<EventResponse> {
        let _timer = EventTimer::start(EventOperation::Create);
        let result = async {
            let event = Event::create(details)?;
            let saved = self.repository.save(event).await?;
            EventResponse::try_from(saved)
        }
        .await;

        observe(EventOperation::Create, result)
    }

    /// Live events only.
    pub async fn get_event(&self, id: i64) -> EventResult<EventResponse> {
        let _timer = EventTimer::start(EventOperation::Get);
        let result = async {
            let event = self.live_event(id).await?;
            EventResponse::try_from(event)
        }
        .await;

        observe(EventOperation::Get, result)
    }

    pub async fn list_events(&self, request: PageRequest) -> EventResult<EventPage> {
        let _timer = EventTimer::start(EventOperation::List);
        let result = async {
            let page = self
                .repository
                .find_all(request.normalized())
                .await?
                .try_map(EventResponse::try_from)?;

            tracing::debug!(
                returned = page.content.len(),
                total = page.total_elements,
                "Listed events"
            );
            Ok::<_, EventError>(EventPage::from(page))
        }
        .await;

        observe(EventOperation::List, result)
    }

    /// Soft-deleted events can be updated too; their deleted flag is kept.
    pub async fn update_event(&self, id: i64, details: EventDetails) -> EventResult<EventResponse> {
        let _timer = EventTimer::start(EventOperation::Update);
        let result = async {
            let mut event = self
                .repository
                .find_by_id_including_deleted(id)
                .await?
                .ok_or(EventError::NotFound(id))?;

            event.update(details)?;
            let saved = self.repository.save(event).await?;
            EventResponse::try_from(saved)
        }
        .await;

        observe(EventOperation::Update, result)
    }

    pub async fn delete_event(&self, id: i64) -> EventResult<()> {
        let _timer = EventTimer::start(EventOperation::Delete);
        let result = async {
            let mut event = self.live_event(id).await?;
            event.mark_as_deleted();
            self.repository.save(event).await?;
            Ok::<(), EventError>(())
        }
        .await;

        observe(EventOperation::Delete, result)
    }

    /// Clears the deleted flag. Restoring a live event is a no-op apart from `updated_at`.
    pub async fn restore_event(&self, id: i64) -> EventResult<EventResponse> {
        let _timer = EventTimer::start(EventOperation::Restore);
        let result = async {
            let mut event = self
                .repository
                .find_by_id_including_deleted(id)
                .await?
                .ok_or(EventError::NotFound(id))?;

            event.restore();
            let saved = self.repository.save(event).await?;
            EventResponse::try_from(saved)
        }
        .await;

        observe(EventOperation::Restore, result)
    }

    async fn live_event(&self, id: i64) -> EventResult<Event> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(EventError::NotFound(id))
    }
}

fn observe<T>(operation: EventOperation, result: EventResult<T>) -> EventResult<T> {
    match &result {
        Ok(_) => EventMetrics::record_operation(operation),
        Err(EventError::NotFound(_)) => EventMetrics::record_failure(operation, "not_found"),
        Err(EventError::InvalidArgument(_)) => EventMetrics::record_failure(operation, "invalid"),
        Err(EventError::Internal(_)) => EventMetrics::record_failure(operation, "internal"),
    }
    result
}
