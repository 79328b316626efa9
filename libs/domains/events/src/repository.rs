use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{EventError, EventResult};
use crate::models::{Event, Page, PageRequest};

/// Persistence port for events.
///
/// Lookups without a suffix only see live (not soft-deleted) records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Inserts when `event` has no id, otherwise overwrites the stored row.
    async fn save(&self, event: Event) -> EventResult<Event>;

    async fn find_by_id(&self, id: i64) -> EventResult<Option<Event>>;

    /// Like [`find_by_id`](Self::find_by_id) but also returns soft-deleted events.
    async fn find_by_id_including_deleted(&self, id: i64) -> EventResult<Option<Event>>;

    /// One page of live events ordered by ascending id.
    async fn find_all(&self, request: PageRequest) -> EventResult<Page<Event>>;

    async fn exists_by_id(&self, id: i64) -> EventResult<bool>;
}

/// In-memory implementation of EventRepository (for development/testing)
#[derive(Debug, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<BTreeMap<i64, Event>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for InMemoryEventRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn save(&self, event: Event) -> EventResult<Event> {
        let mut events = self.events.write().await;

        match event.id() {
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let event = event.with_id(id);
                events.insert(id, event.clone());

                tracing::info!(event_id = id, "Created event");
                Ok(event)
            }
            Some(id) => {
                let slot = events.get_mut(&id).ok_or(EventError::NotFound(id))?;
                *slot = event.clone();

                tracing::info!(event_id = id, deleted = event.is_deleted(), "Updated event");
                Ok(event)
            }
        }
    }

    async fn find_by_id(&self, id: i64) -> EventResult<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.get(&id).filter(|e| !e.is_deleted()).cloned())
    }

    async fn find_by_id_including_deleted(&self, id: i64) -> EventResult<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.get(&id).cloned())
    }

    async fn find_all(&self, request: PageRequest) -> EventResult<Page<Event>> {
        let request = request.normalized();
        let events = self.events.read().await;

        let live: Vec<&Event> = events.values().filter(|e| !e.is_deleted()).collect();
        let total = live.len() as u64;

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content = live
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, request, total))
    }

    async fn exists_by_id(&self, id: i64) -> EventResult<bool> {
        let events = self.events.read().await;
        Ok(events.get(&id).is_some_and(|e| !e.is_deleted()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventDetails;
    use chrono::{Duration, Utc};

    fn new_event(title: &str) -> Event {
        Event::create(EventDetails {
            title: title.to_string(),
            description: None,
            event_at: Some(Utc::now() + Duration::days(1)),
            location: Some("Room 1".to_string()),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_assigns_increasing_ids() {
        let repo = InMemoryEventRepository::new();

        let first = repo.save(new_event("First")).await.unwrap();
        let second = repo.save(new_event("Second")).await.unwrap();

        assert_eq!(first.id(), Some(1));
        assert_eq!(second.id(), Some(2));
    }

    #[tokio::test]
    async fn test_soft_deleted_events_are_hidden() {
        let repo = InMemoryEventRepository::new();
        let mut event = repo.save(new_event("Workshop")).await.unwrap();
        let id = event.id().unwrap();

        event.mark_as_deleted();
        repo.save(event).await.unwrap();

        assert!(repo.find_by_id(id).await.unwrap().is_none());
        assert!(!repo.exists_by_id(id).await.unwrap());

        let stored = repo.find_by_id_including_deleted(id).await.unwrap().unwrap();
        assert!(stored.is_deleted());
    }

    #[tokio::test]
    async fn test_save_with_unknown_id_fails() {
        let repo = InMemoryEventRepository::new();
        let other = InMemoryEventRepository::new();
        let event = other.save(new_event("Elsewhere")).await.unwrap();

        let result = repo.save(event).await;
        assert!(matches!(result, Err(EventError::NotFound(1))));
    }

    #[tokio::test]
    async fn test_find_all_pages_live_events_in_id_order() {
        let repo = InMemoryEventRepository::new();
        for i in 0..5 {
            repo.save(new_event(&format!("Event {i}"))).await.unwrap();
        }
        let mut second = repo.find_by_id(2).await.unwrap().unwrap();
        second.mark_as_deleted();
        repo.save(second).await.unwrap();

        let page = repo.find_all(PageRequest::new(0, 3)).await.unwrap();
        let ids: Vec<i64> = page.content.iter().filter_map(Event::id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(page.total_elements, 4);

        let page = repo.find_all(PageRequest::new(1, 3)).await.unwrap();
        let ids: Vec<i64> = page.content.iter().filter_map(Event::id).collect();
        assert_eq!(ids, vec![5]);

        let page = repo.find_all(PageRequest::new(9, 3)).await.unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 4);
    }
}
