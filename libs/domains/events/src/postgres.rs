use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use crate::{
    entity,
    error::{EventError, EventResult},
    models::{Event, Page, PageRequest},
    repository::EventRepository,
};

/// PostgreSQL-backed [`EventRepository`].
#[derive(Clone)]
pub struct PgEventRepository {
    db: DatabaseConnection,
}

impl PgEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn live() -> sea_orm::Select<entity::Entity> {
        entity::Entity::find().filter(entity::Column::Deleted.eq(false))
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn save(&self, event: Event) -> EventResult<Event> {
        let model = match event.id() {
            None => {
                let model = entity::insert_model(&event).insert(&self.db).await?;
                tracing::info!(event_id = model.id, "Created event");
                model
            }
            Some(id) => {
                let model = entity::update_model(&event)
                    .update(&self.db)
                    .await
                    .map_err(|e| match e {
                        DbErr::RecordNotUpdated => EventError::NotFound(id),
                        other => other.into(),
                    })?;
                tracing::info!(event_id = id, deleted = model.deleted, "Updated event");
                model
            }
        };

        Event::try_from(model)
    }

    async fn find_by_id(&self, id: i64) -> EventResult<Option<Event>> {
        Self::live()
            .filter(entity::Column::Id.eq(id))
            .one(&self.db)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn find_by_id_including_deleted(&self, id: i64) -> EventResult<Option<Event>> {
        entity::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn find_all(&self, request: PageRequest) -> EventResult<Page<Event>> {
        let request = request.normalized();
        let paginator = Self::live()
            .order_by_asc(entity::Column::Id)
            .paginate(&self.db, request.size);

        let total = paginator.num_items().await?;
        if request.offset() >= total {
            return Ok(Page::new(Vec::new(), request, total));
        }
        let models = paginator.fetch_page(request.page).await?;

        let content = models
            .into_iter()
            .map(Event::try_from)
            .collect::<EventResult<Vec<_>>>()?;

        Ok(Page::new(content, request, total))
    }

    async fn exists_by_id(&self, id: i64) -> EventResult<bool> {
        let count = Self::live()
            .filter(entity::Column::Id.eq(id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
