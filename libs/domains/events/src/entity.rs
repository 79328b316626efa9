use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::error::{EventError, EventResult};
use crate::models::Event;

/// Row of the `events` table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_at: DateTimeWithTimeZone,
    pub location: Option<String>,
    pub deleted: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub const TAG: &'static str = "events";
}

impl TryFrom<Model> for Event {
    type Error = EventError;

    fn try_from(model: Model) -> EventResult<Self> {
        let id = model.id;
        Event::reconstruct(
            model.id,
            model.title,
            model.description,
            model.event_at.into(),
            model.location,
            model.deleted,
            model.created_at.into(),
            model.updated_at.into(),
        )
        .map_err(|e| match e {
            EventError::InvalidArgument(reason) => {
                EventError::Internal(format!("Stored event {id} is invalid: {reason}"))
            }
            other => other,
        })
    }
}

/// Every column for an insert; the id comes from the sequence.
pub(crate) fn insert_model(event: &Event) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        created_at: Set(event.created_at().into()),
        ..update_model(event)
    }
}

/// Every column except `created_at`, keyed by the event's id.
pub(crate) fn update_model(event: &Event) -> ActiveModel {
    ActiveModel {
        id: event.id().map_or(NotSet, Set),
        title: Set(event.title().to_string()),
        description: Set(event.description().map(str::to_string)),
        event_at: Set(event.event_at().into()),
        location: Set(event.location().map(str::to_string)),
        deleted: Set(event.is_deleted()),
        created_at: NotSet,
        updated_at: Set(event.updated_at().into()),
    }
}
