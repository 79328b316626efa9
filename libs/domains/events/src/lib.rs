//! Events Domain
//!
//! Scheduling, editing and soft-deleting events.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, request validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Use cases: create, get, list, update, delete, restore
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Store port (in-memory + PostgreSQL)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Event entity and its rules, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_events::{handlers, InMemoryEventRepository, EventService};
//!
//! let service = EventService::new(InMemoryEventRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{EventError, EventResult};
pub use handlers::ApiDoc;
pub use models::{
    Event, EventDetails, EventPage, EventRequest, EventResponse, Page, PageRequest,
};
pub use postgres::PgEventRepository;
pub use repository::{EventRepository, InMemoryEventRepository};
pub use service::EventService;
