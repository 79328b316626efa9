//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL container with the workspace migrations applied (feature: "postgres")
//! - `TestDataBuilder`: deterministic event data per test
//! - `assertions`: assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let title = builder.title("main");
//!     let when = builder.event_at(3);
//! }
//! ```

use chrono::{DateTime, Duration, Utc};

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Deterministic test data derived from a seed.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seeds from a hash of the test name, so reruns produce the same data.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_event");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A title unique to this builder, well under the 100 character limit.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let title = TestDataBuilder::new(7).title("main");
    /// assert_eq!(title, "test-event-7-main");
    /// ```
    pub fn title(&self, suffix: &str) -> String {
        format!("test-event-{}-{}", self.seed, suffix)
    }

    pub fn location(&self) -> String {
        format!("Room {}", self.seed % 100)
    }

    /// `days` days from now, truncated to whole seconds.
    pub fn event_at(&self, days: i64) -> DateTime<Utc> {
        let at = Utc::now() + Duration::days(days);
        DateTime::from_timestamp(at.timestamp(), 0).unwrap_or(at)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a store-assigned id is positive
    pub fn assert_positive_id(id: i64, context: &str) {
        assert!(id > 0, "{}: expected a positive id, got {}", context, id);
    }
}
