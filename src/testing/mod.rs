//! Testing utilities for subsync.
//!
//! Provides Alba-style HTTP endpoint testing without running a server.
//!
//! # Example
//!
//! ```rust,ignore
//! use subsync::testing;
//!
//! #[tokio::test]
//! async fn test_health() {
//!     let app = build_app();
//!
//!     testing::get(app, "/health")
//!         .execute()
//!         .await
//!         .assert_ok();
//! }
//! ```

mod scenario;

pub use scenario::{Scenario, ScenarioAssert, get, post};
