//! Common test infrastructure
//!
//! End-to-end tests run the real HTTP client against a local scripted
//! catalog and store into a temporary SQLite file.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{install_listening_history, TestCatalog, TestLibrary};
//!
//! #[tokio::test]
//! async fn test_run() {
//!     let catalog = TestCatalog::spawn().await;
//!     install_listening_history(&catalog);
//!     let library = TestLibrary::new();
//!     let summary = library.orchestrator(&catalog).run(library.user).await.unwrap();
//! }
//! ```

mod catalog;
mod constants;
mod fixtures;
mod library;

// Public API - this is what tests import
pub use catalog::TestCatalog;
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{install_listening_history, page, playlist, saved_item, track};
pub use library::TestLibrary;
