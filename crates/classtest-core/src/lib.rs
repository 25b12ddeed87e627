//! classtest-core: submission store, test catalog, and session logic.
//!
//! This crate defines the data model, the persisted submission store, and the
//! session rules that the `classtest` CLI drives.

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod review;
pub mod schedule;
pub mod session;
pub mod statistics;
pub mod storage;
pub mod store;

pub use error::{SessionError, StoreError};
pub use model::{Question, Role, Submission, SubmissionStatus, TestVariant, User, PASS_THRESHOLD};
pub use store::SubmissionStore;
