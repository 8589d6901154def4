//! # docgit-core
//!
//! Core library for docgit - version history for word-processor documents,
//! layered over the `git` command line.
//!
//! The engine owns storage, diffing and merging. This crate sequences its
//! commands into document-centric operations (bootstrap, status, diff, log,
//! commit, restore, reset, revert), returns structured results, and keeps
//! the working directory consistent when a step in the middle fails.

pub mod bootstrap;
pub mod conflict;
pub mod dependencies;
pub mod discovery;
pub mod error;
pub mod inspect;
pub mod lock;
pub mod models;
pub mod mutate;
pub mod registry;
pub mod repository;
pub mod runner;
pub mod settings;

pub use dependencies::check_dependencies;
pub use discovery::discover_documents;
pub use error::{Error, Result};
pub use models::{
    BootstrapReport, ChangeKind, ChangeRecord, CommitOutcome, DependencyStatus, HistoryEntry,
    RevertOutcome,
};
pub use registry::ProjectRegistry;
pub use repository::Repository;
pub use settings::Settings;
