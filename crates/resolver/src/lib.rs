//! # Rescope Resolver
//!
//! Reverse-dependency resolution over a component-catalog manifest graph:
//! given the files a change touched, decide which projects must be rebuilt
//! and which modules must be retested.
//!
//! ## Pipeline
//!
//! ```text
//! change list
//!     │
//!     ├──> Classifier (trigger / directory / manifest / ordinary)
//!     │
//!     ├──> OwnerFinder (build-item match, directory fallback, origin-file)
//!     │      └─ unknown owner -> rebuild all
//!     │
//!     ├──> Resolver (reverse `require` walk, memoized, cycle-guarded)
//!     │      └─ DeviceFilter (drop hardware-incompatible projects)
//!     │
//!     └──> Engine (decision reduction: Nothing / All / Subset)
//! ```
//!
//! The engine is conservative by construction: any file whose impact the
//! graph cannot bound collapses the run to a full rebuild.

mod classify;
mod config;
mod decision;
mod device;
mod engine;
mod error;
mod owners;
mod resolve;

pub use classify::{normalize_lexical, ChangeKind, Classifier};
pub use config::{EngineConfig, DEFAULT_MANIFEST_NAME, DEFAULT_MODULE_KINDS};
pub use decision::{RebuildDecision, Resolution, RunSummary};
pub use device::DeviceFilter;
pub use engine::Engine;
pub use error::{ResolveError, Result};
pub use owners::OwnerFinder;
pub use resolve::{strip_selector, Resolver};
