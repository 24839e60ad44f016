//! Update-decision engine
//!
//! Decides whether a newer release exists, how strongly to prompt for it and
//! whether prompting is currently allowed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Source    │────▶│   Engine    │────▶│  Decision   │
//! │  (lookup)   │     │ (evaluate)  │     │  (prompt)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!          ┌─────────────────┼─────────────────┐
//!          ▼                 ▼                 ▼
//!   ┌─────────────┐   ┌─────────────┐   ┌─────────────┐
//!   │   Semver    │   │   Policy    │   │  Throttle   │
//!   │  (compare)  │   │ (strength)  │   │   + Skip    │
//!   └─────────────┘   └─────────────┘   └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`semver`]: Four-component versions and the comparison rule
//! - [`throttle`]: Frequency gating for lookups and prompts
//! - [`policy`]: Per-fragment alert strength and prompt frequency
//! - [`skip`]: The user's "skip this version" marker
//! - [`state`]: Persisted check state
//! - [`store`]: Key-value persistence (SQLite, in-memory)
//! - [`registry`]: Lookup source trait and endpoints
//! - [`registries`]: HTTP lookup source
//! - [`localize`]: Message keys and bundled translations
//! - [`decision`]: Decisions, prompts and user actions
//! - [`engine`]: The orchestrating state machine
//! - [`error`]: Error types

pub mod decision;
pub mod engine;
pub mod error;
pub mod localize;
pub mod policy;
pub mod registries;
pub mod registry;
pub mod semver;
pub mod skip;
pub mod state;
pub mod store;
pub mod throttle;
