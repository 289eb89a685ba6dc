//! # Blogdesk Architecture
//!
//! Blogdesk is an editing client for a blog whose posts live behind a GraphQL
//! Post Store. The interesting part is not the CLI but the attachment
//! bookkeeping: an edit session mixes images already on the server with
//! files picked locally, and on submit it has to tell the server exactly
//! which stored paths to keep, which to drop and which new files to upload.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs + main.rs)                              │
//! │  - Parses arguments, prints results, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Parses selectors, supplies config and token              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One file per operation, returns CmdResult                │
//! │  - Edit flows go through session.rs                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session + Attachments (session.rs, attachments/)           │
//! │  - AttachmentSet: seed / add / remove / diff                │
//! │  - Preview handle lifetime (PreviewRegistry)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - PostStore trait                                          │
//! │  - GraphqlStore (production), InMemoryStore (testing)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout or stderr and nothing calls
//! `std::process::exit`. Diagnostics go through `tracing`; the binary decides
//! where they end up.
//!
//! ## Testing
//!
//! Commands, the session and the attachment set are tested against
//! [`store::memory::InMemoryStore`] and its unit-test fixtures; integration
//! tests in `tests/` seed an `InMemoryStore` through its public API. The
//! GraphQL store is tested at the request/response level without a server.

pub mod api;
pub mod attachments;
pub mod auth;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod index;
pub mod model;
pub mod preview;
pub mod session;
pub mod store;
pub mod tags;
