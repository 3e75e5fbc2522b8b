//! Enquête - Investigation dashboard for a Prolog reasoning backend
//!
//! Enquête is the front end of a small criminal-investigation expert system.
//! A separate Prolog service decides who is guilty, an accomplice, a suspect
//! or innocent for each crime; this crate asks it over REST and turns the
//! answers into HTML fragments for the embedded web dashboard, or into
//! coloured text for the terminal.
//!
//! # Overview
//!
//! Every user action goes through the same pipeline: check that the backend
//! is reachable and that the selections are filled in, issue one `GET`,
//! decode the JSON reply into a typed view-model, and render it. Failures at
//! any step become a localized message plus a toast, never a panic.
//!
//! A background monitor polls the backend every few seconds and only speaks
//! up when the connection state actually changes.
//!
//! # Quick Start
//!
//! ```no_run
//! use enquete::{ConnectionState, Context, HttpBackend};
//! use enquete::view::{investigation, View};
//! use std::time::Duration;
//!
//! let backend = HttpBackend::new(
//!     "http://localhost:3000/api",
//!     Duration::from_secs(30),
//!     Duration::from_secs(5),
//! ).unwrap();
//! let connection = ConnectionState::new();
//! connection.set(true);
//!
//! match investigation::quick_test(&Context::new(&backend, &connection), "john", "vol") {
//!     Ok(view) => println!("{}", view),
//!     Err(failure) => eprintln!("{}", failure),
//! }
//! ```
//!
//! # Statuses
//!
//! | Code | Label | Severity |
//! |------|-------|----------|
//! | `coupable` | COUPABLE | highest |
//! | `complice` | COMPLICE | |
//! | `suspect` | SUSPECT | |
//! | `innocent` | INNOCENT | lowest, also the fallback for unknown codes |
//!
//! # Modules
//!
//! - [`backend`]: REST client and the [`Backend`] seam used by every renderer
//! - [`view`]: the renderers and their view-models
//! - [`connectivity`]: connection flag, status badge and the polling monitor
//! - [`dashboard`]: shared page state and action dispatch
//! - [`serve`]: the embedded HTTP dashboard
//! - [`status`], [`model`], [`text`]: domain types and display helpers
//! - [`toast`], [`animation`], [`tabs`]: presentation timing and navigation

pub mod animation;
pub mod backend;
pub mod config;
pub mod connectivity;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod serve;
pub mod status;
pub mod tabs;
pub mod text;
pub mod toast;
pub mod view;

pub use backend::{Backend, Endpoint, HttpBackend, Reply};
pub use config::Config;
pub use connectivity::{ConnectionState, ConnectivityMonitor, StatusIndicator};
pub use dashboard::{Action, Dashboard};
pub use error::{Error, Result};
pub use status::CaseStatus;
pub use toast::{Toast, ToastKind, ToastQueue};
pub use view::{Context, Failure, FailureKind, Rendered};
