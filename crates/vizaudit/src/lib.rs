//! vizaudit - find GoodData visualizations that compare a static date range
//! against its previous period.
//!
//! The audit walks every visualization object of every given project and
//! reports the ones that combine three things:
//!
//! 1. an absolute (fixed calendar range) date filter,
//! 2. a measure comparing against the previous period,
//! 3. slicing by an attribute other than the per-day date attribute.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vizaudit::{Credentials, GoodDataClient, NoopObserver, audit_and_logout, config::AppConfig};
//!
//! let config = AppConfig::default();
//! let mut client = GoodDataClient::new(&config, Credentials::new("user@example.com", "secret"))
//!     .expect("Failed to create client");
//!
//! let mut output = Vec::new();
//! let report = audit_and_logout(
//!     &mut client,
//!     &["PROJ1".to_string()],
//!     &mut output,
//!     &mut NoopObserver,
//! )
//! .expect("Audit failed");
//!
//! println!("{} matching objects", report.objects_matched);
//! ```

pub mod cache;
pub mod config;
pub mod memory;
pub mod predicate;

mod client;
mod error;
mod scan;
mod service;

pub use vizaudit_core as model;

pub use client::{Credentials, GoodDataClient};
pub use error::AuditError;
pub use memory::InMemoryService;
pub use scan::{
    AuditReport, NoopObserver, ProjectReport, ScanObserver, Scanner, audit_and_logout,
    audit_projects, parse_project_ids, percent_done, with_logout,
};
pub use service::MetadataService;
