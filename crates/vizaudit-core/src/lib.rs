//! Core metadata types for vizaudit.
//!
//! This crate models the subset of the GoodData metadata API that the audit
//! reads: projects, object-index entries, visualization objects and the
//! display form / attribute pair behind every visualization attribute. All
//! types deserialize directly from the platform's JSON documents.

pub mod attribute;
pub mod project;
pub mod visualization;

mod tagged;

pub use attribute::{Attribute, AttributeDisplayForm, DAY_DATE_TYPE};
pub use project::{Entry, Project};
pub use visualization::{
    Bucket, BucketItem, Filter, Measure, MeasureDefinition, ObjQualifier, UriRef,
    VisualizationAttribute, VisualizationObject,
};
