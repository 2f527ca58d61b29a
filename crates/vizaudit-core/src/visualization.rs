//! Visualization objects.
//!
//! A visualization object (`visualizationObject`) is a saved chart
//! definition. Its content is organized into buckets holding measures and
//! attributes, plus a list of filters:
//!
//! ```json
//! {
//!   "visualizationObject": {
//!     "content": {
//!       "visualizationClass": { "uri": "/gdc/md/P/obj/7" },
//!       "buckets": [
//!         { "localIdentifier": "measures", "items": [ { "measure": { ... } } ] },
//!         { "localIdentifier": "view", "items": [ { "visualizationAttribute": { ... } } ] }
//!       ],
//!       "filters": [ { "absoluteDateFilter": { ... } } ]
//!     },
//!     "meta": { "uri": "/gdc/md/P/obj/42", "title": "Revenue" }
//!   }
//! }
//! ```
//!
//! Filters, measure definitions and bucket items are externally tagged sum
//! types. Tags this crate does not model decode into an `Other` variant that
//! keeps the tag name.

use serde::{Deserialize, Deserializer};

use crate::{attribute::ObjectMeta, tagged};

/// A reference to a metadata object by URI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UriRef {
    pub uri: String,
}

impl UriRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// A reference to a metadata object by URI or by identifier.
///
/// Encoded as `{"uri": "/gdc/md/P/obj/1"}` or `{"identifier": "fact.amount"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjQualifier {
    Uri(String),
    Identifier(String),
}

impl ObjQualifier {
    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }

    pub fn identifier(identifier: impl Into<String>) -> Self {
        Self::Identifier(identifier.into())
    }

    /// Returns the URI, if the reference is URI-qualified.
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Self::Uri(uri) => Some(uri),
            Self::Identifier(_) => None,
        }
    }
}

/// A saved visualization (chart, table, headline, ...).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VisualizationObject {
    content: VisualizationContent,

    #[serde(default)]
    meta: ObjectMeta,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VisualizationContent {
    #[serde(default)]
    visualization_class: Option<ObjQualifier>,

    #[serde(default)]
    buckets: Vec<Bucket>,

    #[serde(default)]
    filters: Vec<Filter>,
}

impl VisualizationObject {
    /// Creates an empty visualization object stored at `uri`.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            content: VisualizationContent {
                visualization_class: None,
                buckets: Vec::new(),
                filters: Vec::new(),
            },
            meta: ObjectMeta {
                uri: Some(uri.into()),
                title: None,
            },
        }
    }

    /// Adds a bucket, returning the updated object.
    pub fn with_bucket(mut self, bucket: Bucket) -> Self {
        self.content.buckets.push(bucket);
        self
    }

    /// Adds a filter, returning the updated object.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.content.filters.push(filter);
        self
    }

    pub fn uri(&self) -> Option<&str> {
        self.meta.uri.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.meta.title.as_deref()
    }

    /// Returns the visualization class (bar chart, table, ...).
    pub fn visualization_class(&self) -> Option<&ObjQualifier> {
        self.content.visualization_class.as_ref()
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.content.buckets
    }

    /// Returns the filters applied to the whole visualization.
    pub fn filters(&self) -> &[Filter] {
        &self.content.filters
    }

    /// Returns every measure across all buckets, in bucket order.
    pub fn measures(&self) -> impl Iterator<Item = &Measure> {
        self.items().filter_map(|item| match item {
            BucketItem::Measure(measure) => Some(measure),
            _ => None,
        })
    }

    /// Returns every attribute across all buckets, in bucket order.
    pub fn attributes(&self) -> impl Iterator<Item = &VisualizationAttribute> {
        self.items().filter_map(|item| match item {
            BucketItem::Attribute(attribute) => Some(attribute),
            _ => None,
        })
    }

    fn items(&self) -> impl Iterator<Item = &BucketItem> {
        self.content.buckets.iter().flat_map(|bucket| bucket.items.iter())
    }
}

/// Wrapper document for [`VisualizationObject`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationObjectDocument {
    pub visualization_object: VisualizationObject,
}

/// A named group of measures and attributes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    #[serde(default)]
    pub local_identifier: Option<String>,

    #[serde(default)]
    pub items: Vec<BucketItem>,
}

impl Bucket {
    pub fn new(local_identifier: &str, items: Vec<BucketItem>) -> Self {
        Self {
            local_identifier: Some(local_identifier.to_string()),
            items,
        }
    }
}

/// A single entry of a [`Bucket`].
#[derive(Debug, Clone, PartialEq)]
pub enum BucketItem {
    Measure(Measure),
    Attribute(VisualizationAttribute),
    /// An item kind not modeled here, identified by its tag.
    Other(String),
}

impl<'de> Deserialize<'de> for BucketItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (tag, value) = tagged::split(deserializer)?;
        match tag.as_str() {
            "measure" => tagged::body(&tag, value).map(BucketItem::Measure),
            "visualizationAttribute" => tagged::body(&tag, value).map(BucketItem::Attribute),
            _ => Ok(BucketItem::Other(tag)),
        }
    }
}

/// A measure placed in a bucket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    pub local_identifier: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub alias: Option<String>,

    pub definition: MeasureDefinition,
}

impl Measure {
    pub fn new(local_identifier: &str, definition: MeasureDefinition) -> Self {
        Self {
            local_identifier: local_identifier.to_string(),
            title: None,
            alias: None,
            definition,
        }
    }
}

/// How a [`Measure`] is computed.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureDefinition {
    /// A metric or fact aggregation (`measureDefinition`).
    Simple(SimpleMeasureDefinition),
    /// Comparison with the equivalent prior range (`previousPeriodMeasure`).
    PreviousPeriod(PreviousPeriodMeasureDefinition),
    /// Period-over-period comparison bound to a date attribute
    /// (`popMeasureDefinition`).
    PeriodOverPeriod(PopMeasureDefinition),
    /// Arithmetic combination of other measures (`arithmeticMeasure`).
    Arithmetic(ArithmeticMeasureDefinition),
    /// A definition kind not modeled here, identified by its tag.
    Other(String),
}

impl<'de> Deserialize<'de> for MeasureDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (tag, value) = tagged::split(deserializer)?;
        match tag.as_str() {
            "measureDefinition" | "measure" => {
                tagged::body(&tag, value).map(MeasureDefinition::Simple)
            }
            "previousPeriodMeasure" => tagged::body(&tag, value).map(MeasureDefinition::PreviousPeriod),
            "popMeasureDefinition" | "popMeasure" => {
                tagged::body(&tag, value).map(MeasureDefinition::PeriodOverPeriod)
            }
            "arithmeticMeasure" => tagged::body(&tag, value).map(MeasureDefinition::Arithmetic),
            _ => Ok(MeasureDefinition::Other(tag)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleMeasureDefinition {
    pub item: ObjQualifier,

    #[serde(default)]
    pub aggregation: Option<String>,

    #[serde(default)]
    pub compute_ratio: Option<bool>,

    #[serde(default)]
    pub filters: Vec<Filter>,
}

impl SimpleMeasureDefinition {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: ObjQualifier::uri(item),
            aggregation: None,
            compute_ratio: None,
            filters: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousPeriodMeasureDefinition {
    pub measure_identifier: String,

    #[serde(default)]
    pub date_data_sets: Vec<PreviousPeriodDateDataSet>,
}

impl PreviousPeriodMeasureDefinition {
    pub fn new(measure_identifier: &str) -> Self {
        Self {
            measure_identifier: measure_identifier.to_string(),
            date_data_sets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousPeriodDateDataSet {
    pub data_set: ObjQualifier,
    pub periods_ago: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopMeasureDefinition {
    pub measure_identifier: String,
    pub pop_attribute: ObjQualifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArithmeticMeasureDefinition {
    pub measure_identifiers: Vec<String>,
    pub operator: String,
}

/// An attribute placed in a bucket, referenced through one of its display
/// forms.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationAttribute {
    #[serde(default)]
    pub local_identifier: Option<String>,

    #[serde(default)]
    pub alias: Option<String>,

    pub display_form: UriRef,
}

impl VisualizationAttribute {
    pub fn new(local_identifier: &str, display_form: impl Into<String>) -> Self {
        Self {
            local_identifier: Some(local_identifier.to_string()),
            alias: None,
            display_form: UriRef::new(display_form),
        }
    }

    /// Returns the URI of the referenced display form.
    pub fn display_form_uri(&self) -> &str {
        &self.display_form.uri
    }
}

/// A filter applied to a visualization or a measure.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// A date range pinned to fixed calendar dates (`absoluteDateFilter`).
    AbsoluteDate(AbsoluteDateFilter),
    /// A rolling date range relative to today (`relativeDateFilter`).
    RelativeDate(RelativeDateFilter),
    PositiveAttribute(AttributeFilter),
    NegativeAttribute(AttributeFilter),
    /// A filter kind not modeled here, identified by its tag.
    Other(String),
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (tag, value) = tagged::split(deserializer)?;
        match tag.as_str() {
            "absoluteDateFilter" => tagged::body(&tag, value).map(Filter::AbsoluteDate),
            "relativeDateFilter" => tagged::body(&tag, value).map(Filter::RelativeDate),
            "positiveAttributeFilter" => tagged::body(&tag, value).map(Filter::PositiveAttribute),
            "negativeAttributeFilter" => tagged::body(&tag, value).map(Filter::NegativeAttribute),
            _ => Ok(Filter::Other(tag)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsoluteDateFilter {
    pub data_set: ObjQualifier,

    #[serde(default)]
    pub from: Option<String>,

    #[serde(default)]
    pub to: Option<String>,
}

impl AbsoluteDateFilter {
    pub fn new(data_set: impl Into<String>, from: &str, to: &str) -> Self {
        Self {
            data_set: ObjQualifier::uri(data_set),
            from: Some(from.to_string()),
            to: Some(to.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeDateFilter {
    pub data_set: ObjQualifier,
    pub granularity: String,

    #[serde(default)]
    pub from: Option<i64>,

    #[serde(default)]
    pub to: Option<i64>,
}

impl RelativeDateFilter {
    pub fn new(data_set: impl Into<String>, granularity: &str, from: i64, to: i64) -> Self {
        Self {
            data_set: ObjQualifier::uri(data_set),
            granularity: granularity.to_string(),
            from: Some(from),
            to: Some(to),
        }
    }
}

/// Payload of positive and negative attribute filters.
///
/// Only the filtered display form is kept; the element selections come in
/// several encodings and are not needed by the audit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeFilter {
    pub display_form: ObjQualifier,
}
