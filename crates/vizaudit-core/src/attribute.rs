//! Attributes and their display forms.

use serde::Deserialize;

/// Attribute type of per-day date attributes.
pub const DAY_DATE_TYPE: &str = "GDC.time.date";

/// A labeled representation of an attribute (`attributeDisplayForm`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttributeDisplayForm {
    content: DisplayFormContent,

    #[serde(default)]
    meta: ObjectMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DisplayFormContent {
    form_of: String,

    #[serde(default)]
    expression: Option<String>,
}

impl AttributeDisplayForm {
    /// Creates a display form owned by the attribute at `form_of`.
    pub fn new(uri: impl Into<String>, form_of: impl Into<String>) -> Self {
        Self {
            content: DisplayFormContent {
                form_of: form_of.into(),
                expression: None,
            },
            meta: ObjectMeta {
                uri: Some(uri.into()),
                title: None,
            },
        }
    }

    /// Returns the URI of the attribute this display form belongs to.
    pub fn form_of(&self) -> &str {
        &self.content.form_of
    }

    pub fn uri(&self) -> Option<&str> {
        self.meta.uri.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.meta.title.as_deref()
    }
}

/// Wrapper document for [`AttributeDisplayForm`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFormDocument {
    pub attribute_display_form: AttributeDisplayForm,
}

/// A project attribute.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attribute {
    #[serde(default)]
    content: AttributeContent,

    #[serde(default)]
    meta: ObjectMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct AttributeContent {
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl Attribute {
    /// Creates an attribute with an optional semantic type.
    pub fn new(uri: impl Into<String>, kind: Option<&str>) -> Self {
        Self {
            content: AttributeContent {
                kind: kind.map(str::to_string),
            },
            meta: ObjectMeta {
                uri: Some(uri.into()),
                title: None,
            },
        }
    }

    /// Returns the semantic type, e.g. `GDC.time.date` or `GDC.time.month`.
    ///
    /// Plain (non-date) attributes usually carry no type at all.
    pub fn kind(&self) -> Option<&str> {
        self.content.kind.as_deref()
    }

    /// Returns whether this is the per-day date attribute.
    ///
    /// An absent type is never the day type.
    pub fn is_day_granularity(&self) -> bool {
        self.kind() == Some(DAY_DATE_TYPE)
    }

    pub fn uri(&self) -> Option<&str> {
        self.meta.uri.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.meta.title.as_deref()
    }
}

/// Wrapper document for [`Attribute`].
#[derive(Debug, Deserialize)]
pub struct AttributeDocument {
    pub attribute: Attribute,
}

/// The `meta` section shared by metadata objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct ObjectMeta {
    #[serde(default)]
    pub(crate) uri: Option<String>,

    #[serde(default)]
    pub(crate) title: Option<String>,
}
