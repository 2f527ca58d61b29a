//! Memoized display-form classification.
//!
//! Resolving whether a display form belongs to a non-day attribute costs two
//! sequential remote fetches (display form, then its attribute). Charts in
//! one project reuse the same few date display forms, so the answer is kept
//! per display-form URI for the duration of one project scan.

use std::collections::HashMap;

use log::{debug, trace};

use crate::{AuditError, MetadataService};

/// Cache from display-form URI to "the owning attribute is not the per-day
/// date attribute".
///
/// A cache is owned by a single project scan and dropped with it.
#[derive(Debug, Default)]
pub struct DisplayFormCache {
    entries: HashMap<String, bool>,
}

impl DisplayFormCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the classification of `display_form_uri`, resolving it through
    /// `service` on the first lookup.
    ///
    /// A failed resolution is not cached.
    ///
    /// # Errors
    ///
    /// Propagates any error from fetching the display form or its attribute.
    pub fn is_non_day<S>(&mut self, display_form_uri: &str, service: &mut S) -> Result<bool, AuditError>
    where
        S: MetadataService + ?Sized,
    {
        if let Some(&cached) = self.entries.get(display_form_uri) {
            trace!(display_form = display_form_uri, non_day = cached; "Display form cache hit");
            return Ok(cached);
        }

        let display_form = service.get_display_form(display_form_uri)?;
        let attribute = service.get_attribute(display_form.form_of())?;
        let non_day = !attribute.is_day_granularity();

        debug!(
            display_form = display_form_uri,
            attribute = display_form.form_of(),
            attribute_type:? = attribute.kind(),
            non_day;
            "Resolved display form"
        );

        self.entries.insert(display_form_uri.to_string(), non_day);
        Ok(non_day)
    }

    /// Returns the cached classification without resolving.
    pub fn get(&self, display_form_uri: &str) -> Option<bool> {
        self.entries.get(display_form_uri).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
