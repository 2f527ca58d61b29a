//! The remote metadata service boundary.

use vizaudit_core::{Attribute, AttributeDisplayForm, Entry, Project, VisualizationObject};

use crate::AuditError;

/// Read access to a GoodData platform, plus session teardown.
///
/// [`GoodDataClient`](crate::GoodDataClient) implements this over HTTP;
/// [`InMemoryService`](crate::InMemoryService) serves fixed objects.
pub trait MetadataService {
    /// Resolves a project by ID, confirming it exists and is accessible.
    fn get_project_by_id(&mut self, project_id: &str) -> Result<Project, AuditError>;

    /// Lists the visualization objects of a project, in platform order.
    fn find_visualization_objects(&mut self, project: &Project) -> Result<Vec<Entry>, AuditError>;

    fn get_visualization_object(&mut self, uri: &str) -> Result<VisualizationObject, AuditError>;

    fn get_display_form(&mut self, uri: &str) -> Result<AttributeDisplayForm, AuditError>;

    fn get_attribute(&mut self, uri: &str) -> Result<Attribute, AuditError>;

    /// Ends the session. Calling it without an open session is a no-op.
    fn logout(&mut self) -> Result<(), AuditError>;
}
