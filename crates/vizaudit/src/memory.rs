//! In-memory metadata service.
//!
//! [`InMemoryService`] is a test double: it serves a fixed set of projects
//! and objects and records every call made against it, so tests can assert
//! on the exact sequence of remote calls. It is public so the CLI crate's
//! tests can drive the audit without a server.

use std::collections::HashMap;

use vizaudit_core::{Attribute, AttributeDisplayForm, Entry, Project, VisualizationObject};

use crate::{AuditError, MetadataService};

/// A call received by an [`InMemoryService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetProject(String),
    FindVisualizationObjects(String),
    GetVisualizationObject(String),
    GetDisplayForm(String),
    GetAttribute(String),
    Logout,
}

#[derive(Debug, Default)]
pub struct InMemoryService {
    projects: Vec<(Project, Vec<Entry>)>,
    objects: HashMap<String, VisualizationObject>,
    display_forms: HashMap<String, AttributeDisplayForm>,
    attributes: HashMap<String, Attribute>,
    fail_logout: bool,
    calls: Vec<Call>,
}

impl InMemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an empty project.
    pub fn with_project(mut self, project_id: &str) -> Self {
        self.project_entries(project_id);
        self
    }

    /// Registers a visualization object and lists it under `project_id`.
    ///
    /// The object must carry a URI; the project is created if needed.
    pub fn with_visualization_object(mut self, project_id: &str, object: VisualizationObject) -> Self {
        let uri = object.uri().unwrap_or_default().to_string();
        self.project_entries(project_id).push(Entry::new(uri.clone()));
        self.objects.insert(uri, object);
        self
    }

    /// Lists `uri` under `project_id` without serving an object for it.
    pub fn with_entry(mut self, project_id: &str, uri: &str) -> Self {
        self.project_entries(project_id).push(Entry::new(uri));
        self
    }

    pub fn with_display_form(mut self, uri: &str, form_of: &str) -> Self {
        self.display_forms
            .insert(uri.to_string(), AttributeDisplayForm::new(uri, form_of));
        self
    }

    pub fn with_attribute(mut self, uri: &str, kind: Option<&str>) -> Self {
        self.attributes
            .insert(uri.to_string(), Attribute::new(uri, kind));
        self
    }

    /// Makes [`MetadataService::logout`] fail.
    pub fn with_failing_logout(mut self) -> Self {
        self.fail_logout = true;
        self
    }

    /// Returns every call received so far, in order.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn display_form_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::GetDisplayForm(_)))
    }

    pub fn attribute_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::GetAttribute(_)))
    }

    pub fn logout_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::Logout))
    }

    fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    fn project_entries(&mut self, project_id: &str) -> &mut Vec<Entry> {
        let index = match self
            .projects
            .iter()
            .position(|(project, _)| project.id() == project_id)
        {
            Some(index) => index,
            None => {
                self.projects.push((Project::new(project_id, None), Vec::new()));
                self.projects.len() - 1
            }
        };
        &mut self.projects[index].1
    }
}

fn not_found(uri: &str) -> AuditError {
    AuditError::NotFound {
        uri: uri.to_string(),
    }
}

impl MetadataService for InMemoryService {
    fn get_project_by_id(&mut self, project_id: &str) -> Result<Project, AuditError> {
        self.calls.push(Call::GetProject(project_id.to_string()));
        self.projects
            .iter()
            .find(|(project, _)| project.id() == project_id)
            .map(|(project, _)| project.clone())
            .ok_or_else(|| not_found(&format!("/gdc/projects/{project_id}")))
    }

    fn find_visualization_objects(&mut self, project: &Project) -> Result<Vec<Entry>, AuditError> {
        self.calls
            .push(Call::FindVisualizationObjects(project.id().to_string()));
        self.projects
            .iter()
            .find(|(candidate, _)| candidate.id() == project.id())
            .map(|(_, entries)| entries.clone())
            .ok_or_else(|| not_found(&project.visualization_objects_query_uri()))
    }

    fn get_visualization_object(&mut self, uri: &str) -> Result<VisualizationObject, AuditError> {
        self.calls.push(Call::GetVisualizationObject(uri.to_string()));
        self.objects.get(uri).cloned().ok_or_else(|| not_found(uri))
    }

    fn get_display_form(&mut self, uri: &str) -> Result<AttributeDisplayForm, AuditError> {
        self.calls.push(Call::GetDisplayForm(uri.to_string()));
        self.display_forms.get(uri).cloned().ok_or_else(|| not_found(uri))
    }

    fn get_attribute(&mut self, uri: &str) -> Result<Attribute, AuditError> {
        self.calls.push(Call::GetAttribute(uri.to_string()));
        self.attributes.get(uri).cloned().ok_or_else(|| not_found(uri))
    }

    fn logout(&mut self) -> Result<(), AuditError> {
        self.calls.push(Call::Logout);
        if self.fail_logout {
            return Err(AuditError::Status {
                uri: "/gdc/account/login".to_string(),
                status: 500,
            });
        }
        Ok(())
    }
}
