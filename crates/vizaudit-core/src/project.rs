//! Projects and the metadata object index.

use serde::Deserialize;

/// A GoodData project (workspace) as returned by `GET /gdc/projects/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    #[serde(default)]
    meta: ProjectMeta,

    #[serde(default)]
    content: ProjectContent,

    links: ProjectLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct ProjectMeta {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct ProjectContent {
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct ProjectLinks {
    #[serde(rename = "self")]
    self_link: String,

    metadata: String,
}

impl Project {
    /// Creates a project handle for the given ID with the platform's
    /// canonical links.
    pub fn new(id: &str, title: Option<String>) -> Self {
        Self {
            meta: ProjectMeta { title },
            content: ProjectContent {
                state: Some("ENABLED".to_string()),
            },
            links: ProjectLinks {
                self_link: format!("/gdc/projects/{id}"),
                metadata: format!("/gdc/md/{id}"),
            },
        }
    }

    /// Returns the project ID, the last segment of the project's self link.
    pub fn id(&self) -> &str {
        self.links
            .self_link
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }

    /// Returns the project title, if the platform reported one.
    pub fn title(&self) -> Option<&str> {
        self.meta.title.as_deref()
    }

    /// Returns the project state, e.g. `ENABLED` or `DELETED`.
    pub fn state(&self) -> Option<&str> {
        self.content.state.as_deref()
    }

    /// Returns the project's self link (`/gdc/projects/{id}`).
    pub fn uri(&self) -> &str {
        &self.links.self_link
    }

    /// Returns the root of the project's metadata tree (`/gdc/md/{id}`).
    pub fn metadata_uri(&self) -> &str {
        &self.links.metadata
    }

    /// Returns the URI listing every visualization object of the project.
    pub fn visualization_objects_query_uri(&self) -> String {
        format!(
            "{}/query/visualizationobjects",
            self.metadata_uri().trim_end_matches('/')
        )
    }
}

/// Wrapper document for [`Project`].
#[derive(Debug, Deserialize)]
pub struct ProjectDocument {
    pub project: Project,
}

/// An entry of a metadata query: a lightweight reference to an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entry {
    /// URI of the referenced object.
    pub link: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub identifier: Option<String>,

    #[serde(default)]
    pub category: Option<String>,
}

impl Entry {
    /// Creates an entry pointing at `link`.
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: None,
            identifier: None,
            category: Some("visualizationObject".to_string()),
        }
    }

    /// Returns the URI of the referenced object.
    pub fn uri(&self) -> &str {
        &self.link
    }
}

/// Wrapper document for a metadata query (`GET /gdc/md/{id}/query/...`).
#[derive(Debug, Deserialize)]
pub struct QueryDocument {
    pub query: Query,
}

#[derive(Debug, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_document_deserializes() {
        let json = r#"{
            "project": {
                "content": { "state": "ENABLED", "driver": "Pg" },
                "links": {
                    "self": "/gdc/projects/PROJ1",
                    "metadata": "/gdc/md/PROJ1",
                    "users": "/gdc/projects/PROJ1/users"
                },
                "meta": { "title": "Sales", "created": "2019-01-01 10:00:00" }
            }
        }"#;

        let doc: ProjectDocument = serde_json::from_str(json).unwrap();
        let project = doc.project;

        assert_eq!(project.id(), "PROJ1");
        assert_eq!(project.title(), Some("Sales"));
        assert_eq!(project.state(), Some("ENABLED"));
        assert_eq!(project.metadata_uri(), "/gdc/md/PROJ1");
        assert_eq!(
            project.visualization_objects_query_uri(),
            "/gdc/md/PROJ1/query/visualizationobjects"
        );
    }

    #[test]
    fn test_project_new_matches_platform_links() {
        let project = Project::new("abc123", None);
        assert_eq!(project.id(), "abc123");
        assert_eq!(project.uri(), "/gdc/projects/abc123");
        assert_eq!(project.metadata_uri(), "/gdc/md/abc123");
    }

    #[test]
    fn test_query_document_preserves_entry_order() {
        let json = r#"{
            "query": {
                "entries": [
                    { "link": "/gdc/md/P/obj/3", "title": "Third", "category": "visualizationObject" },
                    { "link": "/gdc/md/P/obj/1", "title": "First", "identifier": "aa1" }
                ],
                "meta": { "summary": "Metadata Query Resources for project 'P'" }
            }
        }"#;

        let doc: QueryDocument = serde_json::from_str(json).unwrap();
        let links: Vec<_> = doc.query.entries.iter().map(Entry::uri).collect();

        assert_eq!(links, vec!["/gdc/md/P/obj/3", "/gdc/md/P/obj/1"]);
        assert_eq!(doc.query.entries[1].identifier.as_deref(), Some("aa1"));
    }

    #[test]
    fn test_query_without_entries_is_empty() {
        let doc: QueryDocument = serde_json::from_str(r#"{"query": {}}"#).unwrap();
        assert!(doc.query.entries.is_empty());
    }
}
