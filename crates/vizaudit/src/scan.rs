//! Project scanning.
//!
//! [`Scanner::scan_project`] walks one project's visualization objects and
//! writes the URI of every match to a sink. [`audit_projects`] drives the
//! scanner over a list of project IDs. Both stop at the first error: there
//! is no per-project isolation and nothing is retried.

use std::io::Write;

use log::{debug, info, warn};

use vizaudit_core::Project;

use crate::{AuditError, MetadataService, cache::DisplayFormCache, predicate};

/// Receives progress notifications during an audit.
///
/// All methods default to doing nothing.
pub trait ScanObserver {
    /// Called before project `index` (1-based) of `total` is resolved.
    fn project_started(&mut self, _index: usize, _total: usize, _project_id: &str) {}

    /// Called before visualization object `index` (1-based) of `total` is
    /// fetched.
    fn object_started(&mut self, _index: usize, _total: usize, _uri: &str) {}

    /// Called after a matching URI was written to the sink.
    fn object_matched(&mut self, _uri: &str) {}

    /// Called after project `index` (1-based) of `total` was scanned.
    fn project_finished(&mut self, _index: usize, _total: usize, _report: &ProjectReport) {}
}

/// An observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

/// Outcome of scanning one project.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProjectReport {
    pub objects_scanned: usize,
    pub objects_matched: usize,
}

/// Outcome of a whole audit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AuditReport {
    pub projects_scanned: usize,
    pub objects_scanned: usize,
    pub objects_matched: usize,
}

impl AuditReport {
    fn add(&mut self, project: &ProjectReport) {
        self.projects_scanned += 1;
        self.objects_scanned += project.objects_scanned;
        self.objects_matched += project.objects_matched;
    }
}

/// Scans projects against a [`MetadataService`].
pub struct Scanner<'a, S: MetadataService + ?Sized> {
    service: &'a mut S,
}

impl<'a, S: MetadataService + ?Sized> Scanner<'a, S> {
    pub fn new(service: &'a mut S) -> Self {
        Self { service }
    }

    /// Scans every visualization object of `project`, writing the URI of each
    /// match followed by a newline to `sink`.
    ///
    /// Objects are visited in the order the platform lists them. A fresh
    /// display-form cache is used for the project and dropped on return.
    ///
    /// # Errors
    ///
    /// Returns the first error from listing or fetching objects, resolving
    /// display forms, or writing to `sink`.
    pub fn scan_project<W>(
        &mut self,
        project: &Project,
        sink: &mut W,
        observer: &mut dyn ScanObserver,
    ) -> Result<ProjectReport, AuditError>
    where
        W: Write + ?Sized,
    {
        let entries = self.service.find_visualization_objects(project)?;
        info!(
            project = project.id(),
            objects = entries.len();
            "Scanning visualization objects"
        );

        let mut cache = DisplayFormCache::new();
        let mut report = ProjectReport::default();

        for (index, entry) in entries.iter().enumerate() {
            observer.object_started(index + 1, entries.len(), entry.uri());

            let object = self.service.get_visualization_object(entry.uri())?;
            report.objects_scanned += 1;

            if predicate::matches(&object, &mut *self.service, &mut cache)? {
                let uri = object.uri().unwrap_or(entry.uri());
                writeln!(sink, "{uri}")?;
                report.objects_matched += 1;

                info!(uri; "Visualization object matches");
                observer.object_matched(uri);
            }
        }

        debug!(
            project = project.id(),
            cached_display_forms = cache.len(),
            matched = report.objects_matched;
            "Project scanned"
        );

        Ok(report)
    }
}

/// Audits each project in `project_ids`, in order, writing matching URIs to
/// `sink`.
///
/// # Errors
///
/// Returns the first error; projects after the failing one are not visited.
pub fn audit_projects<S, W>(
    service: &mut S,
    project_ids: &[String],
    sink: &mut W,
    observer: &mut dyn ScanObserver,
) -> Result<AuditReport, AuditError>
where
    S: MetadataService + ?Sized,
    W: Write + ?Sized,
{
    let total = project_ids.len();
    let mut report = AuditReport::default();

    for (index, project_id) in project_ids.iter().enumerate() {
        observer.project_started(index + 1, total, project_id);

        let project = service.get_project_by_id(project_id)?;
        debug!(project = project.id(), title:? = project.title(); "Resolved project");

        let project_report = Scanner::new(&mut *service).scan_project(&project, sink, observer)?;
        report.add(&project_report);

        observer.project_finished(index + 1, total, &project_report);
    }

    Ok(report)
}

/// Runs `work` against `service` and then logs out, whatever the outcome
/// of `work`.
///
/// A logout failure is logged and does not replace the result of `work`.
pub fn with_logout<S, T, F>(service: &mut S, work: F) -> Result<T, AuditError>
where
    S: MetadataService + ?Sized,
    F: FnOnce(&mut S) -> Result<T, AuditError>,
{
    let result = work(service);

    if let Err(err) = service.logout() {
        warn!(err:err; "Logout failed");
    }

    result
}

/// Runs [`audit_projects`] inside [`with_logout`].
pub fn audit_and_logout<S, W>(
    service: &mut S,
    project_ids: &[String],
    sink: &mut W,
    observer: &mut dyn ScanObserver,
) -> Result<AuditReport, AuditError>
where
    S: MetadataService + ?Sized,
    W: Write + ?Sized,
{
    with_logout(service, |service| {
        audit_projects(service, project_ids, sink, observer)
    })
}

/// Parses the project list: one ID per line, surrounding whitespace trimmed,
/// blank lines skipped.
pub fn parse_project_ids(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns the rounded percentage of `done` out of `total` projects.
pub fn percent_done(done: usize, total: usize) -> usize {
    if total == 0 {
        return 100;
    }
    (done * 100 + total / 2) / total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_project_ids() {
        let ids = parse_project_ids("PROJ1\r\n  PROJ2  \n\nPROJ3\n");
        assert_eq!(ids, vec!["PROJ1", "PROJ2", "PROJ3"]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_project_ids("").is_empty());
        assert!(parse_project_ids("\n\n").is_empty());
    }

    #[test]
    fn test_percent_done() {
        assert_eq!(percent_done(1, 2), 50);
        assert_eq!(percent_done(2, 2), 100);
        assert_eq!(percent_done(1, 3), 33);
        assert_eq!(percent_done(2, 3), 67);
        assert_eq!(percent_done(0, 0), 100);
    }
}
