//! CLI logic for the vizaudit tool.
//!
//! [`run`] wires the command-line arguments to a [`GoodDataClient`]; the
//! audit itself lives in [`run_with_service`] so it can be driven against any
//! [`MetadataService`].

pub mod error_adapter;
pub mod progress;

mod args;
mod config;

pub use args::Args;
pub use progress::ConsoleProgress;

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
};

use log::info;

use vizaudit::{
    AuditError, AuditReport, Credentials, GoodDataClient, MetadataService, ScanObserver,
    audit_projects, parse_project_ids, with_logout,
};

/// Run the vizaudit CLI application
///
/// Loads the configuration, logs in to the configured server and audits
/// every project listed in the input file, printing progress to stdout.
/// Rejected credentials fail the run even when the input file is empty.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `AuditError` for:
/// - Configuration loading errors
/// - File I/O errors
/// - Authentication and remote-service errors
pub fn run(args: &Args) -> Result<AuditReport, AuditError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let app_config = config::with_hostname_override(app_config, args.hostname.as_deref());

    let credentials = Credentials::new(&args.user, &args.password);
    let mut client = GoodDataClient::connect(&app_config, credentials)?;

    run_with_service(args, &mut client, &mut ConsoleProgress::new())
}

/// Audits the projects listed in `args.input` against `service`, writing
/// matching URIs to `args.output`.
///
/// The output file is created before the input is read. `service` is logged
/// out afterwards whether or not the audit succeeded; a logout failure is
/// only logged.
///
/// # Errors
///
/// Returns the first I/O or remote-service error.
pub fn run_with_service<S>(
    args: &Args,
    service: &mut S,
    observer: &mut dyn ScanObserver,
) -> Result<AuditReport, AuditError>
where
    S: MetadataService + ?Sized,
{
    info!(
        input_path = args.input,
        output_path = args.output;
        "Auditing projects"
    );

    let report = with_logout(service, |service| audit_to_file(args, service, observer))?;
    info!(
        output_file = args.output,
        projects = report.projects_scanned,
        objects = report.objects_scanned,
        matched = report.objects_matched;
        "Audit finished"
    );

    Ok(report)
}

fn audit_to_file<S>(
    args: &Args,
    service: &mut S,
    observer: &mut dyn ScanObserver,
) -> Result<AuditReport, AuditError>
where
    S: MetadataService + ?Sized,
{
    let mut sink = BufWriter::new(File::create(&args.output)?);

    let source = fs::read_to_string(&args.input)?;
    let project_ids = parse_project_ids(&source);
    info!(projects = project_ids.len(); "Read project list");

    // Matches found before a failure still reach the file.
    let result = audit_projects(service, &project_ids, &mut sink, observer);
    let flushed = sink.flush();

    let report = result?;
    flushed?;
    Ok(report)
}
