//! vizaudit CLI entry point.

use std::{process, str::FromStr};

use clap::{CommandFactory, Parser, error::ErrorKind};
use log::{LevelFilter, debug, error, info};

use vizaudit_cli::{Args, error_adapter::ErrorAdapter};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("{err}");
            let _ = Args::command().print_help();
            process::exit(1);
        }
    };

    // Initialize the logger with the specified log level
    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting vizaudit");
    debug!(
        hostname:? = args.hostname,
        user = args.user,
        input = args.input,
        output = args.output;
        "Parsed arguments"
    );

    match vizaudit_cli::run(&args) {
        Ok(report) => {
            info!(matched = report.objects_matched; "Completed successfully");
        }
        Err(err) => {
            let reporter = miette::GraphicalReportHandler::new();
            let mut writer = String::new();
            reporter
                .render_report(&mut writer, &ErrorAdapter(&err))
                .expect("Writing to String buffer is infallible");

            error!("{writer}");
            process::exit(1);
        }
    }
}
