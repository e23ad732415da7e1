//! Command-line front end for the lab-usage tracker.
//!
//! One subcommand per process invocation. `import` resets the schema and
//! bulk-loads every table from a folder of CSV files; the other subcommands
//! are single write operations or reporting queries against the existing
//! database. Mutations print `Success` or `Fail`; queries print one
//! comma-joined line per row.

mod config;
mod output;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use labtrack_db::{load_all, ops, query, CsvDirSource, DbError, Session};

use crate::config::Config;

/// University lab-machine usage tracker.
#[derive(Parser, Debug)]
#[command(name = "labtrack", version, about)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(short, long, env = "LABTRACK_DB", default_value = "labtrack.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reset the schema and bulk-load every table from CSV files
    Import {
        /// Folder containing one `<table>.csv` per entity
        folder: PathBuf,
    },

    /// Create a student with their first email address
    #[command(name = "insertStudent")]
    InsertStudent {
        ucinetid: String,
        email: String,
        first: String,
        middle: String,
        last: String,
    },

    /// Add an email address to an existing user
    #[command(name = "addEmail")]
    AddEmail { ucinetid: String, email: String },

    /// Delete a student, their user row and all their emails
    #[command(name = "deleteStudent")]
    DeleteStudent { ucinetid: String },

    /// Register a machine
    #[command(name = "insertMachine")]
    InsertMachine {
        machine_id: String,
        hostname: String,
        ip_address: String,
        status: String,
        location: String,
    },

    /// Record that a student used a machine for a project
    #[command(name = "insertUse")]
    InsertUse {
        project_id: String,
        ucinetid: String,
        machine_id: String,
        start_date: String,
        end_date: String,
    },

    /// Change a course title
    #[command(name = "updateCourse")]
    UpdateCourse { course_id: String, title: String },

    /// List the courses a student has usage records for
    #[command(name = "listCourse")]
    ListCourse { ucinetid: String },

    /// Rank courses by usage-record count
    #[command(name = "popularCourse")]
    PopularCourse { count: i64 },

    /// List the admins of a machine with their email addresses
    #[command(name = "adminEmails")]
    AdminEmails { machine_id: String },

    /// List students with enough usage records on an active machine
    #[command(name = "activeStudent")]
    ActiveStudent {
        machine_id: String,
        count: i64,
        start_date: String,
        end_date: String,
    },

    /// Per-machine usage counts for one course, zero counts included
    #[command(name = "machineUsage")]
    MachineUsage { course_id: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = Config::from_env();
    let filter =
        EnvFilter::try_new(&cfg.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).compact().init();

    let mut session = Session::open(&cli.database)
        .with_context(|| format!("cannot open database at {}", cli.database.display()))?;

    match cli.command {
        Command::Import { folder } => {
            session.reset_schema().context("schema reset failed")?;
            let mut source = CsvDirSource::new(&folder);
            let report = load_all(&mut session, &mut source)
                .with_context(|| format!("bulk load from {} failed", folder.display()))?;
            println!("{}", output::load_report_line(&report));
        }

        Command::InsertStudent { ucinetid, email, first, middle, last } => {
            report(ops::create_student(
                &mut session, &ucinetid, &email, &first, &middle, &last,
            ));
        }
        Command::AddEmail { ucinetid, email } => {
            report(ops::add_email(&mut session, &ucinetid, &email));
        }
        Command::DeleteStudent { ucinetid } => {
            report(ops::delete_student(&mut session, &ucinetid));
        }
        Command::InsertMachine { machine_id, hostname, ip_address, status, location } => {
            report(ops::create_machine(
                &mut session, &machine_id, &hostname, &ip_address, &status, &location,
            ));
        }
        Command::InsertUse { project_id, ucinetid, machine_id, start_date, end_date } => {
            report(ops::record_usage(
                &mut session, &project_id, &ucinetid, &machine_id, &start_date, &end_date,
            ));
        }
        Command::UpdateCourse { course_id, title } => {
            report(ops::update_course_title(&mut session, &course_id, &title));
        }

        Command::ListCourse { ucinetid } => {
            print_rows(
                query::list_courses_for_student(&session, &ucinetid),
                output::course_line,
            );
        }
        Command::PopularCourse { count } => {
            print_rows(
                query::most_popular_courses(&session, count),
                output::popularity_line,
            );
        }
        Command::AdminEmails { machine_id } => {
            print_rows(
                query::admins_for_machine(&session, &machine_id),
                output::admin_line,
            );
        }
        Command::ActiveStudent { machine_id, count, start_date, end_date } => {
            print_rows(
                query::active_students(&session, &machine_id, &start_date, &end_date, count),
                output::student_line,
            );
        }
        Command::MachineUsage { course_id } => {
            print_rows(
                query::machine_usage_for_course(&session, &course_id),
                output::machine_usage_line,
            );
        }
    }

    Ok(())
}

/// Maps a write-operation outcome to the one-word result line.
fn report(result: Result<(), DbError>) {
    match result {
        Ok(()) => println!("Success"),
        Err(err) => {
            warn!(%err, "operation failed");
            println!("Fail");
        }
    }
}

/// Prints one rendered line per row, or a single failure line; a failed
/// query never produces a partial listing.
fn print_rows<T>(result: Result<Vec<T>, DbError>, render: fn(&T) -> String) {
    match result {
        Ok(rows) => {
            for row in &rows {
                println!("{}", render(row));
            }
        }
        Err(err) => {
            warn!(%err, "query failed");
            println!("Fail");
        }
    }
}
