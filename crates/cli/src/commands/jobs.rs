// Job posting commands

use super::require_dashboard;
use crate::output::{print_field, print_records, OutputFormat};
use anyhow::{Context, Result};
use aspire_core::{NewJob, SessionService};
use clap::Subcommand;

const COLUMNS: &[(&str, &str, usize)] = &[
    ("id", "ID", 24),
    ("title", "TITLE", 24),
    ("company", "COMPANY", 16),
    ("location", "LOCATION", 14),
    ("employmentType", "TYPE", 10),
    ("tags", "TAGS", 20),
    ("blocked", "BLOCKED", 7),
];

#[derive(Subcommand)]
pub enum JobsCommand {
    /// List job postings
    List,

    /// Publish a job posting
    Create {
        /// Job title
        #[arg(long)]
        title: String,

        /// Company name
        #[arg(long)]
        company: String,

        /// Location
        #[arg(long)]
        location: String,

        /// Employment type (e.g. Full-time)
        #[arg(long)]
        employment_type: String,

        /// Required experience
        #[arg(long)]
        experience: String,

        /// Comma-separated tags
        #[arg(long)]
        tags: String,

        /// Description (HTML allowed); read from a file with --description-file
        #[arg(long, conflicts_with = "description_file")]
        description: Option<String>,

        /// File holding the description
        #[arg(long)]
        description_file: Option<String>,
    },

    /// Block a job posting
    Block {
        /// Job ID
        job_id: String,
    },

    /// Unblock a job posting
    Unblock {
        /// Job ID
        job_id: String,
    },
}

pub async fn run(
    command: JobsCommand,
    service: &SessionService,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    require_dashboard(service)?;

    match command {
        JobsCommand::List => list(service, output).await,
        JobsCommand::Create {
            title,
            company,
            location,
            employment_type,
            experience,
            tags,
            description,
            description_file,
        } => {
            let description = match description_file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read file: {}", path))?,
                None => description.unwrap_or_default(),
            };
            let form = NewJob {
                title,
                company,
                location,
                employment_type,
                experience,
                tags,
                description,
            };
            create(service, output, quiet, form).await
        }
        JobsCommand::Block { job_id } => set_blocked(service, output, quiet, &job_id, true).await,
        JobsCommand::Unblock { job_id } => {
            set_blocked(service, output, quiet, &job_id, false).await
        }
    }
}

async fn list(service: &SessionService, output: OutputFormat) -> Result<()> {
    let jobs = service
        .jobs()
        .fetch()
        .await
        .context("Failed to fetch jobs")?;

    if output.is_text() {
        if jobs.is_empty() {
            println!("No jobs found");
            return Ok(());
        }
        print_records(&jobs, COLUMNS);
    } else {
        output.print_value(&jobs)?;
    }

    Ok(())
}

async fn create(
    service: &SessionService,
    output: OutputFormat,
    quiet: bool,
    form: NewJob,
) -> Result<()> {
    let response = service
        .jobs()
        .create(&form)
        .await
        .context("Failed to create job")?;

    if output.is_text() {
        if !quiet {
            println!("Created job: {}", form.title);
            print_field("Company", &form.company);
            print_field("Location", &form.location);
        }
    } else {
        output.print_value(&response)?;
    }

    Ok(())
}

async fn set_blocked(
    service: &SessionService,
    output: OutputFormat,
    quiet: bool,
    job_id: &str,
    blocked: bool,
) -> Result<()> {
    let response = service
        .jobs()
        .set_blocked(job_id, blocked)
        .await
        .context("Failed to update job status")?;

    if output.is_text() {
        if !quiet {
            let verb = if blocked { "Blocked" } else { "Unblocked" };
            println!("{} job {}", verb, job_id);
        }
    } else {
        output.print_value(&response)?;
    }

    Ok(())
}
