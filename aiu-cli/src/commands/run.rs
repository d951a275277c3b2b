//! Process one work order against one ArchivesSpace environment.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use aiu_aspace::AspaceClient;
use aiu_core::{config, MissingTargetPolicy, RowStatus, RunMode};
use aiu_reconcile::pipeline::{self, Progress, Step};
use aiu_reconcile::{DriverOptions, RejectedLine, RowReport};

use super::report;

/// Arguments for a work order run.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Tab-delimited work order file.
    #[arg(short, long, value_name = "PATH")]
    pub workorder: PathBuf,

    /// Environment name from the config file.
    #[arg(short, long, value_name = "NAME")]
    pub environment: String,

    /// Compute every change and write the audit log, but persist nothing.
    #[arg(long)]
    pub test: bool,

    /// Apply the work order in reverse (after values back to before values).
    #[arg(long)]
    pub undo: bool,

    /// What to do when a target barcode has no top container in the resource.
    #[arg(long, value_name = "POLICY")]
    pub missing_target: Option<MissingTargetPolicy>,

    /// Environment file (default: ~/.aspace-instance-update/config.yaml).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Audit log path (default: AIU-<work order name> next to the work order).
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Print only a machine-readable JSON summary.
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let mut steps = Steps {
            n: 0,
            quiet: self.json,
        };
        let prefix = mode_prefix(self.test, self.undo);

        steps.print(format!("opening work order {}", self.workorder.display()));
        if !self.workorder.is_file() {
            bail!("work order not found: {}", self.workorder.display());
        }

        let config = match &self.config {
            Some(path) => config::load_at(path),
            None => config::load(),
        }
        .context("failed to load environment config")?;
        let env = config
            .environment(&self.environment)
            .context("failed to select environment")?;
        steps.print(format!(
            "using environment '{}' from {}",
            self.environment,
            config.source().display()
        ));
        let missing_target = self
            .missing_target
            .or(env.missing_target)
            .unwrap_or_default();

        steps.print(format!("connecting to {} as {}", env.url, env.username));
        let client = AspaceClient::connect(env)
            .with_context(|| format!("could not log in to '{}'", self.environment))?;

        let options = DriverOptions {
            mode: RunMode::new(self.test, self.undo),
            missing_target,
        };
        let audit_path = self
            .log
            .clone()
            .unwrap_or_else(|| pipeline::default_audit_path(&self.workorder));

        let quiet = self.json;
        let summary = pipeline::run(&client, &self.workorder, &audit_path, options, |p| match p {
            Progress::Step(step) => steps.print(step_label(&step)),
            _ if quiet => {}
            Progress::Rejected(line) => print_rejected(&prefix, line),
            Progress::IndexBuilt { containers } => {
                println!("   {containers} top containers indexed by barcode")
            }
            Progress::Row(row) => print_row(&prefix, row),
        })
        .with_context(|| format!("run failed for {}", self.workorder.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("failed to serialize summary")?
            );
            return Ok(());
        }
        report::print_summary(&summary, options, &audit_path);
        Ok(())
    }
}

struct Steps {
    n: usize,
    quiet: bool,
}

impl Steps {
    fn print(&mut self, label: String) {
        self.n += 1;
        if !self.quiet {
            println!("{}. {label}", self.n);
        }
    }
}

fn step_label(step: &Step) -> String {
    match step {
        Step::CreatingLog(path) => format!("creating audit log {}", path.display()),
        Step::ParsingWorkOrder => "parsing work order".to_string(),
        Step::ResolvingResource => "resolving repository and resource ids".to_string(),
        Step::FetchingContainers => "fetching top containers for resource".to_string(),
        Step::Updating => "updating archival objects".to_string(),
    }
}

fn mode_prefix(test: bool, undo: bool) -> String {
    let mut prefix = String::new();
    if test {
        prefix.push_str("[test] ");
    }
    if undo {
        prefix.push_str("[undo] ");
    }
    prefix
}

pub(crate) fn status_word(status: RowStatus) -> String {
    let word = status.to_string();
    match status {
        RowStatus::Success => word.green().bold().to_string(),
        RowStatus::Error => word.red().bold().to_string(),
        RowStatus::Skipped => word.yellow().bold().to_string(),
    }
}

fn print_rejected(prefix: &str, line: &RejectedLine) {
    println!(
        "{prefix}{} {}",
        status_word(RowStatus::Skipped),
        line.message()
    );
}

fn print_row(prefix: &str, row: &RowReport) {
    let o = &row.outcome;
    let status = status_word(o.status);
    if row.mutation.is_none() && o.barcode_before.is_empty() {
        println!("{prefix}{status} {}: {}", o.object_uri, row.message);
        return;
    }
    println!(
        "{prefix}{status} {} barcode {} -> {}, indicator 2 {} -> {}: {}",
        o.object_uri,
        or_none(&o.barcode_before),
        or_none(&o.barcode_after),
        or_none(&o.indicator_before),
        or_none(&o.indicator_after),
        row.message
    );
}

fn or_none(value: &str) -> &str {
    if value.is_empty() {
        "(none)"
    } else {
        value
    }
}
