//! End-of-run summary.

use std::path::Path;

use chrono::Local;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use aiu_core::RowStatus;
use aiu_reconcile::driver::TEST_MODE_MESSAGE;
use aiu_reconcile::{DriverOptions, RunSummary};

use super::run::status_word;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "result")]
    result: &'static str,
    #[tabled(rename = "rows")]
    rows: usize,
    #[tabled(rename = "meaning")]
    meaning: &'static str,
}

fn summary_rows(summary: &RunSummary, options: DriverOptions) -> Vec<SummaryRow> {
    let success_meaning = if options.mode.test {
        TEST_MODE_MESSAGE
    } else {
        "updated"
    };
    vec![
        SummaryRow {
            result: "SUCCESS",
            rows: summary.succeeded,
            meaning: success_meaning,
        },
        SummaryRow {
            result: "ERROR",
            rows: summary.failed,
            meaning: "see audit log",
        },
        SummaryRow {
            result: "SKIPPED",
            rows: summary.skipped,
            meaning: "malformed work order line",
        },
        SummaryRow {
            result: "no-op",
            rows: summary.noop,
            meaning: "nothing to change",
        },
    ]
}

pub fn print_summary(summary: &RunSummary, options: DriverOptions, audit_path: &Path) {
    let elapsed = summary.finished_at - summary.started_at;
    println!(
        "Run {} | direction {} | missing targets: {} | {:.1}s",
        summary
            .started_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S"),
        options.direction(),
        options.missing_target,
        elapsed.num_milliseconds() as f64 / 1000.0,
    );

    let mut table = Table::new(summary_rows(summary, options));
    table.with(Style::rounded());
    println!("{table}");

    let headline = if summary.failed > 0 {
        format!("{} row(s) {}", summary.failed, status_word(RowStatus::Error))
    } else {
        "all rows processed".green().to_string()
    };
    println!("{headline}; audit log: {}", audit_path.display());
    if options.mode.test && summary.succeeded > 0 {
        println!("{}", "Test mode: nothing was written to ArchivesSpace.".bright_black());
    }
}
