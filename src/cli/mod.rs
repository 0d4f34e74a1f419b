//! `budget_report`: prints a user's month and year reports as JSON.

use std::path::PathBuf;

use chrono::Datelike;
use serde::Serialize;

use crate::config::{Config, ConfigManager};
use crate::core::services::AdvisorSummary;
use crate::core::{BudgetSession, Clock, SystemClock};
use crate::domain::common::UserId;
use crate::domain::summary::{MonthlyReport, YearReport};
use crate::errors::{BudgetError, Result};
use crate::storage::JsonStore;
use crate::utils::build_info;

pub const USAGE: &str =
    "usage: budget_report <store_dir> <user_id> [YYYY-MM]\n       budget_report --version";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Version,
    Report {
        store_dir: PathBuf,
        user_id: UserId,
        period: Option<(i32, u32)>,
    },
}

#[derive(Debug, Serialize)]
pub struct ReportOutput {
    pub user_id: UserId,
    pub degraded: bool,
    pub month: MonthlyReport,
    pub year: YearReport,
    pub advisor: AdvisorSummary,
}

pub fn parse_args<I, S>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args: Vec<String> = args.into_iter().map(|arg| arg.as_ref().to_string()).collect();
    match args.as_slice() {
        [flag] if flag == "--version" || flag == "-V" => Ok(Command::Version),
        [store_dir, user_id, rest @ ..] if rest.len() <= 1 => {
            let user_id = user_id
                .parse::<UserId>()
                .map_err(|_| BudgetError::InvalidInput(format!("`{user_id}` is not a user id")))?;
            let period = rest.first().map(|raw| parse_period(raw)).transpose()?;
            Ok(Command::Report {
                store_dir: PathBuf::from(store_dir),
                user_id,
                period,
            })
        }
        _ => Err(BudgetError::InvalidInput(USAGE.into())),
    }
}

/// Parses `YYYY-MM`.
pub fn parse_period(raw: &str) -> Result<(i32, u32)> {
    let invalid = || BudgetError::InvalidInput(format!("`{raw}` is not a YYYY-MM month"));
    let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

/// Builds the report for one user without printing it.
pub fn build_report(
    store_dir: PathBuf,
    user_id: UserId,
    period: Option<(i32, u32)>,
    config: Config,
    clock: Box<dyn Clock>,
) -> Result<ReportOutput> {
    let today = clock.today();
    let (year, month) = period.unwrap_or((today.year(), today.month()));
    let store = JsonStore::new(Some(store_dir))?;
    let session = BudgetSession::open(Box::new(store), clock, config, user_id);
    if session.is_degraded() {
        tracing::warn!(user_id, "store unreadable, reporting local defaults");
    }
    Ok(ReportOutput {
        user_id,
        degraded: session.is_degraded(),
        month: session.month_report(year, month),
        year: session.year_report(year),
        advisor: session.advisor_summary(year, month),
    })
}

pub fn run<I, S>(args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match parse_args(args)? {
        Command::Version => Ok(build_info::current().summary()),
        Command::Report {
            store_dir,
            user_id,
            period,
        } => {
            let config = ConfigManager::new()?.load()?;
            let report = build_report(store_dir, user_id, period, config, Box::new(SystemClock))?;
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

pub fn run_cli() -> Result<()> {
    let output = run(std::env::args().skip(1))?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_arguments() {
        let command = parse_args(["store", "7", "2024-02"]).expect("valid args");
        assert_eq!(
            command,
            Command::Report {
                store_dir: PathBuf::from("store"),
                user_id: 7,
                period: Some((2024, 2)),
            }
        );
        assert_eq!(parse_args(["--version"]).expect("flag"), Command::Version);
    }

    #[test]
    fn rejects_bad_periods_and_ids() {
        assert!(parse_period("2024-13").is_err());
        assert!(parse_period("March").is_err());
        assert!(matches!(
            parse_args(["store", "bob"]),
            Err(BudgetError::InvalidInput(_))
        ));
        assert!(parse_args(Vec::<String>::new()).is_err());
    }
}
