use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use reqwest::StatusCode;
use tracing::debug;

use crate::api::gateway::AuthGateway;
use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::models::script::{LogEntry, Script};

pub const DEFAULT_LOOKBACK_HOURS: i64 = 1;
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailState {
    CatchingUp,
    Polling,
}

/// Why tailing stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailEnd {
    /// The job was already in a terminal state; no polling happened.
    Finished,
    /// The log endpoint signalled that no more entries will come.
    Stopped,
    /// No token was available, or a 401 survived the refresh retry. Nothing
    /// is printed; the caller asks the user to log in.
    Unauthenticated,
    /// The log endpoint answered with an unexpected status.
    FetchFailed(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailReport {
    pub printed: usize,
    pub polls: usize,
    pub high_water_mark: Option<DateTime<Utc>>,
    pub last_state: TailState,
    pub end: TailEnd,
}

enum PollOutcome {
    Entries(Vec<LogEntry>),
    Stop,
    Unauthenticated,
    Failed(StatusCode),
}

/// Prints the logs of a remote job and follows it until it finishes.
pub struct LogTailer<'a> {
    gateway: &'a AuthGateway,
    lookback: chrono::Duration,
    interval: Duration,
}

impl<'a> LogTailer<'a> {
    pub fn new(gateway: &'a AuthGateway) -> Self {
        Self {
            gateway,
            lookback: chrono::Duration::hours(DEFAULT_LOOKBACK_HOURS),
            interval: POLL_INTERVAL,
        }
    }

    pub fn with_lookback(mut self, lookback: chrono::Duration) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub async fn run<W: Write>(&self, script: &Script, out: &mut W) -> Result<TailReport, AppError> {
        let mut report = TailReport {
            printed: 0,
            polls: 0,
            high_water_mark: None,
            last_state: TailState::CatchingUp,
            end: TailEnd::Finished,
        };

        self.catch_up(script, out, &mut report)?;

        if script.status.is_terminal() {
            debug!("Script {} is {}, not polling", script.id, script.status);
            return Ok(report);
        }

        report.last_state = TailState::Polling;
        loop {
            let start = report
                .high_water_mark
                .map(|hwm| hwm.to_rfc3339_opts(SecondsFormat::AutoSi, false));
            report.polls += 1;

            match self.poll_once(&script.id, start.as_deref()).await? {
                PollOutcome::Entries(entries) => {
                    for entry in &entries {
                        advance(&mut report.high_water_mark, entry);
                        if let Some(ref text) = entry.text {
                            writeln!(out, "{}: {}", entry.register_date, text)?;
                            report.printed += 1;
                        }
                    }
                }
                PollOutcome::Stop => {
                    report.end = TailEnd::Stopped;
                    break;
                }
                PollOutcome::Unauthenticated => {
                    report.end = TailEnd::Unauthenticated;
                    break;
                }
                PollOutcome::Failed(status) => {
                    debug!("Log fetch failed with status {}", status);
                    writeln!(out, "{}", "Error obtaining logs of script.".red())?;
                    report.end = TailEnd::FetchFailed(status.as_u16());
                    break;
                }
            }

            tokio::time::sleep(self.interval).await;
        }

        Ok(report)
    }

    fn catch_up<W: Write>(
        &self,
        script: &Script,
        out: &mut W,
        report: &mut TailReport,
    ) -> Result<(), AppError> {
        let cutoff = Utc::now() - self.lookback;

        for entry in &script.logs {
            let Some(ts) = advance(&mut report.high_water_mark, entry) else {
                continue;
            };
            if ts <= cutoff {
                continue;
            }
            if let Some(ref text) = entry.text {
                writeln!(out, "{}: {}", entry.register_date, text)?;
                report.printed += 1;
            }
        }

        if report.printed == 0 {
            writeln!(out, "No log entries in last {}", describe_window(self.lookback))?;
        }
        Ok(())
    }

    async fn poll_once(&self, id: &str, start: Option<&str>) -> Result<PollOutcome, AppError> {
        let Some(response) = self.gateway.get_script_logs(id, start).await? else {
            return Ok(PollOutcome::Unauthenticated);
        };

        match response.status() {
            StatusCode::OK => {
                let body: ApiResponse<Vec<LogEntry>> = response.json().await?;
                Ok(match body.into_data() {
                    Some(entries) => PollOutcome::Entries(entries),
                    None => PollOutcome::Stop,
                })
            }
            StatusCode::NO_CONTENT => Ok(PollOutcome::Stop),
            StatusCode::UNAUTHORIZED => Ok(PollOutcome::Unauthenticated),
            status => Ok(PollOutcome::Failed(status)),
        }
    }
}

/// Raise the high-water mark to the entry's timestamp, if it has a parsable one.
fn advance(hwm: &mut Option<DateTime<Utc>>, entry: &LogEntry) -> Option<DateTime<Utc>> {
    let ts = entry.timestamp()?;
    if hwm.map_or(true, |current| ts > current) {
        *hwm = Some(ts);
    }
    Some(ts)
}

fn describe_window(window: chrono::Duration) -> String {
    let minutes = window.num_minutes();
    if minutes % 60 == 0 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}m", minutes)
    }
}
