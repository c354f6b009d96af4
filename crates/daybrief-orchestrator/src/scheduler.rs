use crate::pipeline::PipelineRunner;
use chrono::{DateTime, Utc};
use cron::Schedule;
use daybrief_core::{DaybriefError, DaybriefResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// When digest runs fire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// 6-field (sec min hour dom month dow) or 7-field (with year) cron
    /// expression, evaluated in UTC.
    #[serde(default = "default_cron")]
    pub cron: String,
    /// Run once immediately when the scheduler starts.
    #[serde(default = "default_run_on_startup")]
    pub run_on_startup: bool,
}

fn default_cron() -> String {
    "0 */5 * * * *".to_string()
}

fn default_run_on_startup() -> bool {
    true
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: default_cron(),
            run_on_startup: default_run_on_startup(),
        }
    }
}

/// Cron-based trigger for [`PipelineRunner`].
///
/// Each run is awaited before the next fire time is computed, so runs never
/// overlap. Fire times that pass while a run is in progress are skipped.
#[derive(Debug)]
pub struct Scheduler {
    schedule: Schedule,
    run_on_startup: bool,
}

impl Scheduler {
    /// Build a scheduler, rejecting invalid cron expressions.
    pub fn new(config: &ScheduleConfig) -> DaybriefResult<Self> {
        Ok(Self {
            schedule: Self::parse_cron(&config.cron)?,
            run_on_startup: config.run_on_startup,
        })
    }

    /// Parse a cron expression string into a [`cron::Schedule`].
    pub fn parse_cron(cron_expr: &str) -> DaybriefResult<Schedule> {
        Schedule::from_str(cron_expr).map_err(|e| {
            DaybriefError::Config(format!("Invalid cron expression '{cron_expr}': {e}"))
        })
    }

    /// The first fire time strictly after `after`.
    pub fn next_fire_after(&self, after: DateTime<Utc>) -> DaybriefResult<DateTime<Utc>> {
        self.schedule.after(&after).next().ok_or_else(|| {
            DaybriefError::Config("Cron schedule has no upcoming fire times".into())
        })
    }

    /// Start the scheduler background loop.
    ///
    /// Spawns a tokio task that optionally runs once at startup, then sleeps
    /// until each fire time and runs the pipeline. The task ends only if the
    /// schedule runs out of fire times; abort the handle to stop it.
    pub fn start(self, runner: Arc<PipelineRunner>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            if self.run_on_startup {
                tracing::info!("Scheduler: running at startup");
                fire(&runner).await;
            }

            loop {
                let now = Utc::now();
                let next = match self.next_fire_after(now) {
                    Ok(t) => t,
                    Err(e) => {
                        tracing::error!("Scheduler: stopping, {e}");
                        return;
                    }
                };

                let wait = (next - now).to_std().unwrap_or_default();
                tracing::info!("Scheduler: next run at {next} (in {wait:?})");
                tokio::time::sleep(wait).await;

                fire(&runner).await;
            }
        })
    }
}

/// Run the pipeline once and log the outcome. Errors end the run, not the loop.
async fn fire(runner: &PipelineRunner) {
    match runner.run().await {
        Ok(report) if report.failed() > 0 => {
            tracing::warn!(
                failed = report.failed(),
                delivered = report.delivered(),
                "Scheduler: run finished with channel failures"
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!(error = %e, "Scheduler: run failed");
        }
    }
}
