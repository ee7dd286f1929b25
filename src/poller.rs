//! The poll-validate-diff-notify cycle.
//!
//! [`PollLoop::tick`] runs exactly one iteration; [`PollLoop::run`] schedules
//! ticks on a fixed interval until the shutdown flag flips. Every iteration
//! failure is logged and retried after the same interval with the same
//! watermark.
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument};

use crate::config::Config;
use crate::error::PollError;
use crate::interpret::{has_changed, parse_status};
use crate::model::{StatusMessage, Watermark};
use crate::notify::Notifier;
use crate::practicum::StatusSource;
use crate::validate::{check_response, current_date};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new status was delivered.
    Notified(StatusMessage),
    /// The newest status matches the last delivered one.
    Unchanged,
}

pub struct PollLoop {
    source: Arc<dyn StatusSource>,
    notifier: Arc<dyn Notifier>,
    watermark: Watermark,
    last_status: Option<StatusMessage>,
    retry_interval: Duration,
    advance_watermark: bool,
}

impl PollLoop {
    pub fn new(
        source: Arc<dyn StatusSource>,
        notifier: Arc<dyn Notifier>,
        watermark: Watermark,
    ) -> Self {
        Self {
            source,
            notifier,
            watermark,
            last_status: None,
            retry_interval: Duration::from_secs(crate::config::DEFAULT_RETRY_INTERVAL_SECS),
            advance_watermark: false,
        }
    }

    pub fn from_config(
        cfg: &Config,
        source: Arc<dyn StatusSource>,
        notifier: Arc<dyn Notifier>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(
            source,
            notifier,
            Watermark::lookback_from(now, cfg.app.lookback_days),
        )
        .with_retry_interval(cfg.retry_interval())
        .with_advance_watermark(cfg.app.advance_watermark)
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn with_advance_watermark(mut self, advance: bool) -> Self {
        self.advance_watermark = advance;
        self
    }

    pub fn watermark(&self) -> Watermark {
        self.watermark
    }

    pub fn last_status(&self) -> Option<&StatusMessage> {
        self.last_status.as_ref()
    }

    /// One fetch → validate → interpret → compare → notify pass.
    ///
    /// `last_status` only changes after the notifier confirmed delivery, so a
    /// failed send is retried on the next tick.
    #[instrument(skip_all, fields(watermark = self.watermark.timestamp()))]
    pub async fn tick(&mut self) -> Result<TickOutcome, PollError> {
        let payload = self.source.fetch(self.watermark).await?;
        let homeworks = check_response(&payload)?;
        let newest = homeworks.first().ok_or(PollError::EmptyResult)?;
        let message = parse_status(newest)?;

        let outcome = if has_changed(&message, self.last_status.as_ref()) {
            self.notifier.notify(message.as_str()).await?;
            self.last_status = Some(message.clone());
            TickOutcome::Notified(message)
        } else {
            debug!("homework status unchanged");
            TickOutcome::Unchanged
        };

        if self.advance_watermark {
            if let Some(ts) = current_date(&payload) {
                if self.watermark.advance_to(ts) {
                    info!(watermark = ts, "advanced watermark");
                }
            }
        }

        Ok(outcome)
    }

    /// Tick until `shutdown` becomes `true` or its sender is dropped. The wait
    /// between ticks is the only point where shutdown is observed.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            watermark = self.watermark.timestamp(),
            interval_secs = self.retry_interval.as_secs(),
            "starting homework status poller"
        );
        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.tick().await {
                Ok(TickOutcome::Notified(message)) => info!(%message, "status change delivered"),
                Ok(TickOutcome::Unchanged) => {}
                Err(err) => log_failure(&err),
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = tokio::time::sleep(self.retry_interval) => {}
            }
        }
        info!("homework status poller stopped");
    }
}

fn log_failure(err: &PollError) {
    match err {
        PollError::EmptyResult => info!(kind = err.kind(), "no homework updates: {err}"),
        _ => error!(kind = err.kind(), "poll iteration failed: {err}"),
    }
}
