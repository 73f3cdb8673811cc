use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::api::HomeworkSource;
use crate::error::{BotError, BotResult};
use crate::homework::{check_response, parse_status};
use crate::platform::Notifier;

/// Time source and sleeper for the poll loop.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in seconds.
    fn now(&self) -> i64;
    async fn sleep(&self, period: Duration);
}

pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }

    async fn sleep(&self, period: Duration) {
        tokio::time::sleep(period).await;
    }
}

/// What a single cycle ended with.
#[derive(Debug)]
pub enum CycleOutcome {
    /// A new status message was delivered.
    Notified,
    /// The newest status formats to the message already delivered.
    Unchanged,
    /// The API reported no homework since the cursor.
    NoUpdates,
    Failed(BotError),
}

/// Polls the homework API and relays status changes to one chat.
pub struct Poller<S, N, C> {
    source: S,
    notifier: N,
    clock: C,
    chat_id: String,
    retry_period: Duration,
    cursor: i64,
    last_message: String,
}

impl<S, N, C> Poller<S, N, C>
where
    S: HomeworkSource,
    N: Notifier,
    C: Clock,
{
    pub fn new(source: S, notifier: N, clock: C, chat_id: &str, retry_period: Duration) -> Self {
        let cursor = clock.now();
        Self {
            source,
            notifier,
            clock,
            chat_id: chat_id.to_string(),
            retry_period,
            cursor,
            last_message: String::new(),
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    #[cfg(test)]
    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    /// Poll forever. Only killing the process stops this.
    pub async fn run(&mut self) {
        info!(
            "Polling for homework updates every {}s, starting from {}",
            self.retry_period.as_secs(),
            self.cursor()
        );
        loop {
            self.tick().await;
        }
    }

    /// One cycle followed by the retry-period sleep.
    pub async fn tick(&mut self) -> CycleOutcome {
        let outcome = self.run_cycle().await;
        if let CycleOutcome::Failed(err) = &outcome {
            debug!(
                "Retrying in {}s after failure: {}",
                self.retry_period.as_secs(),
                err
            );
        }
        self.clock.sleep(self.retry_period).await;
        outcome
    }

    /// Fetch, validate, format and notify once. Failures are reported to
    /// the chat and never escape.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.poll().await {
            Ok(outcome) => outcome,
            Err(err) => {
                self.report_failure(&err).await;
                CycleOutcome::Failed(err)
            }
        }
    }

    async fn poll(&mut self) -> BotResult<CycleOutcome> {
        let raw = self.source.fetch(self.cursor).await?;
        let response = check_response(&raw)?;

        self.cursor = response.current_date;
        info!("Cursor moved to {}", self.cursor);

        let Some(newest) = response.homeworks.first() else {
            debug!("No new homework statuses");
            return Ok(CycleOutcome::NoUpdates);
        };

        let message = parse_status(newest)?;
        if message == self.last_message {
            debug!("Homework status unchanged");
            return Ok(CycleOutcome::Unchanged);
        }

        self.notifier.send(&self.chat_id, &message).await?;
        self.last_message = message;
        Ok(CycleOutcome::Notified)
    }

    async fn report_failure(&self, err: &BotError) {
        error!("Homework poll failed: {}", err);

        let message = format!("Сбой в работе программы: {}", err);
        if let Err(e) = self.notifier.send(&self.chat_id, &message).await {
            error!("Could not report failure to chat: {}", e);
        }
    }
}
