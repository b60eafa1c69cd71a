use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::api::StatusSource;
use crate::engine::{current_date, latest_message};
use crate::error::{BotError, Result};
use crate::reporter::Notifier;
use crate::state::PollState;

/// Prefix of the notification sent when a poll fails.
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// What a single poll iteration ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new message (status change or failure) was delivered.
    Sent,
    /// The message matched the last delivered one; nothing was sent.
    Unchanged,
    /// The answer had no submissions.
    NoUpdates,
    /// Delivering the message failed; it will be retried next iteration.
    SendFailed,
}

/// Notification text for a failed poll.
pub fn failure_message(err: &BotError) -> String {
    format!("{FAILURE_PREFIX}: {err}")
}

/// Fetch → validate → format → notify loop for a single user.
pub struct Poller<S, N> {
    source: S,
    notifier: N,
    poll_interval: Duration,
    state: PollState,
}

impl<S: StatusSource, N: Notifier> Poller<S, N> {
    pub fn new(source: S, notifier: N, poll_interval: Duration, state: PollState) -> Self {
        Self {
            source,
            notifier,
            poll_interval,
            state,
        }
    }

    /// Fetch the latest answer and build the message for its first submission.
    ///
    /// The cursor advances as soon as the fetch succeeds, even if the answer
    /// then fails validation.
    async fn check(&mut self) -> Result<Option<String>> {
        let response = self.source.fetch(self.state.cursor).await?;
        self.state.advance_cursor(current_date(&response));
        latest_message(&response)
    }

    /// Send `message` unless it equals the last delivered one.
    ///
    /// Returns whether a send happened. A failed send leaves the dedup memory
    /// untouched and is returned to the caller.
    pub async fn notify(&mut self, message: String) -> Result<bool> {
        if !self.state.is_new(&message) {
            debug!("Message unchanged, not sending");
            return Ok(false);
        }
        self.notifier.send_message(&message).await?;
        debug!("Message sent");
        self.state.mark_sent(message);
        Ok(true)
    }

    /// Run one poll iteration. Never fails: every error becomes a notification.
    pub async fn poll_cycle(&mut self) -> CycleOutcome {
        self.state.total_polls += 1;
        debug!(
            "Polling (#{}) from_date={}",
            self.state.total_polls, self.state.cursor
        );

        let message = match self.check().await {
            Ok(Some(message)) => {
                debug!("Latest status: {message}");
                message
            }
            Ok(None) => return CycleOutcome::NoUpdates,
            Err(e) => {
                let message = failure_message(&e);
                if self.state.is_new(&message) {
                    error!("{message}");
                } else {
                    debug!("Repeated failure: {message}");
                }
                message
            }
        };

        match self.notify(message).await {
            Ok(true) => CycleOutcome::Sent,
            Ok(false) => CycleOutcome::Unchanged,
            Err(e) => {
                warn!("Notification not delivered: {e}");
                CycleOutcome::SendFailed
            }
        }
    }

    /// Poll forever, sleeping a fixed interval after each iteration.
    /// Returns when Ctrl+C is received.
    pub async fn run(&mut self) {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl+C, polling until killed: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Poll until `shutdown` resolves. Every iteration is followed by a full
    /// `poll_interval` sleep, however long the poll itself took.
    pub async fn run_until(&mut self, shutdown: impl Future<Output = ()>) {
        info!(
            "Entering polling loop (interval: {}s). Press Ctrl+C to stop.",
            self.poll_interval.as_secs()
        );
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                outcome = self.poll_cycle() => debug!("Poll finished: {outcome:?}"),
            }
            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        info!(
            "Shutdown signal received after {} poll(s), {} message(s) sent",
            self.state.total_polls, self.state.total_sent
        );
    }
}
