//! The poll loop: fetch, validate, parse, notify, wait, repeat.
//!
//! # Design
//! `Poller` is the sole owner of the two pieces of process state, the
//! timestamp cursor and the last reported error. `run_cycle` performs exactly
//! one cycle and never fails; every cycle error is logged, relayed to the
//! chat unless it repeats the previous cycle's error, and folded into the
//! returned `CycleOutcome`. `run` paces cycles with a `Scheduler`.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::http::Transport;
use crate::notifier::Notifier;
use crate::practicum::PracticumClient;
use crate::response::{check_response, current_date, parse_status};
use crate::schedule::Scheduler;
use crate::telegram::TelegramClient;

/// What a single cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The response carried no homework updates.
    Idle,
    /// A status change was delivered.
    Notified(String),
    /// A status change was found but the chat could not be reached.
    Undelivered(String),
    /// The cycle failed. `reported` is false when the error repeated the
    /// previous cycle's and no notification was attempted.
    Failed { error: Error, reported: bool },
}

pub struct Poller<T> {
    client: PracticumClient,
    notifier: Notifier,
    transport: T,
    interval: Duration,
    cursor: i64,
    last_error: Option<String>,
}

impl<T: Transport> Poller<T> {
    /// Create a poller whose first request asks for updates since `start`.
    pub fn new(config: &Config, transport: T, start: i64) -> Self {
        Self {
            client: PracticumClient::new(&config.endpoint, &config.practicum_token),
            notifier: Notifier::new(
                TelegramClient::new(&config.telegram_api_url, &config.telegram_token),
                &config.telegram_chat_id,
            ),
            transport,
            interval: config.retry_interval,
            cursor: start,
            last_error: None,
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Run cycles until `scheduler` breaks. In production it never does.
    pub fn run<S: Scheduler>(&mut self, scheduler: &mut S) {
        info!(
            endpoint = self.client.endpoint(),
            chat_id = self.notifier.chat_id(),
            interval_secs = self.interval.as_secs(),
            "poll loop started"
        );
        loop {
            self.run_cycle();
            if scheduler.wait(self.interval).is_break() {
                break;
            }
        }
        info!("poll loop stopped");
    }

    pub fn run_cycle(&mut self) -> CycleOutcome {
        info!(from_date = self.cursor, "poll cycle started");
        match self.poll() {
            Ok(outcome) => {
                self.last_error = None;
                outcome
            }
            Err(err) => self.report(err),
        }
    }

    fn poll(&mut self) -> Result<CycleOutcome, Error> {
        let request = self.client.build_homework_statuses(self.cursor);
        let response = self.transport.execute(&request)?;
        let body = self.client.parse_homework_statuses(response)?;
        let homeworks = check_response(&body)?;
        debug!(count = homeworks.len(), "homework updates received");

        let outcome = match homeworks.first() {
            None => CycleOutcome::Idle,
            Some(latest) => {
                let message = parse_status(latest)?;
                if !self.notifier.notify(&self.transport, &message) {
                    warn!(cursor = self.cursor, "status change not delivered, cursor kept");
                    return Ok(CycleOutcome::Undelivered(message));
                }
                CycleOutcome::Notified(message)
            }
        };

        if let Some(date) = current_date(&body) {
            self.advance(date);
        }
        Ok(outcome)
    }

    fn advance(&mut self, date: i64) {
        if date < self.cursor {
            warn!(cursor = self.cursor, current_date = date, "server date is behind cursor, keeping cursor");
            return;
        }
        self.cursor = date;
    }

    fn report(&mut self, err: Error) -> CycleOutcome {
        let message = format!("Program failure: {err}");
        error!(kind = ?err.kind(), error = %err, "poll cycle failed");

        let reported = self.last_error.as_deref() != Some(message.as_str());
        if reported {
            self.notifier.notify(&self.transport, &message);
            self.last_error = Some(message);
        } else {
            debug!("same error as previous cycle, not notifying");
        }
        CycleOutcome::Failed { error: err, reported }
    }
}
