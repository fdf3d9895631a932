//! Polling core for the homework review notifier.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the
//! homework-status API and the Telegram bot API without touching the network
//! (host-does-IO pattern). The host supplies a `Transport`; everything else,
//! including the poll loop itself, is deterministic and testable.
//!
//! # Design
//! - `PracticumClient` and `TelegramClient` are stateless: `build_*` produces
//!   a request, `parse_*` consumes a response.
//! - `check_response` and `parse_status` work on `serde_json::Value` so that a
//!   wrong shape and a missing key stay distinguishable.
//! - `Poller` owns the only mutable state (cursor, last error) and is driven
//!   by a `Scheduler`, so tests run cycles without sleeping.

pub mod config;
pub mod error;
pub mod http;
pub mod notifier;
pub mod poller;
pub mod practicum;
pub mod response;
pub mod schedule;
pub mod status;
pub mod telegram;

pub use config::{Config, ConfigError};
pub use error::{Error, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use notifier::Notifier;
pub use poller::{CycleOutcome, Poller};
pub use practicum::PracticumClient;
pub use response::{check_response, current_date, parse_status};
pub use schedule::{now_unix, Scheduler, ThreadSleep};
pub use status::HomeworkStatus;
pub use telegram::TelegramClient;
