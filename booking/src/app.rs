//! Session loop: text commands in, one reply line out per command.
//!
//! Each line is parsed into a [`BookingAction`] tagged with a fresh
//! [`RequestId`], sent through the store, and answered by the matching
//! `Replied` action broadcast by the store.

use crate::aggregates::{BookingAction, BookingEnvironment, BookingReducer, BookingState};
use crate::command::{parse_command, ParseError};
use crate::config::SessionConfig;
use crate::types::{Reply, RequestId, FAILURE};
use seatmap_core::environment::Clock;
use seatmap_runtime::{Store, StoreError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Store type driving the booking reducer
pub type BookingStore = Store<BookingState, BookingAction, BookingEnvironment, BookingReducer>;

/// Errors surfaced by the session layer
#[derive(Error, Debug)]
pub enum AppError {
    /// Command line could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Store refused the command or the reply never arrived
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// First input line is not a command count
    #[error("invalid command count: {0:?}")]
    InvalidCommandCount(String),

    /// The store answered with something other than a reply
    #[error("unexpected reply to {request_id}")]
    UnexpectedReply {
        /// Request that was answered
        request_id: RequestId,
    },
}

/// A booking session over a single store
pub struct BookingApp {
    store: BookingStore,
    next_request: AtomicU64,
    reply_timeout: Duration,
    expect_command_count: bool,
}

impl BookingApp {
    /// Creates a session with an empty registry
    #[must_use]
    pub fn new(config: &SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_state(config, clock, BookingState::new())
    }

    /// Creates a session over existing state, e.g. one rebuilt from a journal
    #[must_use]
    pub fn with_state(config: &SessionConfig, clock: Arc<dyn Clock>, state: BookingState) -> Self {
        let store = Store::with_broadcast_capacity(
            state,
            BookingReducer::new(),
            BookingEnvironment::new(clock),
            config.broadcast_capacity,
        );

        Self {
            store,
            next_request: AtomicU64::new(1),
            reply_timeout: config.reply_timeout(),
            expect_command_count: config.expect_command_count,
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &BookingStore {
        &self.store
    }

    /// Events applied so far, oldest first
    pub async fn journal(&self) -> Vec<BookingAction> {
        self.store.state(|s| s.journal.clone()).await
    }

    /// Executes one command line and returns its reply.
    ///
    /// Domain refusals come back as [`Reply::Failure`]; only malformed input
    /// and store problems are errors.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Parse`] for malformed lines and
    /// [`AppError::Store`] if the store is shutting down or the reply does
    /// not arrive within the configured timeout.
    pub async fn execute(&self, line: &str) -> Result<Reply, AppError> {
        let request_id = RequestId::new(self.next_request.fetch_add(1, Ordering::Relaxed));
        let action = parse_command(line, request_id)?;
        tracing::debug!(%request_id, ?action, "Executing command");

        let replied = self
            .store
            .send_and_wait_for(
                action,
                move |a| a.is_reply_to(request_id),
                self.reply_timeout,
            )
            .await?;

        let BookingAction::Replied { reply, .. } = replied else {
            return Err(AppError::UnexpectedReply { request_id });
        };

        if let Reply::Failure(error) = &reply {
            tracing::warn!(%request_id, %error, "Command refused");
        }
        Ok(reply)
    }

    /// Executes one command line and renders the reply as an output line
    pub async fn respond(&self, line: &str) -> String {
        match self.execute(line).await {
            Ok(reply) => reply.to_string(),
            Err(error) => {
                tracing::warn!(%error, line, "Command failed");
                FAILURE.to_string()
            },
        }
    }

    /// Answers commands from `input`, one line of `output` per command.
    ///
    /// When configured to expect a command count, the first non-blank line
    /// holds the number of commands that follow and exactly that many lines are
    /// answered (fewer if input ends early). Otherwise every non-blank line
    /// is answered until end of input.
    ///
    /// Returns the number of commands answered.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCommandCount`] if the count header is
    /// missing or malformed and [`AppError::Io`] if reading or writing fails.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<usize, AppError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();

        let limit = if self.expect_command_count {
            let mut header = String::new();
            while let Some(line) = lines.next_line().await? {
                if !line.trim().is_empty() {
                    header = line;
                    break;
                }
            }
            let header = header.trim();
            let count = header
                .parse::<usize>()
                .map_err(|_| AppError::InvalidCommandCount(header.to_string()))?;
            Some(count)
        } else {
            None
        };
        tracing::info!(?limit, "Session started");

        let mut answered = 0;
        while limit.is_none_or(|n| answered < n) {
            let Some(line) = lines.next_line().await? else {
                if let Some(expected) = limit {
                    tracing::warn!(expected, answered, "Input ended before all commands were read");
                }
                break;
            };

            if limit.is_none() && line.trim().is_empty() {
                continue;
            }

            let reply = self.respond(&line).await;
            output.write_all(reply.as_bytes()).await?;
            output.write_all(b"\n").await?;
            answered += 1;
        }

        output.flush().await?;
        tracing::info!(answered, "Session finished");
        Ok(answered)
    }

    /// Stops accepting commands; later commands fail
    pub fn shutdown(&self) {
        self.store.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookingError;
    use seatmap_testing::test_clock;

    fn app() -> BookingApp {
        BookingApp::new(&SessionConfig::default(), Arc::new(test_clock()))
    }

    #[tokio::test]
    async fn test_execute_replies() {
        let app = app();

        assert_eq!(app.execute("add-screen Screen1 12 10 4 5 8 9").await.ok(), Some(Reply::Success));
        assert_eq!(app.execute("reserve-seat Screen1 4 5 6 7").await.ok(), Some(Reply::Success));
        assert_eq!(
            app.execute("get-unreserved-seats Screen1 4").await.ok(),
            Some(Reply::Seats(vec![1, 2, 3, 4, 8, 9, 10]))
        );
        assert_eq!(
            app.execute("reserve-seat Screen1 4 7").await.ok(),
            Some(Reply::Failure(BookingError::SeatTaken { row: 4, seat: 7 }))
        );
    }

    #[tokio::test]
    async fn test_parse_errors_surface() {
        let app = app();

        assert!(matches!(app.execute("").await, Err(AppError::Parse(ParseError::Empty))));
        assert!(matches!(
            app.execute("frobnicate").await,
            Err(AppError::Parse(ParseError::UnknownCommand(_)))
        ));
        assert_eq!(app.respond("frobnicate").await, "failure");
    }

    #[tokio::test]
    async fn test_shutdown_rejects_commands() {
        let app = app();
        app.shutdown();

        assert!(matches!(
            app.execute("get-unreserved-seats Screen1 1").await,
            Err(AppError::Store(StoreError::ShutdownInProgress))
        ));
        assert_eq!(app.respond("get-unreserved-seats Screen1 1").await, "failure");
    }

    #[tokio::test]
    async fn test_run_with_count_header() {
        let app = app();
        let input = "3\nadd-screen S 2 4 1 4\nreserve-seat S 1 2\nget-unreserved-seats S 1\nget-unreserved-seats S 2\n";
        let mut output = Vec::new();

        let answered = app.run(input.as_bytes(), &mut output).await.ok();

        assert_eq!(answered, Some(3));
        assert_eq!(String::from_utf8_lossy(&output), "success\nsuccess\n1 3 4\n");
    }

    #[tokio::test]
    async fn test_run_blank_line_counts_as_command() {
        let app = app();
        let mut output = Vec::new();

        let answered = app.run("2\n\nadd-screen S 1 1 1\n".as_bytes(), &mut output).await.ok();

        assert_eq!(answered, Some(2));
        assert_eq!(String::from_utf8_lossy(&output), "failure\nsuccess\n");
    }

    #[tokio::test]
    async fn test_run_skips_blank_lines_before_header() {
        let app = app();
        let mut output = Vec::new();

        let answered = app.run("\n\t\n 1 \nadd-screen S 1 1 1\n".as_bytes(), &mut output).await.ok();

        assert_eq!(answered, Some(1));
        assert_eq!(String::from_utf8_lossy(&output), "success\n");
    }

    #[tokio::test]
    async fn test_run_invalid_header() {
        let app = app();
        let mut output = Vec::new();

        assert!(matches!(
            app.run("three\n".as_bytes(), &mut output).await,
            Err(AppError::InvalidCommandCount(header)) if header == "three"
        ));
        assert!(matches!(
            app.run("".as_bytes(), &mut output).await,
            Err(AppError::InvalidCommandCount(_))
        ));
        assert!(matches!(
            app.run("\n \n".as_bytes(), &mut output).await,
            Err(AppError::InvalidCommandCount(header)) if header.is_empty()
        ));
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_run_without_header() {
        let config = SessionConfig {
            expect_command_count: false,
            ..SessionConfig::default()
        };
        let app = BookingApp::new(&config, Arc::new(test_clock()));
        let mut output = Vec::new();

        let answered = app
            .run("add-screen S 1 5 1\n\n  \nsuggest-contiguous-seats S 2 1 3\n".as_bytes(), &mut output)
            .await
            .ok();

        assert_eq!(answered, Some(2));
        assert_eq!(String::from_utf8_lossy(&output), "success\n2 3\n");
    }

    #[tokio::test]
    async fn test_journal_records_mutations_only() {
        let app = app();
        let _ = app.execute("add-screen S 2 4 1 4").await;
        let _ = app.execute("reserve-seat S 1 2 3").await;
        let _ = app.execute("reserve-seat S 1 3").await;
        let _ = app.execute("get-unreserved-seats S 1").await;

        let journal = app.journal().await;
        assert_eq!(journal.len(), 2);
        assert!(matches!(journal[0], BookingAction::ScreenAdded { .. }));
        assert!(matches!(journal[1], BookingAction::SeatsReserved { .. }));
    }
}
