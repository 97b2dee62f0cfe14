//! Integration tests for the booking session
//!
//! These drive the full path: text line → parser → store → reducer →
//! broadcast reply → rendered output.

use booking::config::SessionConfig;
use booking::{BookingApp, BookingError, BookingState, Reply};
use seatmap_testing::test_clock;
use std::sync::Arc;

fn new_app() -> BookingApp {
    BookingApp::new(&SessionConfig::default(), Arc::new(test_clock()))
}

async fn transcript(app: &BookingApp, input: &str) -> String {
    let mut output = Vec::new();
    let result = app.run(input.as_bytes(), &mut output).await;
    assert!(result.is_ok(), "session failed: {result:?}");
    String::from_utf8_lossy(&output).into_owned()
}

#[tokio::test]
async fn test_scripted_session() {
    let app = new_app();
    let input = "\
12
add-screen Screen1 12 10 4 5 8 9
add-screen Screen2 20 25 3 4 12 13 17 18
reserve-seat Screen1 4 5 6 7
reserve-seat Screen2 13 6 7 8 9 10
reserve-seat Screen2 13 4 5 6
get-unreserved-seats Screen2 13
suggest-contiguous-seats Screen1 3 3 4
suggest-contiguous-seats Screen2 4 12 4
suggest-contiguous-seats Screen2 4 10 3
get-unreserved-seats Screen3 1
reserve-seat Screen1 13 1
suggest-contiguous-seats Screen1 2 4 7
";

    let expected = "\
success
success
success
success
failure
1 2 3 4 5 11 12 13 14 15 16 17 18 19 20 21 22 23 24 25
2 3 4
4 5 6 7
none
failure
failure
none
";

    assert_eq!(transcript(&app, input).await, expected);
}

#[tokio::test]
async fn test_malformed_lines_answer_failure() {
    let app = new_app();
    let input = "\
6
add-screen Screen1 2 6 1 6
add-screen Screen1 2 6 1 6
add-screen Bad 2 10 5
reserve-seat Screen1 1 -2
suggest-contiguous-seats Screen1 0 1 3
cancel-seat Screen1 1 1
";

    assert_eq!(
        transcript(&app, input).await,
        "success\nfailure\nfailure\nfailure\nfailure\nfailure\n"
    );
}

#[tokio::test]
async fn test_oversized_screen_answers_failure_and_session_continues() {
    let app = new_app();
    let input = "\
3
add-screen Big 4294967295 4294967295 1
add-screen Small 2 4 1 4
get-unreserved-seats Small 1
";

    assert_eq!(transcript(&app, input).await, "failure\nsuccess\n1 2 3 4\n");
}

#[tokio::test]
async fn test_blank_lines_before_count_header_skipped() {
    let app = new_app();
    let input = "\n  \n2\nadd-screen S 1 3 1\nget-unreserved-seats S 1\n";

    assert_eq!(transcript(&app, input).await, "success\n1 2 3\n");
}

#[tokio::test]
async fn test_header_limits_commands_read() {
    let app = new_app();
    let input = "1\nadd-screen S 1 3 1\nget-unreserved-seats S 1\n";

    assert_eq!(transcript(&app, input).await, "success\n");
}

#[tokio::test]
async fn test_left_preference_and_aisle_boundary() {
    let app = new_app();
    let _ = app.execute("add-screen Open 1 10 1 10").await;
    let _ = app.execute("add-screen Split 1 10 5 6").await;

    assert_eq!(
        app.execute("suggest-contiguous-seats Open 3 1 5").await.ok(),
        Some(Reply::Seats(vec![3, 4, 5]))
    );
    assert_eq!(
        app.execute("suggest-contiguous-seats Split 3 1 6").await.ok(),
        Some(Reply::Seats(vec![6, 7, 8]))
    );
}

#[tokio::test]
async fn test_concurrent_reservations_are_exclusive() {
    let app = Arc::new(new_app());
    let _ = app.execute("add-screen Screen1 1 10 1 10").await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let app = Arc::clone(&app);
            tokio::spawn(async move { app.execute("reserve-seat Screen1 1 4 5").await })
        })
        .collect();

    let mut successes = 0;
    let mut taken = 0;
    for handle in handles {
        match handle.await {
            Ok(Ok(Reply::Success)) => successes += 1,
            Ok(Ok(Reply::Failure(BookingError::SeatTaken { .. }))) => taken += 1,
            other => unreachable!("unexpected outcome: {other:?}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(taken, 7);
    assert_eq!(
        app.execute("get-unreserved-seats Screen1 1").await.ok(),
        Some(Reply::Seats(vec![1, 2, 3, 6, 7, 8, 9, 10]))
    );
}

#[tokio::test]
async fn test_replayed_journal_restores_session() {
    let app = new_app();
    let _ = app.execute("add-screen Screen1 3 8 1 8").await;
    let _ = app.execute("reserve-seat Screen1 2 3 4").await;
    let _ = app.execute("reserve-seat Screen1 2 4 5").await;
    let _ = app.execute("reserve-seat Screen1 3 8").await;

    let rebuilt = BookingState::from_events(&app.journal().await);
    assert!(rebuilt.is_ok());
    let restored = BookingApp::with_state(
        &SessionConfig::default(),
        Arc::new(test_clock()),
        rebuilt.unwrap_or_default(),
    );

    for row in 1..=3 {
        let line = format!("get-unreserved-seats Screen1 {row}");
        assert_eq!(app.respond(&line).await, restored.respond(&line).await);
    }
    assert_eq!(restored.respond("add-screen Screen1 1 1 1").await, "failure");
}
