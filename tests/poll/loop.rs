use dlws_rs::{DlError, Envelope, PollConfig, Poller};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

const INTERVAL: Duration = Duration::from_secs(5);

type Answer = Result<Option<Envelope>, DlError>;

fn poller(attempts: u32) -> Poller {
    Poller::new(PollConfig::new(attempts, INTERVAL, Duration::from_secs(1)))
}

/// Feeds scripted answers to the poller and counts attempts. Once the script is
/// exhausted every attempt answers "not ready".
fn scripted(answers: Vec<Answer>) -> (Arc<Mutex<usize>>, impl FnMut() -> std::future::Ready<Answer>) {
    let calls = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&calls);
    let mut queue: VecDeque<Answer> = answers.into();
    let fetch = move || {
        *counter.lock().unwrap() += 1;
        std::future::ready(queue.pop_front().unwrap_or(Ok(None)))
    };
    (calls, fetch)
}

#[tokio::test(start_paused = true)]
async fn immediate_success_does_not_sleep() {
    let (calls, fetch) = scripted(vec![Ok(Some(json!({"statusCode": 0, "x": 1})))]);
    let start = Instant::now();

    let reply = poller(10).poll(fetch).await.unwrap();

    assert_eq!(reply["x"], 1);
    assert_eq!(*calls.lock().unwrap(), 1);
    assert!(start.elapsed() < INTERVAL);
}

#[tokio::test(start_paused = true)]
async fn in_progress_then_success_sleeps_between_attempts() {
    let (calls, fetch) = scripted(vec![
        Ok(Some(json!({"statusCode": 100}))),
        Ok(Some(json!({"statusCode": 300}))),
        Ok(Some(json!({"statusCode": 0}))),
    ]);
    let start = Instant::now();

    poller(10).poll(fetch).await.unwrap();

    assert_eq!(*calls.lock().unwrap(), 3);
    let waited = start.elapsed();
    assert!(waited >= INTERVAL * 2 && waited < INTERVAL * 3, "waited {waited:?}");
}

#[tokio::test(start_paused = true)]
async fn reply_without_status_is_ready() {
    let (_, fetch) = scripted(vec![Ok(None), Ok(Some(json!({"instrumentDatas": {}})))]);
    let reply = poller(3).poll(fetch).await.unwrap();
    assert_eq!(reply, json!({"instrumentDatas": {}}));
}

#[tokio::test(start_paused = true)]
async fn never_ready_exhausts_without_trailing_sleep() {
    let (calls, fetch) = scripted(Vec::new());
    let start = Instant::now();

    let err = poller(5).poll(fetch).await.unwrap_err();

    match err {
        DlError::PollExhausted {
            attempts,
            last_status,
        } => {
            assert_eq!(attempts, 5);
            assert_eq!(last_status, None);
        }
        other => panic!("expected PollExhausted, got {other:?}"),
    }
    assert_eq!(*calls.lock().unwrap(), 5);
    let waited = start.elapsed();
    assert!(waited >= INTERVAL * 4 && waited < INTERVAL * 5, "waited {waited:?}");
}

#[tokio::test(start_paused = true)]
async fn exhaustion_reports_last_status_seen() {
    let (_, fetch) = scripted(vec![
        Ok(Some(json!({"statusCode": 100}))),
        Ok(Some(json!({"statusCode": 300}))),
        Ok(None),
    ]);
    let err = poller(3).poll(fetch).await.unwrap_err();
    assert!(
        matches!(err, DlError::PollExhausted { attempts: 3, last_status: Some(300) }),
        "got {err:?}"
    );
    assert!(err.to_string().contains("300"));
}

#[tokio::test(start_paused = true)]
async fn unknown_status_is_terminal_immediately() {
    let (calls, fetch) = scripted(vec![Ok(Some(json!({"statusCode": 999})))]);
    let start = Instant::now();

    let err = poller(10).poll(fetch).await.unwrap_err();

    assert!(matches!(err, DlError::PollTerminal { code: 999 }), "got {err:?}");
    assert_eq!(*calls.lock().unwrap(), 1);
    assert!(start.elapsed() < INTERVAL);
}

#[tokio::test(start_paused = true)]
async fn transient_errors_count_as_not_ready() {
    let (calls, fetch) = scripted(vec![
        Err(DlError::Data("truncated body".into())),
        Err(DlError::Fault {
            operation: "retrieveGetDataResponse".into(),
            status: Some(500),
            message: "busy".into(),
        }),
        Ok(Some(json!({"statusCode": 0}))),
    ]);
    poller(5).poll(fetch).await.unwrap();
    assert_eq!(*calls.lock().unwrap(), 3);
}

#[tokio::test(start_paused = true)]
async fn configuration_errors_surface() {
    let (calls, fetch) = scripted(vec![Err(DlError::Configuration("no retrieve".into()))]);
    let err = poller(5).poll(fetch).await.unwrap_err();
    assert!(matches!(err, DlError::Configuration(_)));
    assert_eq!(*calls.lock().unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn empty_replies_keep_polling() {
    let (calls, fetch) = scripted(vec![
        Ok(Some(json!({}))),
        Ok(Some(json!(null))),
        Ok(Some(json!([]))),
        Ok(Some(json!({"statusCode": 0, "x": 2}))),
    ]);

    let reply = poller(5).poll(fetch).await.unwrap();

    assert_eq!(reply["x"], 2);
    assert_eq!(*calls.lock().unwrap(), 4);
}

#[tokio::test(start_paused = true)]
async fn only_empty_replies_exhaust() {
    let (calls, fetch) = scripted((0..3).map(|_| Ok(Some(json!({})))).collect());
    let err = poller(3).poll(fetch).await.unwrap_err();
    assert!(
        matches!(err, DlError::PollExhausted { attempts: 3, last_status: None }),
        "got {err:?}"
    );
    assert_eq!(*calls.lock().unwrap(), 3);
}
