//! Shared test fixtures for code built on [`HttpClient`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::time::{Clock, Sleeper};

/// Mock HTTP client that replays a scripted sequence of responses.
///
/// Once the script is exhausted it keeps answering with `fallback`, or
/// panics if no fallback was set.
#[derive(Debug)]
pub struct MockClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    fallback: Option<http::StatusCode>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    pub fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Answers every request with `status` and an empty body.
    pub fn always(status: u16) -> Self {
        let mut client = Self::new(Vec::new());
        client.fallback = Some(http::StatusCode::from_u16(status).unwrap());
        client
    }

    pub fn statuses(statuses: &[u16]) -> Self {
        Self::new(statuses.iter().map(|s| Ok(response(*s, ""))).collect())
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        let next = self.responses.lock().unwrap().pop_front();
        match (next, self.fallback) {
            (Some(result), _) => result,
            (None, Some(status)) => Ok(HttpResponse::new(status, http::HeaderMap::new(), vec![])),
            (None, None) => panic!("MockClient received more requests than scripted"),
        }
    }
}

/// Builds a response with the given status and body.
pub fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    )
}

/// Manually advanced clock shared between a notifier and its sleeper.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock().unwrap() += by;
    }

    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

/// Sleeper that advances a [`ManualClock`] instead of waiting, and records
/// every requested duration.
#[derive(Debug, Clone)]
pub struct AdvancingSleeper {
    clock: ManualClock,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl AdvancingSleeper {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            sleeps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Sleeper for AdvancingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        self.clock.advance(duration);
    }
}

/// HTTP client that advances a [`ManualClock`] by a fixed latency per call
/// and then fails with a timeout.
#[derive(Debug)]
pub struct SlowFailingClient {
    pub clock: ManualClock,
    pub latency: Duration,
    pub calls: AtomicUsize,
}

impl HttpClient for SlowFailingClient {
    async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.clock.advance(self.latency);
        Err(HttpError::Timeout)
    }
}
