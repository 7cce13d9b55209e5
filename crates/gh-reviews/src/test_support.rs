//! Test executors
//!
//! `RecordingExecutor` replays canned responses and records every request.
//! `FakeGitHub` keeps reviews in memory and answers the reviews endpoints the
//! way GitHub does, including its status codes for invalid transitions.
//! `init_logger` installs env_logger behind a recorder so tests can assert on
//! emitted log lines.

use crate::errors::Result;
use crate::executor::{ApiRequest, ApiResponse, Method, RequestExecutor};
use crate::types::{Review, ReviewComment, ReviewState, User};
use async_trait::async_trait;
use chrono::Utc;
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, OnceLock};

thread_local! {
    static CAPTURED_LOGS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Records every log line on the emitting thread, then hands it to env_logger
struct CapturingLogger {
    inner: env_logger::Logger,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED_LOGS.with(|logs| {
            logs.borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
        if self.inner.matches(record) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

static LOGGER: OnceLock<CapturingLogger> = OnceLock::new();

/// Install the test logger once per test binary
pub fn init_logger() {
    let mut installed = false;
    let logger = LOGGER.get_or_init(|| {
        installed = true;
        CapturingLogger {
            inner: env_logger::Builder::from_default_env()
                .is_test(true)
                .build(),
        }
    });
    if installed && log::set_logger(logger).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

/// Drain the log lines captured on the current thread
///
/// `#[tokio::test]` runs on a current-thread runtime, so everything an async
/// test logs lands on the test's own thread.
pub fn take_logs() -> Vec<(Level, String)> {
    CAPTURED_LOGS.with(|logs| logs.borrow_mut().drain(..).collect())
}

/// Warnings captured on the current thread since the last drain
pub fn take_warnings() -> Vec<String> {
    take_logs()
        .into_iter()
        .filter(|(level, _)| *level == Level::Warn)
        .map(|(_, message)| message)
        .collect()
}

/// Executor that records requests and replays queued responses
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    responses: Arc<Mutex<VecDeque<ApiResponse>>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next request
    pub fn respond(&self, status: u16, body: Value) -> &Self {
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        self.responses
            .lock()
            .unwrap()
            .push_back(ApiResponse::new(status, body));
        self
    }

    pub fn respond_with(&self, response: ApiResponse) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }
}

#[async_trait]
impl RequestExecutor for RecordingExecutor {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ApiResponse::new(500, r#"{"message":"no canned response"}"#));
        Ok(response)
    }
}

#[derive(Debug, Default)]
struct FakeState {
    next_id: u64,
    /// Reviews keyed by (repository path, pull request number)
    reviews: BTreeMap<(String, u64), Vec<Review>>,
    /// Comments keyed by review id
    comments: BTreeMap<u64, Vec<ReviewComment>>,
    requests: Vec<ApiRequest>,
}

/// In-memory stand-in for the GitHub reviews endpoints
#[derive(Debug, Clone, Default)]
pub struct FakeGitHub {
    state: Arc<Mutex<FakeState>>,
    login: String,
}

impl FakeGitHub {
    pub fn new(login: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                next_id: 80,
                ..FakeState::default()
            })),
            login: login.to_string(),
        }
    }

    /// A second user sharing the same server state
    pub fn as_user(&self, login: &str) -> Self {
        Self {
            state: Arc::clone(&self.state),
            login: login.to_string(),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Attach a line comment to an existing review
    pub fn add_comment(&self, review_id: u64, path: &str, body: &str) -> u64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        let comment = ReviewComment {
            id,
            pull_request_review_id: Some(review_id),
            path: path.to_string(),
            position: Some(1),
            original_position: Some(1),
            line: Some(1),
            side: Some("RIGHT".to_string()),
            diff_hunk: Some("@@ -0,0 +1 @@".to_string()),
            commit_id: None,
            body: body.to_string(),
            user: Some(self.user()),
            html_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        state.comments.entry(review_id).or_default().push(comment);
        id
    }

    fn user(&self) -> User {
        User {
            login: self.login.clone(),
            id: 1,
        }
    }

    fn route(&self, request: &ApiRequest) -> ApiResponse {
        let Some((repo, rest)) = request.path.split_once("/pulls/") else {
            return not_found();
        };
        let segments: Vec<&str> = rest.split('/').collect();
        let (number, review_id, action) = match segments.as_slice() {
            [number, "reviews"] => (number.parse().ok(), None, None),
            [number, "reviews", id] => (number.parse().ok(), id.parse().ok(), None),
            [number, "reviews", id, action] => {
                (number.parse().ok(), id.parse().ok(), Some(*action))
            }
            _ => return not_found(),
        };
        let Some(number) = number else {
            return not_found();
        };
        let key = (repo.to_string(), number);

        match (request.method, review_id, action) {
            (Method::Get, None, None) => self.list(&key, request),
            (Method::Post, None, None) => self.create(&key, request),
            (Method::Get, Some(id), None) => self.with_review(&key, id, |review| {
                ApiResponse::new(200, to_json(review))
            }),
            (Method::Get, Some(id), Some("comments")) => {
                let exists = self.with_review(&key, id, |_| ApiResponse::new(200, ""));
                if exists.status != 200 {
                    return exists;
                }
                let state = self.state.lock().unwrap();
                let comments = state.comments.get(&id).cloned().unwrap_or_default();
                ApiResponse::new(200, json!(comments).to_string())
            }
            (Method::Post, Some(id), Some("events")) => self.submit(&key, id, request),
            (Method::Put, Some(id), Some("dismissals")) => self.dismiss(&key, id, request),
            (Method::Delete, Some(id), None) => self.delete(&key, id),
            _ => not_found(),
        }
    }

    fn list(&self, key: &(String, u64), request: &ApiRequest) -> ApiResponse {
        let state = self.state.lock().unwrap();
        let reviews = state.reviews.get(key).cloned().unwrap_or_default();
        let per_page: usize = request
            .query
            .get("per_page")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(30)
            .min(100);
        let page: usize = request
            .query
            .get("page")
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        let items: Vec<Review> = reviews
            .into_iter()
            .skip(per_page * page.saturating_sub(1))
            .take(per_page)
            .collect();
        ApiResponse::new(200, json!(items).to_string())
    }

    fn create(&self, key: &(String, u64), request: &ApiRequest) -> ApiResponse {
        let body = request.body.clone().unwrap_or_else(|| json!({}));
        let state_after = match body.get("event").and_then(Value::as_str) {
            None => ReviewState::Pending,
            Some(event) => match event_state(event) {
                Some(state) => state,
                None => return unprocessable("Unknown review event"),
            },
        };

        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let review = Review {
            id: state.next_id,
            node_id: None,
            user: Some(self.user()),
            body: body.get("body").and_then(Value::as_str).map(str::to_string),
            state: state_after,
            html_url: None,
            pull_request_url: None,
            commit_id: body
                .get("commit_id")
                .and_then(Value::as_str)
                .map(str::to_string),
            submitted_at: state_after.is_submitted().then(Utc::now),
        };
        state.reviews.entry(key.clone()).or_default().push(review.clone());
        ApiResponse::new(200, to_json(&review))
    }

    fn submit(&self, key: &(String, u64), id: u64, request: &ApiRequest) -> ApiResponse {
        let body = request.body.clone().unwrap_or_else(|| json!({}));
        let Some(next) = body
            .get("event")
            .and_then(Value::as_str)
            .and_then(event_state)
        else {
            return unprocessable("Invalid or missing review event");
        };
        self.update_review(key, id, |review| {
            if review.state.is_submitted() {
                return Err(unprocessable("Can not submit a non-pending review"));
            }
            review.state = next;
            review.submitted_at = Some(Utc::now());
            if let Some(text) = body.get("body").and_then(Value::as_str) {
                review.body = Some(text.to_string());
            }
            Ok(())
        })
    }

    fn dismiss(&self, key: &(String, u64), id: u64, request: &ApiRequest) -> ApiResponse {
        let has_message = request
            .body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .is_some_and(|message| !message.is_empty());
        if !has_message {
            return unprocessable("Dismissal message is required");
        }
        self.update_review(key, id, |review| {
            if review.state == ReviewState::Pending {
                return Err(unprocessable("Can not dismiss a pending review"));
            }
            review.state = ReviewState::Dismissed;
            Ok(())
        })
    }

    fn delete(&self, key: &(String, u64), id: u64) -> ApiResponse {
        let mut state = self.state.lock().unwrap();
        let Some(reviews) = state.reviews.get_mut(key) else {
            return not_found();
        };
        let Some(index) = reviews.iter().position(|r| r.id == id) else {
            return not_found();
        };
        if reviews[index].state.is_submitted() {
            return unprocessable("Can not delete a non pending review");
        }
        let review = reviews.remove(index);
        ApiResponse::new(200, to_json(&review))
    }

    fn with_review(
        &self,
        key: &(String, u64),
        id: u64,
        f: impl FnOnce(&Review) -> ApiResponse,
    ) -> ApiResponse {
        let state = self.state.lock().unwrap();
        match state
            .reviews
            .get(key)
            .and_then(|reviews| reviews.iter().find(|r| r.id == id))
        {
            Some(review) => f(review),
            None => not_found(),
        }
    }

    fn update_review(
        &self,
        key: &(String, u64),
        id: u64,
        f: impl FnOnce(&mut Review) -> std::result::Result<(), ApiResponse>,
    ) -> ApiResponse {
        let mut state = self.state.lock().unwrap();
        let Some(review) = state
            .reviews
            .get_mut(key)
            .and_then(|reviews| reviews.iter_mut().find(|r| r.id == id))
        else {
            return not_found();
        };
        match f(&mut *review) {
            Ok(()) => ApiResponse::new(200, to_json(review)),
            Err(response) => response,
        }
    }
}

#[async_trait]
impl RequestExecutor for FakeGitHub {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.state.lock().unwrap().requests.push(request.clone());
        Ok(self.route(&request))
    }
}

fn event_state(event: &str) -> Option<ReviewState> {
    match event {
        "APPROVE" => Some(ReviewState::Approved),
        "REQUEST_CHANGES" => Some(ReviewState::ChangesRequested),
        "COMMENT" => Some(ReviewState::Commented),
        _ => None,
    }
}

fn to_json(review: &Review) -> String {
    serde_json::to_string(review).unwrap()
}

fn not_found() -> ApiResponse {
    ApiResponse::new(404, r#"{"message":"Not Found"}"#)
}

fn unprocessable(message: &str) -> ApiResponse {
    ApiResponse::new(422, json!({ "message": message }).to_string())
}
