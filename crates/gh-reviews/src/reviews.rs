//! Pull request reviews resource
//!
//! Maps review operations onto the `/pulls/{number}/reviews` endpoint family.
//! Every request carries the reviews media type in its `Accept` header unless
//! the caller picked one, and every state change is a request to GitHub: the
//! returned review is always GitHub's record after the transition.

use crate::errors::Result;
use crate::executor::{ApiRequest, Method, RequestExecutor};
use crate::options::RequestOptions;
use crate::repository::RepositoryRef;
use crate::types::{DeleteOutcome, Review, ReviewComment, ReviewSubmission};
use gh_reviews_config::{ReviewsConfig, MAX_PER_PAGE};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Upper bound on pages fetched by a single auto-paginated list call
pub const MAX_PAGES: u32 = 100;

/// Statuses a deletion reports as `NotDeleted` instead of failing
const EXPECTED_DELETE_FAILURES: [u16; 2] = [404, 422];

/// Build the API path of a review endpoint
///
/// `/{repo}/pulls/{number}/reviews[/{review_id}][/{trailing}]`
pub fn reviews_path(
    repo: &RepositoryRef,
    number: u64,
    review_id: Option<u64>,
    trailing: Option<&str>,
) -> String {
    let mut path = format!("/{}/pulls/{}/reviews", repo.path(), number);
    if let Some(id) = review_id {
        path.push_str(&format!("/{}", id));
    }
    if let Some(segment) = trailing {
        path.push('/');
        path.push_str(segment);
    }
    path
}

/// Client for the pull request reviews API
///
/// Holds no mutable state; cloning is cheap when the executor is.
///
/// # Example
///
/// ```rust,ignore
/// use gh_reviews::{RepositoryRef, RequestOptions, ReviewEvent, ReviewSubmission};
///
/// let repo: RepositoryRef = "octocat/Hello-World".parse()?;
/// let review = reviews
///     .create_review(
///         &repo,
///         12,
///         ReviewSubmission::new(ReviewEvent::Approve).with_body(":rock:"),
///         RequestOptions::new(),
///     )
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReviewsResource<E: RequestExecutor> {
    executor: E,
    config: ReviewsConfig,
}

impl<E: RequestExecutor> ReviewsResource<E> {
    /// Create a resource with the default configuration
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, ReviewsConfig::default())
    }

    pub fn with_config(executor: E, config: ReviewsConfig) -> Self {
        Self { executor, config }
    }

    pub fn config(&self) -> &ReviewsConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// List reviews on a pull request
    pub async fn list_reviews(
        &self,
        repo: &RepositoryRef,
        number: u64,
        options: RequestOptions,
    ) -> Result<Vec<Review>> {
        debug!("Listing reviews for {} #{}", repo, number);
        self.list(reviews_path(repo, number, None, None), options)
            .await
    }

    /// Get a single review
    pub async fn get_review(
        &self,
        repo: &RepositoryRef,
        number: u64,
        review_id: u64,
        options: RequestOptions,
    ) -> Result<Review> {
        debug!("Fetching review {} for {} #{}", review_id, repo, number);
        let path = reviews_path(repo, number, Some(review_id), None);
        self.send(self.request(Method::Get, path, options, None))
            .await
    }

    /// List the line comments that belong to a review
    pub async fn list_review_comments(
        &self,
        repo: &RepositoryRef,
        number: u64,
        review_id: u64,
        options: RequestOptions,
    ) -> Result<Vec<ReviewComment>> {
        debug!(
            "Listing comments of review {} for {} #{}",
            review_id, repo, number
        );
        self.list(
            reviews_path(repo, number, Some(review_id), Some("comments")),
            options,
        )
        .await
    }

    /// Create a review and submit it with the given event
    pub async fn create_review(
        &self,
        repo: &RepositoryRef,
        number: u64,
        submission: ReviewSubmission,
        options: RequestOptions,
    ) -> Result<Review> {
        debug!(
            "Creating {} review for {} #{}",
            submission.event.as_str(),
            repo,
            number
        );
        let path = reviews_path(repo, number, None, None);
        let fields = body_fields(&submission)?;
        self.send(self.request(Method::Post, path, options, Some(fields)))
            .await
    }

    /// Submit a pending review with the given event
    pub async fn submit_review(
        &self,
        repo: &RepositoryRef,
        number: u64,
        review_id: u64,
        submission: ReviewSubmission,
        options: RequestOptions,
    ) -> Result<Review> {
        debug!(
            "Submitting review {} as {} for {} #{}",
            review_id,
            submission.event.as_str(),
            repo,
            number
        );
        let path = reviews_path(repo, number, Some(review_id), Some("events"));
        let fields = body_fields(&submission)?;
        self.send(self.request(Method::Post, path, options, Some(fields)))
            .await
    }

    /// Dismiss a submitted review
    pub async fn dismiss_review(
        &self,
        repo: &RepositoryRef,
        number: u64,
        review_id: u64,
        message: &str,
        options: RequestOptions,
    ) -> Result<Review> {
        debug!("Dismissing review {} for {} #{}", review_id, repo, number);
        let path = reviews_path(repo, number, Some(review_id), Some("dismissals"));
        let mut fields = Map::new();
        fields.insert("message".to_string(), Value::from(message));
        self.send(self.request(Method::Put, path, options, Some(fields)))
            .await
    }

    /// Delete a pending review
    ///
    /// A review that is already gone (404) or no longer pending (422) yields
    /// `DeleteOutcome::NotDeleted`; any other failure is an error.
    pub async fn delete_review(
        &self,
        repo: &RepositoryRef,
        number: u64,
        review_id: u64,
        options: RequestOptions,
    ) -> Result<DeleteOutcome> {
        debug!("Deleting review {} for {} #{}", review_id, repo, number);
        let path = reviews_path(repo, number, Some(review_id), None);
        let response = self
            .executor
            .execute(self.request(Method::Delete, path, options, None))
            .await?;

        if response.is_success() {
            return Ok(DeleteOutcome::Deleted);
        }
        if EXPECTED_DELETE_FAILURES.contains(&response.status) {
            debug!(
                "Review {} not deleted ({}): {}",
                review_id,
                response.status,
                response.message()
            );
            return Ok(DeleteOutcome::NotDeleted {
                status: response.status,
            });
        }

        response.error_for_status().map(|_| DeleteOutcome::Deleted)
    }

    fn request(
        &self,
        method: Method,
        path: String,
        options: RequestOptions,
        computed: Option<Map<String, Value>>,
    ) -> ApiRequest {
        if options.caller_accept().is_none()
            && self.config.uses_preview_media_type()
            && !self.config.silence_preview_warnings
        {
            warn!(
                "The preview version of the Reviews API is not yet suitable for production use. \
                 Supply a media type in the Accept header to avoid this message."
            );
        }

        options.into_request(method, path, &self.config.reviews_media_type, computed)
    }

    async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.executor
            .execute(request)
            .await?
            .error_for_status()?
            .json()
    }

    async fn list<T: DeserializeOwned>(
        &self,
        path: String,
        options: RequestOptions,
    ) -> Result<Vec<T>> {
        if !self.config.auto_paginate || options.has_page() {
            return self.send(self.request(Method::Get, path, options, None)).await;
        }

        // The page size sent is the one the short-page check compares against
        let per_page = options
            .requested_per_page()
            .unwrap_or(self.config.per_page)
            .clamp(1, MAX_PER_PAGE);

        let mut items = Vec::new();
        for page in 1..=MAX_PAGES {
            let page_options = options.clone().per_page(per_page).page(page);
            let batch: Vec<T> = self
                .send(self.request(Method::Get, path.clone(), page_options, None))
                .await?;
            let batch_len = batch.len();
            items.extend(batch);

            debug!("Fetched page {} of {}: {} items", page, path, batch_len);
            if batch_len < usize::from(per_page) {
                break;
            }
        }

        Ok(items)
    }
}

fn body_fields<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        _ => Ok(Map::new()),
    }
}
