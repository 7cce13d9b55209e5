//! GitHub pull request review data transfer objects
//!
//! These types represent the data sent to and returned from the
//! reviews endpoints of the GitHub API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A GitHub user as embedded in review payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub id: u64,
}

/// A pull request review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Review ID, assigned by GitHub
    pub id: u64,

    /// GraphQL node ID
    #[serde(default)]
    pub node_id: Option<String>,

    /// Author of the review
    #[serde(default)]
    pub user: Option<User>,

    /// Review comment body
    #[serde(default)]
    pub body: Option<String>,

    /// Current review state
    pub state: ReviewState,

    /// Review URL for opening in browser
    #[serde(default)]
    pub html_url: Option<String>,

    /// API URL of the reviewed pull request
    #[serde(default)]
    pub pull_request_url: Option<String>,

    /// Commit the review was made against
    #[serde(default)]
    pub commit_id: Option<String>,

    /// When the review was submitted (unset for pending reviews)
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// State of a pull request review as reported by GitHub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Created without an event, not yet submitted
    Pending,
    /// The reviewer approved
    Approved,
    /// The reviewer requested changes
    ChangesRequested,
    /// The reviewer left a comment without a verdict
    Commented,
    /// The review was dismissed
    Dismissed,
    /// A state this client does not know about
    #[serde(other)]
    Unknown,
}

impl ReviewState {
    /// Whether a dismissal can be requested for a review in this state
    pub fn is_dismissable(&self) -> bool {
        matches!(
            self,
            ReviewState::Approved | ReviewState::ChangesRequested | ReviewState::Commented
        )
    }

    /// Whether the review has been submitted
    pub fn is_submitted(&self) -> bool {
        !matches!(self, ReviewState::Pending)
    }
}

/// Review event type for PR reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewEvent {
    /// Approve the PR
    Approve,
    /// Request changes
    RequestChanges,
    /// Comment only (no approval/rejection)
    Comment,
}

impl ReviewEvent {
    /// State GitHub assigns to a review submitted with this event
    pub fn resulting_state(&self) -> ReviewState {
        match self {
            ReviewEvent::Approve => ReviewState::Approved,
            ReviewEvent::RequestChanges => ReviewState::ChangesRequested,
            ReviewEvent::Comment => ReviewState::Commented,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewEvent::Approve => "APPROVE",
            ReviewEvent::RequestChanges => "REQUEST_CHANGES",
            ReviewEvent::Comment => "COMMENT",
        }
    }
}

/// Body of a create or submit review request
///
/// The event is required and always comes first; the comment body is optional
/// and omitted from the payload when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSubmission {
    pub event: ReviewEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ReviewSubmission {
    pub fn new(event: ReviewEvent) -> Self {
        Self { event, body: None }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A review comment on a pull request
///
/// Represents a comment on a specific line in a PR diff, belonging to a review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// GitHub comment ID
    pub id: u64,
    /// Review the comment belongs to
    #[serde(default)]
    pub pull_request_review_id: Option<u64>,
    /// File path the comment is on
    pub path: String,
    /// Position in the diff
    #[serde(default)]
    pub position: Option<u32>,
    /// Position in the diff the comment was originally made on
    #[serde(default)]
    pub original_position: Option<u32>,
    /// Line number in the file
    #[serde(default)]
    pub line: Option<u32>,
    /// Which side of the diff: "LEFT" (deletions) or "RIGHT" (additions)
    #[serde(default)]
    pub side: Option<String>,
    /// Diff hunk the comment applies to
    #[serde(default)]
    pub diff_hunk: Option<String>,
    /// Commit the comment was made on
    #[serde(default)]
    pub commit_id: Option<String>,
    /// Comment body text
    pub body: String,
    /// Author of the comment
    #[serde(default)]
    pub user: Option<User>,
    /// Comment URL for opening in browser
    #[serde(default)]
    pub html_url: Option<String>,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
    /// When the comment was last updated
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a review deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// GitHub confirmed the deletion
    Deleted,
    /// GitHub refused with an expected status (404 absent, 422 not pending)
    NotDeleted { status: u16 },
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}
