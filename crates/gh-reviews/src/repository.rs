//! Repository references
//!
//! A repository can be addressed by its numeric id, by an `owner/name`
//! slug or by a repository record returned from the API. All forms
//! resolve to a single API path segment through [`RepositoryRef::path`].

use crate::errors::ReviewsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reference to a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepositoryRef {
    /// Numeric repository id, resolved through `/repositories/{id}`
    Id(u64),
    /// Owner and name, resolved through `/repos/{owner}/{name}`
    Name { owner: String, name: String },
}

impl RepositoryRef {
    /// Build a reference from owner and repository name
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        RepositoryRef::Name {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// API path segment for this repository, without leading slash
    pub fn path(&self) -> String {
        match self {
            RepositoryRef::Id(id) => format!("repositories/{}", id),
            RepositoryRef::Name { owner, name } => format!("repos/{}/{}", owner, name),
        }
    }

    /// `owner/name` slug, if the reference carries one
    pub fn slug(&self) -> Option<String> {
        match self {
            RepositoryRef::Id(_) => None,
            RepositoryRef::Name { owner, name } => Some(format!("{}/{}", owner, name)),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryRef::Id(id) => write!(f, "#{}", id),
            RepositoryRef::Name { owner, name } => write!(f, "{}/{}", owner, name),
        }
    }
}

impl FromStr for RepositoryRef {
    type Err = ReviewsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(RepositoryRef::new(owner, name))
            }
            _ => Err(ReviewsError::InvalidRepository(format!(
                "'{}' is not of the form owner/name",
                s
            ))),
        }
    }
}

impl From<u64> for RepositoryRef {
    fn from(id: u64) -> Self {
        RepositoryRef::Id(id)
    }
}

impl From<&Repository> for RepositoryRef {
    fn from(repo: &Repository) -> Self {
        match &repo.owner {
            Some(owner) => RepositoryRef::new(owner.login.clone(), repo.name.clone()),
            None => match repo.full_name.as_deref().map(str::parse::<RepositoryRef>) {
                Some(Ok(slug)) => slug,
                _ => RepositoryRef::Id(repo.id),
            },
        }
    }
}

/// Repository record as returned by the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub owner: Option<RepositoryOwner>,
}

/// Owner of a repository record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}
