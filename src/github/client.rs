//! Octocrab client wrappers.
//!
//! `GitHubClients` holds the authenticated `Octocrab` instance for the whole
//! process. For each event it hands out an `OctocrabClient` scoped to the
//! event's repository, matching the design where `GitHubEffect` variants
//! don't include repo info.

use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig as TransportRetry;

use crate::effects::InterpreterFactory;
use crate::types::RepoId;

/// A GitHub API client scoped to a specific repository.
#[derive(Clone)]
pub struct OctocrabClient {
    client: Octocrab,
    repo: RepoId,
}

impl OctocrabClient {
    /// Creates a new client scoped to the given repository.
    pub fn new(client: Octocrab, repo: RepoId) -> Self {
        Self { client, repo }
    }

    /// Returns a reference to the underlying octocrab client.
    pub fn inner(&self) -> &Octocrab {
        &self.client
    }

    /// Returns the repository this client is scoped to.
    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    /// Returns the repository owner.
    pub fn owner(&self) -> &str {
        &self.repo.owner
    }

    /// Returns the repository name.
    pub fn repo_name(&self) -> &str {
        &self.repo.repo
    }
}

impl std::fmt::Debug for OctocrabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OctocrabClient")
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

/// Process-wide GitHub client that produces repo-scoped [`OctocrabClient`]s.
///
/// Cloning an `Octocrab` is cheap (it is reference counted internally), so
/// handing out one client per event costs nothing.
#[derive(Clone)]
pub struct GitHubClients {
    client: Octocrab,
}

impl GitHubClients {
    /// Creates clients authenticated with a personal access or installation token.
    ///
    /// `api_url` replaces `https://api.github.com` (GitHub Enterprise Server).
    /// Octocrab's own transport retries are switched off: every call is
    /// retried by [`retry_with_backoff`](super::retry_with_backoff) only.
    pub fn from_token(
        token: impl Into<String>,
        api_url: Option<&str>,
    ) -> Result<Self, octocrab::Error> {
        let mut builder = Octocrab::builder()
            .personal_token(token.into())
            .add_retry_config(TransportRetry::None);
        if let Some(api_url) = api_url {
            builder = builder.base_uri(api_url)?;
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl InterpreterFactory for GitHubClients {
    type Interpreter = OctocrabClient;

    fn for_repo(&self, repo: &RepoId) -> OctocrabClient {
        OctocrabClient::new(self.client.clone(), repo.clone())
    }
}

impl std::fmt::Debug for GitHubClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClients").finish_non_exhaustive()
    }
}
