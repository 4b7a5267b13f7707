//! Shared test utilities: event builders and a recording GitHub mock.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use proptest::prelude::*;
use serde_json::json;

use crate::effects::{GitHubEffect, GitHubInterpreter, GitHubResponse, InterpreterFactory};
use crate::types::{CommentId, IssueNumber, PermissionLevel, RepoId};
use crate::webhooks::{CommentAction, CommentEvent};

pub fn test_repo() -> RepoId {
    RepoId::new("octocat", "hello-world")
}

/// A freshly created comment by a human with `read` permission.
pub fn comment_event(body: &str, actor: &str, issue: IssueNumber) -> CommentEvent {
    CommentEvent {
        repo: test_repo(),
        action: CommentAction::Created,
        issue,
        comment_id: CommentId(1000 + issue.0),
        body: body.to_string(),
        actor: actor.to_string(),
        actor_permission: Some(PermissionLevel::Read),
        actor_is_bot: false,
    }
}

/// An `issue_comment` webhook payload as GitHub sends it.
///
/// `permission` becomes `sender.permission`; pass `None` to leave it out.
pub fn issue_comment_payload(
    body: &str,
    actor: &str,
    issue: IssueNumber,
    permission: Option<&str>,
) -> serde_json::Value {
    let mut sender = json!({ "login": actor, "type": "User" });
    if let Some(permission) = permission {
        sender["permission"] = json!(permission);
    }
    json!({
        "action": "created",
        "issue": { "number": issue.0 },
        "comment": { "id": 1000 + issue.0, "body": body },
        "repository": { "full_name": test_repo().to_string() },
        "sender": sender,
    })
}

pub fn arb_permission_level() -> impl Strategy<Value = PermissionLevel> {
    prop::sample::select(PermissionLevel::ALL.to_vec())
}

#[derive(Default)]
struct MockState {
    calls: Mutex<Vec<(RepoId, GitHubEffect)>>,
    failing: Mutex<HashSet<&'static str>>,
    hanging: Mutex<Vec<GitHubEffect>>,
    delay: Mutex<Option<Duration>>,
    permission: Mutex<Option<PermissionLevel>>,
    next_comment_id: AtomicU64,
}

/// A GitHub stand-in that records every effect it is asked to execute.
///
/// Calls are recorded before they are (possibly) failed or delayed, so the
/// log reflects attempts. Clones share state.
#[derive(Clone, Default)]
pub struct RecordingGitHub {
    state: Arc<MockState>,
}

impl RecordingGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers permission lookups with `level`. Without this they fail.
    pub fn with_permission(self, level: PermissionLevel) -> Self {
        *self.state.permission.lock().unwrap() = Some(level);
        self
    }

    /// Makes every effect with this name fail.
    pub fn failing(self, effect_name: &'static str) -> Self {
        self.state.failing.lock().unwrap().insert(effect_name);
        self
    }

    /// Makes this exact effect never complete.
    pub fn hanging_on(self, effect: GitHubEffect) -> Self {
        self.state.hanging.lock().unwrap().push(effect);
        self
    }

    /// Delays every call by `delay`.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.state.delay.lock().unwrap() = Some(delay);
        self
    }

    /// Every attempted effect, in order.
    pub fn calls(&self) -> Vec<GitHubEffect> {
        self.state
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, effect)| effect.clone())
            .collect()
    }

    /// Every attempted effect with the repository it was scoped to.
    pub fn scoped_calls(&self) -> Vec<(RepoId, GitHubEffect)> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Names of every attempted effect, in order.
    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls().iter().map(GitHubEffect::name).collect()
    }

    /// Waits until `predicate` holds for the recorded calls.
    ///
    /// Panics after five seconds.
    pub async fn wait_for(&self, predicate: impl Fn(&[GitHubEffect]) -> bool) {
        let poll = async {
            while !predicate(&self.calls()) {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), poll)
            .await
            .expect("timed out waiting for GitHub calls");
    }
}

impl InterpreterFactory for RecordingGitHub {
    type Interpreter = RecordingInterpreter;

    fn for_repo(&self, repo: &RepoId) -> RecordingInterpreter {
        RecordingInterpreter {
            repo: repo.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

/// A [`RecordingGitHub`] handle scoped to one repository.
pub struct RecordingInterpreter {
    repo: RepoId,
    state: Arc<MockState>,
}

impl GitHubInterpreter for RecordingInterpreter {
    type Error = String;

    async fn interpret(&self, effect: GitHubEffect) -> Result<GitHubResponse, String> {
        self.state
            .calls
            .lock()
            .unwrap()
            .push((self.repo.clone(), effect.clone()));

        let hangs = self.state.hanging.lock().unwrap().contains(&effect);
        if hangs {
            std::future::pending::<()>().await;
        }

        let delay = *self.state.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let fails = self.state.failing.lock().unwrap().contains(effect.name());
        if fails {
            return Err(format!("mock {} failure", effect.name()));
        }

        match effect {
            GitHubEffect::GetPermission { .. } => {
                let permission = *self.state.permission.lock().unwrap();
                permission
                    .map(GitHubResponse::Permission)
                    .ok_or_else(|| "no permission configured".to_string())
            }
            GitHubEffect::AddReaction { .. } => Ok(GitHubResponse::ReactionAdded),
            GitHubEffect::AddAssignees { .. } => Ok(GitHubResponse::AssigneesAdded),
            GitHubEffect::PostComment { .. } => {
                let id = self.state.next_comment_id.fetch_add(1, Ordering::SeqCst);
                Ok(GitHubResponse::CommentPosted { id: CommentId(id) })
            }
        }
    }
}
