use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ttl_store::{Clock, SystemClock, TtlStore, TtlStoreError};

/// Pending invitation for someone to join a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInvite {
    pub token: String,
    pub project_id: String,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InviteError {
    #[error("invalid invite request: {0}")]
    InvalidRequest(String),
    #[error("invite not found or expired")]
    NotFound,
    #[error(transparent)]
    Store(#[from] TtlStoreError),
}

pub struct InviteRegistry<C = SystemClock> {
    store: TtlStore<String, ProjectInvite, C>,
}

impl InviteRegistry<SystemClock> {
    pub fn with_system_clock(ttl: Duration, capacity: usize) -> Result<Self, InviteError> {
        Self::new(ttl, capacity, SystemClock)
    }
}

impl<C: Clock> InviteRegistry<C> {
    pub fn new(ttl: Duration, capacity: usize, clock: C) -> Result<Self, InviteError> {
        Ok(Self {
            store: TtlStore::new(ttl, capacity, clock)?,
        })
    }

    pub fn issue(&self, project_id: &str, email: &str) -> Result<ProjectInvite, InviteError> {
        let project_id = project_id.trim();
        if project_id.is_empty() {
            return Err(InviteError::InvalidRequest(
                "project id must not be empty".into(),
            ));
        }
        let email = email.trim().to_lowercase();
        if !is_email(&email) {
            return Err(InviteError::InvalidRequest(format!(
                "'{email}' is not an e-mail address"
            )));
        }

        let token = Uuid::new_v4().simple().to_string();
        let (invite, evicted) = self.store.put_with(token.clone(), |issued_at, expires_at| {
            ProjectInvite {
                token,
                project_id: project_id.to_string(),
                email,
                issued_at,
                expires_at,
            }
        });
        if let Some(evicted) = evicted {
            warn!(token = %evicted, "invite store at capacity, dropped oldest invite");
        }
        info!(project_id = %invite.project_id, email = %invite.email, "issued project invite");
        Ok(invite)
    }

    pub fn lookup(&self, token: &str) -> Option<ProjectInvite> {
        self.store.get(token)
    }

    /// Consumes the invite. A token can be accepted only once.
    pub fn accept(&self, token: &str) -> Result<ProjectInvite, InviteError> {
        match self.store.delete(token) {
            Some(invite) => {
                info!(project_id = %invite.project_id, email = %invite.email, "accepted project invite");
                Ok(invite)
            }
            None => {
                warn!(token, "rejected unknown or expired invite");
                Err(InviteError::NotFound)
            }
        }
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.store.delete(token).is_some()
    }

    pub fn purge_expired(&self) -> usize {
        self.store.purge_expired()
    }

    pub fn pending(&self) -> usize {
        self.store.len()
    }
}

/// Exactly one `@`, with something on both sides and no whitespace.
fn is_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
