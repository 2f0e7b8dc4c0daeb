//! Authentication context shared by the HTTP client and the pages.
//!
//! Holds the bearer token and the signed-in user. When created with
//! [`Session::load`] every change is written back to the JSON file so the
//! session survives between command invocations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<SessionUser>,
}

#[derive(Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
    path: Option<PathBuf>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn in_memory(token: impl Into<String>, user: SessionUser) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                token: Some(token.into()),
                user: Some(user),
            })),
            path: None,
        }
    }

    /// Opens the session file at `path`. A missing file is an empty session.
    pub async fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionState::default(),
            Err(e) => return Err(e),
        };

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            path: Some(path),
        })
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn user(&self) -> Option<SessionUser> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.token.is_some()
    }

    pub async fn sign_in(&self, token: impl Into<String>, user: SessionUser) -> std::io::Result<()> {
        let mut state = self.state.write().await;
        state.token = Some(token.into());
        state.user = Some(user);
        self.persist(&state).await
    }

    /// Drops both the token and the user entry.
    pub async fn clear(&self) -> std::io::Result<()> {
        let mut state = self.state.write().await;
        state.token = None;
        state.user = None;
        self.persist(&state).await
    }

    async fn persist(&self, state: &SessionState) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(state)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        tokio::fs::write(path, json).await
    }
}
