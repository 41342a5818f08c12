//! Operator session persisted between console runs

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::ConsoleError;
use crate::filesys::file::File;

/// Operator permission level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Permission {
    /// May watch but not start scenarios
    Read,
    #[default]
    Write,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
        }
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    // Anything but "read" implies write access.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "read" => Ok(Permission::Read),
            _ => Ok(Permission::Write),
        }
    }
}

impl serde::Serialize for Permission {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Permission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// On-disk session record
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionRecord {
    #[serde(default)]
    logged_in: bool,
    #[serde(default)]
    permission: Permission,
    #[serde(default)]
    cookie: String,
}

struct SessionInner {
    logged_in: bool,
    permission: Permission,
    cookie: SecretString,
}

impl From<SessionRecord> for SessionInner {
    fn from(record: SessionRecord) -> Self {
        Self {
            logged_in: record.logged_in,
            permission: record.permission,
            cookie: SecretString::from(record.cookie),
        }
    }
}

/// Session context shared by the dashboard and the subscription channels
pub struct SessionStore {
    file: Option<File>,
    inner: RwLock<SessionInner>,
}

impl SessionStore {
    /// Load the session from its file; a missing file is a logged-out session
    pub async fn load(file: File) -> Result<Self, ConsoleError> {
        let record: SessionRecord = file.read_json_or_default().await?;
        debug!("Loaded session from {:?} (logged in: {})", file.path(), record.logged_in);
        Ok(Self {
            file: Some(file),
            inner: RwLock::new(record.into()),
        })
    }

    /// Session that is never written to disk
    pub fn in_memory(logged_in: bool, permission: Permission, cookie: &str) -> Self {
        Self {
            file: None,
            inner: RwLock::new(SessionInner {
                logged_in,
                permission,
                cookie: SecretString::from(cookie.to_string()),
            }),
        }
    }

    pub async fn is_logged_in(&self) -> bool {
        self.inner.read().await.logged_in
    }

    pub async fn permission(&self) -> Permission {
        self.inner.read().await.permission
    }

    /// Session cookie, empty when there is none
    pub async fn cookie(&self) -> String {
        self.inner.read().await.cookie.expose_secret().to_string()
    }

    /// Store a new session cookie and permission
    pub async fn login(&self, cookie: &str, permission: Permission) -> Result<(), ConsoleError> {
        {
            let mut inner = self.inner.write().await;
            inner.logged_in = true;
            inner.permission = permission;
            inner.cookie = SecretString::from(cookie.to_string());
        }
        info!("Session opened with {} permission", permission.as_str());
        self.persist().await
    }

    /// Clear the logged-in flag
    pub async fn logout(&self) -> Result<(), ConsoleError> {
        {
            let mut inner = self.inner.write().await;
            if !inner.logged_in {
                return Ok(());
            }
            inner.logged_in = false;
        }
        info!("Session closed");
        self.persist().await
    }

    async fn persist(&self) -> Result<(), ConsoleError> {
        let Some(file) = &self.file else {
            return Ok(());
        };

        let record = {
            let inner = self.inner.read().await;
            SessionRecord {
                logged_in: inner.logged_in,
                permission: inner.permission,
                cookie: inner.cookie.expose_secret().to_string(),
            }
        };

        file.write_json(&record).await?;
        file.set_permissions_600().await
    }
}
