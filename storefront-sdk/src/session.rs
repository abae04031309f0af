//! Session state: the token pair and the signed-in user profile, mirrored to a
//! [`CredentialStore`](crate::storage::CredentialStore) so the session survives restarts.

use std::error::Error as StdError;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::storage::{CredentialStore, Keys};

/// The server-issued user record.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Current session credentials. An empty access token means no authenticated session. Every
/// mutation writes through to the backing store.
#[derive(Clone, Default)]
pub struct Session {
    access_token: String,
    refresh_token: String,
    profile: Option<Profile>,
}

impl Session {
    /// Load the persisted session. Unreadable values are treated as absent.
    pub fn load(store: &dyn CredentialStore) -> Self {
        const FN_NAME: &'static str = "load";

        let mut session = Session::default();
        match store.get(Keys::ACCESS_TOKEN) {
            Err(e) => warn!("[{}] read {} error: {}", FN_NAME, Keys::ACCESS_TOKEN, e),
            Ok(token) => session.access_token = token.unwrap_or_default(),
        }
        match store.get(Keys::REFRESH_TOKEN) {
            Err(e) => warn!("[{}] read {} error: {}", FN_NAME, Keys::REFRESH_TOKEN, e),
            Ok(token) => session.refresh_token = token.unwrap_or_default(),
        }
        match store.get(Keys::PROFILE) {
            Err(e) => warn!("[{}] read {} error: {}", FN_NAME, Keys::PROFILE, e),
            Ok(None) => (),
            Ok(Some(profile)) => match serde_json::from_str::<Profile>(profile.as_str()) {
                Err(e) => warn!("[{}] parse {} error: {}", FN_NAME, Keys::PROFILE, e),
                Ok(profile) => session.profile = Some(profile),
            },
        }
        session
    }

    pub fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    pub fn refresh_token(&self) -> &str {
        self.refresh_token.as_str()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.len() > 0
    }

    /// Replace the access token.
    pub fn set_access_token(
        &mut self,
        token: &str,
        store: &dyn CredentialStore,
    ) -> Result<(), Box<dyn StdError + Send + Sync>> {
        self.access_token = token.to_string();
        store.set(Keys::ACCESS_TOKEN, token)
    }

    /// Replace both tokens.
    pub fn set_tokens(
        &mut self,
        access_token: &str,
        refresh_token: &str,
        store: &dyn CredentialStore,
    ) -> Result<(), Box<dyn StdError + Send + Sync>> {
        self.access_token = access_token.to_string();
        self.refresh_token = refresh_token.to_string();
        store.set(Keys::ACCESS_TOKEN, access_token)?;
        store.set(Keys::REFRESH_TOKEN, refresh_token)
    }

    /// Replace the profile.
    pub fn set_profile(
        &mut self,
        profile: Profile,
        store: &dyn CredentialStore,
    ) -> Result<(), Box<dyn StdError + Send + Sync>> {
        let json_str = serde_json::to_string(&profile)?;
        self.profile = Some(profile);
        store.set(Keys::PROFILE, json_str.as_str())
    }

    /// Remove tokens and profile from the session and the store.
    pub fn clear(
        &mut self,
        store: &dyn CredentialStore,
    ) -> Result<(), Box<dyn StdError + Send + Sync>> {
        self.access_token.clear();
        self.refresh_token.clear();
        self.profile = None;
        store.remove(Keys::ACCESS_TOKEN)?;
        store.remove(Keys::REFRESH_TOKEN)?;
        store.remove(Keys::PROFILE)
    }
}
