use std::sync::Arc;

use chrono::{TimeZone, Utc};
use laboratory::{SpecContext, Suite, describe, expect};

use storefront_sdk::{
    session::{Profile, Session},
    storage::{CredentialStore, Keys, MemoryStore},
};

use crate::TestState;

pub fn suite() -> Suite<TestState> {
    describe("session", |context| {
        context.it("load() from an empty store", test_load_empty);
        context.it("mutations write through", test_write_through);
        context.it("clear()", test_clear);
    })
}

fn test_profile() -> Profile {
    Profile {
        user_id: "user-1".to_string(),
        email: "user@example.com".to_string(),
        roles: vec!["User".to_string()],
        name: Some("Test User".to_string()),
        phone: None,
        address: None,
        date_of_birth: Some(Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap()),
        avatar: None,
        created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        updated_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
    }
}

fn test_load_empty(_: &mut SpecContext<TestState>) -> Result<(), String> {
    let store = Arc::new(MemoryStore::default());
    let session = Session::load(store.as_ref());
    expect(session.is_authenticated()).to_equal(false)?;
    expect(session.access_token().len()).to_equal(0)?;
    expect(session.refresh_token().len()).to_equal(0)?;
    expect(session.profile().is_none()).to_equal(true)
}

fn test_write_through(_: &mut SpecContext<TestState>) -> Result<(), String> {
    let store = Arc::new(MemoryStore::default());
    let mut session = Session::default();
    session
        .set_tokens("Bearer access-1", "refresh-1", store.as_ref())
        .map_err(|e| e.to_string())?;
    session
        .set_profile(test_profile(), store.as_ref())
        .map_err(|e| e.to_string())?;

    // A reloaded session equals what was written.
    let loaded = Session::load(store.as_ref());
    expect(loaded.is_authenticated()).to_equal(true)?;
    expect(loaded.access_token().to_string()).to_equal("Bearer access-1".to_string())?;
    expect(loaded.refresh_token().to_string()).to_equal("refresh-1".to_string())?;
    let profile = match loaded.profile() {
        None => return Err("no profile".to_string()),
        Some(profile) => profile,
    };
    expect(profile.email.clone()).to_equal("user@example.com".to_string())?;
    expect(profile.date_of_birth).to_equal(test_profile().date_of_birth)
}

fn test_clear(_: &mut SpecContext<TestState>) -> Result<(), String> {
    let store = Arc::new(MemoryStore::default());
    let mut session = Session::default();
    session
        .set_tokens("Bearer access-1", "refresh-1", store.as_ref())
        .map_err(|e| e.to_string())?;
    session
        .set_profile(test_profile(), store.as_ref())
        .map_err(|e| e.to_string())?;
    session.clear(store.as_ref()).map_err(|e| e.to_string())?;

    expect(session.is_authenticated()).to_equal(false)?;
    expect(session.profile().is_none()).to_equal(true)?;
    expect(store.get(Keys::ACCESS_TOKEN).map_err(|e| e.to_string())?).to_equal(None)?;
    expect(store.get(Keys::REFRESH_TOKEN).map_err(|e| e.to_string())?).to_equal(None)?;
    expect(store.get(Keys::PROFILE).map_err(|e| e.to_string())?).to_equal(None)
}
