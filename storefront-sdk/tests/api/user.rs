use laboratory::{SpecContext, Suite, describe, expect};

use storefront_sdk::api::{auth, user};

use super::{STATE, after_all_fn, before_all_fn, new_client};
use crate::{TestState, USER_EMAIL, USER_PASSWORD};

pub fn suite() -> Suite<TestState> {
    describe("user", |context| {
        context.it("get()", test_get);
        context.it("update()", test_update);

        context.before_all(before_all_fn).after_all(after_all_fn);
    })
}

fn test_get(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();

    runtime.block_on(async move {
        let (mut client, _) = new_client(0)?;
        let data = match auth::login(&mut client, USER_EMAIL, USER_PASSWORD).await {
            Err(e) => return Err(format!("login error: {}", e)),
            Ok(data) => data,
        };
        let profile = match user::get(&mut client).await {
            Err(e) => return Err(format!("get error: {}", e)),
            Ok(profile) => profile,
        };
        expect(profile.user_id).to_equal(data.user.user_id)?;
        expect(profile.email).to_equal(USER_EMAIL.to_string())?;
        expect(profile.name).to_equal(Some("Test User".to_string()))
    })?;

    Ok(())
}

fn test_update(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();

    runtime.block_on(async move {
        let (mut client, _) = new_client(0)?;
        if let Err(e) = auth::login(&mut client, USER_EMAIL, USER_PASSWORD).await {
            return Err(format!("login error: {}", e));
        }
        let data = user::UpdateReqData {
            name: Some("Renamed User".to_string()),
            phone: Some("0987654321".to_string()),
            ..Default::default()
        };
        let profile = match user::update(&mut client, &data).await {
            Err(e) => return Err(format!("update error: {}", e)),
            Ok(profile) => profile,
        };
        expect(profile.name).to_equal(Some("Renamed User".to_string()))?;
        expect(profile.phone).to_equal(Some("0987654321".to_string()))?;

        // The change is visible to subsequent reads.
        let profile = match user::get(&mut client).await {
            Err(e) => return Err(format!("get error: {}", e)),
            Ok(profile) => profile,
        };
        expect(profile.name).to_equal(Some("Renamed User".to_string()))
    })?;

    Ok(())
}
