use laboratory::{SpecContext, Suite, describe, expect};

use storefront_sdk::api::{auth, http::Error};

use super::{STATE, after_all_fn, before_all_fn, new_client};
use crate::{TestState, USER_EMAIL, USER_PASSWORD};

pub fn suite() -> Suite<TestState> {
    describe("auth", |context| {
        context.it("login()", test_login);
        context.it("register()", test_register);
        context.it("register() with duplicate email", test_register_dup);
        context.it("refresh()", test_refresh);
        context.it("logout()", test_logout);

        context.before_all(before_all_fn).after_all(after_all_fn);
    })
}

fn test_login(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();

    runtime.block_on(async move {
        let (mut client, _) = new_client(0)?;
        let data = match auth::login(&mut client, USER_EMAIL, USER_PASSWORD).await {
            Err(e) => return Err(format!("login error: {}", e)),
            Ok(data) => data,
        };
        expect(data.access_token.len() > 0).to_equal(true)?;
        expect(data.refresh_token.len() > 0).to_equal(true)?;
        expect(data.user.email).to_equal(USER_EMAIL.to_string())
    })?;

    Ok(())
}

fn test_register(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();

    runtime.block_on(async move {
        let (mut client, _) = new_client(0)?;
        let data = match auth::register(&mut client, "new@example.com", "secret").await {
            Err(e) => return Err(format!("register error: {}", e)),
            Ok(data) => data,
        };
        expect(data.user.email).to_equal("new@example.com".to_string())?;
        // Registration starts an authenticated session immediately.
        expect(client.session().is_authenticated()).to_equal(true)
    })?;

    Ok(())
}

fn test_register_dup(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();

    runtime.block_on(async move {
        let (mut client, _) = new_client(0)?;
        match auth::register(&mut client, USER_EMAIL, "secret").await {
            Err(Error::Validation(errors)) => {
                expect(errors.data.contains_key("email")).to_equal(true)
            }
            Err(e) => Err(format!("not a validation error: {}", e)),
            Ok(_) => Err("register should fail".to_string()),
        }
    })?;

    Ok(())
}

fn test_refresh(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();

    runtime.block_on(async move {
        let (mut client, _) = new_client(100)?;
        if let Err(e) = auth::login(&mut client, USER_EMAIL, USER_PASSWORD).await {
            return Err(format!("login error: {}", e));
        }
        let old_token = client.session().access_token().to_string();
        let token = match auth::refresh(&mut client).await {
            Err(e) => return Err(format!("refresh error: {}", e)),
            Ok(token) => token,
        };
        expect(token.ne(&old_token)).to_equal(true)?;
        expect(client.session().access_token().to_string()).to_equal(token)
    })?;

    Ok(())
}

fn test_logout(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();

    runtime.block_on(async move {
        let (mut client, _) = new_client(0)?;
        if let Err(e) = auth::login(&mut client, USER_EMAIL, USER_PASSWORD).await {
            return Err(format!("login error: {}", e));
        }
        if let Err(e) = auth::logout(&mut client).await {
            return Err(format!("logout error: {}", e));
        }
        expect(client.session().is_authenticated()).to_equal(false)
    })?;

    Ok(())
}
