//! Cart specs run as one story against the suite's mock state: add, list, update, buy, delete.

use laboratory::{SpecContext, Suite, describe, expect};

use storefront_sdk::api::{
    auth,
    http::Client,
    purchase::{self, BuyItem, Status},
};

use super::{STATE, after_all_fn, before_all_fn, new_client};
use crate::{TestState, USER_EMAIL, USER_PASSWORD};

pub fn suite() -> Suite<TestState> {
    describe("purchase", |context| {
        context.it("add_to_cart()", test_add_to_cart);
        context.it("add_to_cart() merges lines", test_add_merge);
        context.it("list()", test_list);
        context.it("update()", test_update);
        context.it("buy()", test_buy);
        context.it("delete()", test_delete);

        context.before_all(before_all_fn).after_all(after_all_fn);
    })
}

async fn login_client(refresh_hold_millis: u64) -> Result<Client, String> {
    let (mut client, _) = new_client(refresh_hold_millis)?;
    match auth::login(&mut client, USER_EMAIL, USER_PASSWORD).await {
        Err(e) => Err(format!("login error: {}", e)),
        Ok(_) => Ok(client),
    }
}

fn test_add_to_cart(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();

    runtime.block_on(async move {
        let mut client = login_client(0).await?;
        let purchase = match purchase::add_to_cart(&mut client, "p-keyboard", 2).await {
            Err(e) => return Err(format!("add error: {}", e)),
            Ok(purchase) => purchase,
        };
        expect(purchase.status).to_equal(Status::IN_CART)?;
        expect(purchase.buy_count).to_equal(2)?;
        expect(purchase.product.product_id.clone()).to_equal("p-keyboard".to_string())?;
        expect(purchase.price).to_equal(120)
    })?;

    Ok(())
}

fn test_add_merge(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();

    runtime.block_on(async move {
        let mut client = login_client(0).await?;
        let purchase = match purchase::add_to_cart(&mut client, "p-keyboard", 1).await {
            Err(e) => return Err(format!("add error: {}", e)),
            Ok(purchase) => purchase,
        };
        // The same product stays one cart line with a summed count.
        expect(purchase.buy_count).to_equal(3)
    })?;

    Ok(())
}

fn test_list(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();

    runtime.block_on(async move {
        let mut client = login_client(0).await?;
        let purchases = match purchase::list(&mut client, Status::IN_CART).await {
            Err(e) => return Err(format!("list error: {}", e)),
            Ok(purchases) => purchases,
        };
        expect(purchases.len()).to_equal(1)?;
        expect(purchases[0].product.product_id.clone()).to_equal("p-keyboard".to_string())
    })?;

    Ok(())
}

fn test_update(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();

    runtime.block_on(async move {
        let mut client = login_client(0).await?;
        let purchase = match purchase::update(&mut client, "p-keyboard", 5).await {
            Err(e) => return Err(format!("update error: {}", e)),
            Ok(purchase) => purchase,
        };
        expect(purchase.buy_count).to_equal(5)?;
        expect(purchase.status).to_equal(Status::IN_CART)
    })?;

    Ok(())
}

fn test_buy(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();

    runtime.block_on(async move {
        let mut client = login_client(0).await?;
        let items = vec![BuyItem {
            product_id: "p-keyboard".to_string(),
            buy_count: 5,
        }];
        let purchases = match purchase::buy(&mut client, &items).await {
            Err(e) => return Err(format!("buy error: {}", e)),
            Ok(purchases) => purchases,
        };
        expect(purchases.len()).to_equal(1)?;
        expect(purchases[0].status).to_equal(Status::WAIT_FOR_CONFIRMATION)?;

        // The cart is empty and the order shows up in the history.
        let in_cart = match purchase::list(&mut client, Status::IN_CART).await {
            Err(e) => return Err(format!("list error: {}", e)),
            Ok(purchases) => purchases,
        };
        expect(in_cart.len()).to_equal(0)?;
        let orders = match purchase::list(&mut client, Status::ALL).await {
            Err(e) => return Err(format!("list error: {}", e)),
            Ok(purchases) => purchases,
        };
        expect(orders.len()).to_equal(1)
    })?;

    Ok(())
}

fn test_delete(context: &mut SpecContext<TestState>) -> Result<(), String> {
    let state = context.state.borrow();
    let state = state.get(STATE).unwrap();
    let runtime = state.runtime.as_ref().unwrap();

    runtime.block_on(async move {
        let mut client = login_client(0).await?;
        let purchase = match purchase::add_to_cart(&mut client, "p-mouse", 1).await {
            Err(e) => return Err(format!("add error: {}", e)),
            Ok(purchase) => purchase,
        };
        let deleted = match purchase::delete(&mut client, &[purchase.purchase_id]).await {
            Err(e) => return Err(format!("delete error: {}", e)),
            Ok(deleted) => deleted,
        };
        expect(deleted).to_equal(1)?;
        let in_cart = match purchase::list(&mut client, Status::IN_CART).await {
            Err(e) => return Err(format!("list error: {}", e)),
            Ok(purchases) => purchases,
        };
        expect(in_cart.len()).to_equal(0)
    })?;

    Ok(())
}
