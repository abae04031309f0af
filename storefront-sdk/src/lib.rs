//! SDK for the storefront REST API. It provides:
//!
//! - An authenticated HTTP client ([`api::http::Client`]) that attaches the access token to every
//!   request, persists credentials in a [`storage::CredentialStore`], and recovers expired access
//!   tokens transparently with a single shared refresh operation.
//! - Typed API operations on top of the client: accounts ([`api::auth`], [`api::user`]), the
//!   catalog ([`api::product`], [`api::category`]) and the cart ([`api::purchase`]).
//!
//! Here is an example to log in and read the cart:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use storefront_sdk::{
//!     api::{auth, http::{Client, ClientOptions}, purchase},
//!     storage::MemoryStore,
//! };
//!
//! async fn example() {
//!     let opts = ClientOptions {
//!         api_base: "http://localhost:4000".to_string(),
//!         ..Default::default()
//!     };
//!     let mut client = Client::new(opts, Arc::new(MemoryStore::default())).unwrap();
//!     auth::login(&mut client, "user@example.com", "password").await.unwrap();
//!     let purchases = purchase::list(&mut client, purchase::Status::IN_CART).await.unwrap();
//!     println!("{} item(s) in cart", purchases.len());
//! }
//! ```

use rand::{Rng, distributions::Alphanumeric, thread_rng};

pub mod api;
pub mod session;
pub mod storage;
pub mod util;

/// Identifier length of event handlers.
pub(crate) const ID_SIZE: usize = 24;

/// Generate random alphanumeric with the specified length.
pub(crate) fn randomstring(len: usize) -> String {
    let mut rng = thread_rng();
    std::iter::repeat(())
        .map(|()| rng.sample(Alphanumeric))
        .map(char::from)
        .take(len)
        .collect()
}
