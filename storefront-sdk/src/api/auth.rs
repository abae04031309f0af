//! Account authentication operations. Successful responses are captured by the client itself, so
//! calling [`login`] is all it takes to start an authenticated session.

use bytes::Bytes;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::http::{ApiPath, Client, Error};
use crate::session::Profile;

/// Response data of `POST /login` and `POST /register`.
#[derive(Debug, Deserialize, Serialize)]
pub struct AuthResData {
    pub access_token: String,
    pub refresh_token: String,
    pub user: Profile,
}

#[derive(Deserialize)]
struct AuthRes {
    data: AuthResData,
}

#[derive(Serialize)]
struct PostAccountReq<'a> {
    email: &'a str,
    password: &'a str,
}

/// `POST /login`
pub async fn login(
    client: &mut Client,
    email: &str,
    password: &str,
) -> Result<AuthResData, Error> {
    account_request(client, ApiPath::LOGIN, email, password).await
}

/// `POST /register`
pub async fn register(
    client: &mut Client,
    email: &str,
    password: &str,
) -> Result<AuthResData, Error> {
    account_request(client, ApiPath::REGISTER, email, password).await
}

/// `POST /logout`
///
/// The client clears local credentials for any success response, regardless of the body.
pub async fn logout(client: &mut Client) -> Result<(), Error> {
    let _ = client.request(Method::POST, ApiPath::LOGOUT, None).await?;
    Ok(())
}

/// `POST /refresh-token` through the shared refresh operation. Returns the new access token.
pub async fn refresh(client: &mut Client) -> Result<String, Error> {
    client.refresh_access_token().await
}

async fn account_request(
    client: &mut Client,
    api_path: &str,
    email: &str,
    password: &str,
) -> Result<AuthResData, Error> {
    let body = match serde_json::to_vec(&PostAccountReq { email, password }) {
        Err(e) => return Err(Error::Std(Box::new(e))),
        Ok(body) => Some(Bytes::from(body)),
    };
    let (_, body) = client.request(Method::POST, api_path, body).await?;
    match serde_json::from_slice::<AuthRes>(&body) {
        Err(e) => Err(Error::Std(Box::new(e))),
        Ok(res) => Ok(res.data),
    }
}
