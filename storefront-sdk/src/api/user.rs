use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::http::{ApiPath, Client, Error};
use crate::session::Profile;

/// Request data of `PUT /user`. Unset fields are left unchanged by the server.
#[derive(Default, Serialize)]
pub struct UpdateReqData {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

#[derive(Deserialize)]
struct GetRes {
    data: Profile,
}

/// `GET /me`
pub async fn get(client: &mut Client) -> Result<Profile, Error> {
    let (_, body) = client.request(Method::GET, ApiPath::ME, None).await?;
    match serde_json::from_slice::<GetRes>(&body) {
        Err(e) => Err(Error::Std(Box::new(e))),
        Ok(res) => Ok(res.data),
    }
}

/// `PUT /user`
pub async fn update(client: &mut Client, data: &UpdateReqData) -> Result<Profile, Error> {
    let body = match serde_json::to_vec(data) {
        Err(e) => return Err(Error::Std(Box::new(e))),
        Ok(body) => Some(Bytes::from(body)),
    };
    let (_, body) = client.request(Method::PUT, ApiPath::USER, body).await?;
    match serde_json::from_slice::<GetRes>(&body) {
        Err(e) => Err(Error::Std(Box::new(e))),
        Ok(res) => Ok(res.data),
    }
}
