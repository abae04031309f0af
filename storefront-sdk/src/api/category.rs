use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::http::{ApiPath, Client, Error};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub category_id: String,
    pub name: String,
}

#[derive(Deserialize)]
struct GetListRes {
    data: Vec<Category>,
}

/// `GET /categories`
pub async fn list(client: &mut Client) -> Result<Vec<Category>, Error> {
    let (_, body) = client.request(Method::GET, ApiPath::CATEGORIES, None).await?;
    match serde_json::from_slice::<GetListRes>(&body) {
        Err(e) => Err(Error::Std(Box::new(e))),
        Ok(res) => Ok(res.data),
    }
}
