//! Cart and order operations. A purchase moves through the [`Status`] codes from in-cart to
//! delivered or cancelled; listing filters on one status code or [`Status::ALL`].

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{
    http::{ApiPath, Client, Error},
    product::Product,
};

/// Purchase status codes.
pub struct Status;

impl Status {
    pub const IN_CART: i32 = -1;
    /// Every status except the cart. Only valid as a listing filter.
    pub const ALL: i32 = 0;
    pub const WAIT_FOR_CONFIRMATION: i32 = 1;
    pub const WAIT_FOR_GETTING: i32 = 2;
    pub const IN_PROGRESS: i32 = 3;
    pub const DELIVERED: i32 = 4;
    pub const CANCELLED: i32 = 5;
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Purchase {
    #[serde(rename = "_id")]
    pub purchase_id: String,
    /// Owning user ID.
    pub user: String,
    pub product: Product,
    pub buy_count: u64,
    /// Unit price at purchase time.
    pub price: u64,
    pub price_before_discount: u64,
    pub status: i32,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One cart line for [`add_to_cart`], [`update`] and [`buy`].
#[derive(Clone, Serialize)]
pub struct BuyItem {
    pub product_id: String,
    pub buy_count: u64,
}

#[derive(Deserialize)]
struct GetRes {
    data: Purchase,
}

#[derive(Deserialize)]
struct GetListRes {
    data: Vec<Purchase>,
}

#[derive(Deserialize)]
struct DeleteRes {
    data: DeleteResData,
}

#[derive(Deserialize)]
struct DeleteResData {
    deleted_count: u64,
}

/// `POST /purchases/add-to-cart`
pub async fn add_to_cart(
    client: &mut Client,
    product_id: &str,
    buy_count: u64,
) -> Result<Purchase, Error> {
    let item = BuyItem {
        product_id: product_id.to_string(),
        buy_count,
    };
    let body = match serde_json::to_vec(&item) {
        Err(e) => return Err(Error::Std(Box::new(e))),
        Ok(body) => Some(Bytes::from(body)),
    };
    let (_, body) = client
        .request(Method::POST, ApiPath::PURCHASES_ADD_TO_CART, body)
        .await?;
    match serde_json::from_slice::<GetRes>(&body) {
        Err(e) => Err(Error::Std(Box::new(e))),
        Ok(res) => Ok(res.data),
    }
}

/// `GET /purchases?status={status}`
pub async fn list(client: &mut Client, status: i32) -> Result<Vec<Purchase>, Error> {
    let api_path = format!("{}?status={}", ApiPath::PURCHASES, status);
    let (_, body) = client.request(Method::GET, api_path.as_str(), None).await?;
    match serde_json::from_slice::<GetListRes>(&body) {
        Err(e) => Err(Error::Std(Box::new(e))),
        Ok(res) => Ok(res.data),
    }
}

/// `PUT /purchases/update-purchase`
///
/// Replace the buy count of the in-cart purchase of `product_id`.
pub async fn update(
    client: &mut Client,
    product_id: &str,
    buy_count: u64,
) -> Result<Purchase, Error> {
    let item = BuyItem {
        product_id: product_id.to_string(),
        buy_count,
    };
    let body = match serde_json::to_vec(&item) {
        Err(e) => return Err(Error::Std(Box::new(e))),
        Ok(body) => Some(Bytes::from(body)),
    };
    let (_, body) = client
        .request(Method::PUT, ApiPath::PURCHASES_UPDATE, body)
        .await?;
    match serde_json::from_slice::<GetRes>(&body) {
        Err(e) => Err(Error::Std(Box::new(e))),
        Ok(res) => Ok(res.data),
    }
}

/// `POST /purchases/buy-products`
///
/// Place an order for the given items. Matching in-cart purchases move to
/// [`Status::WAIT_FOR_CONFIRMATION`].
pub async fn buy(client: &mut Client, items: &[BuyItem]) -> Result<Vec<Purchase>, Error> {
    let body = match serde_json::to_vec(items) {
        Err(e) => return Err(Error::Std(Box::new(e))),
        Ok(body) => Some(Bytes::from(body)),
    };
    let (_, body) = client
        .request(Method::POST, ApiPath::PURCHASES_BUY, body)
        .await?;
    match serde_json::from_slice::<GetListRes>(&body) {
        Err(e) => Err(Error::Std(Box::new(e))),
        Ok(res) => Ok(res.data),
    }
}

/// `DELETE /purchases`
///
/// Remove in-cart purchases by ID. Returns the number of removed purchases.
pub async fn delete(client: &mut Client, purchase_ids: &[String]) -> Result<u64, Error> {
    let body = match serde_json::to_vec(purchase_ids) {
        Err(e) => return Err(Error::Std(Box::new(e))),
        Ok(body) => Some(Bytes::from(body)),
    };
    let (_, body) = client
        .request(Method::DELETE, ApiPath::PURCHASES, body)
        .await?;
    match serde_json::from_slice::<DeleteRes>(&body) {
        Err(e) => Err(Error::Std(Box::new(e))),
        Ok(res) => Ok(res.data.deleted_count),
    }
}
