//! Catalog browsing. Product lists are filtered, sorted and paged through URL query parameters,
//! so a listing can be addressed by a single URL.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{
    category::Category,
    http::{ApiPath, Client, Error},
};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub product_id: String,
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
    pub price: u64,
    pub price_before_discount: u64,
    pub quantity: u64,
    pub sold: u64,
    pub view: u64,
    pub rating: f64,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Query parameters of `GET /products`. Unset fields are omitted from the query string.
#[derive(Clone, Default, Serialize)]
pub struct ListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// One of the [`SortBy`] values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// One of the [`Order`] values. Only meaningful with `sort_by`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Category ID filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Product ID to exclude, used for related-product listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
    /// Minimum rating, 1 to 5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_filter: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_max: Option<u64>,
    /// Name search term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Sort keys for [`ListOptions::sort_by`].
pub struct SortBy;

/// Sort directions for [`ListOptions::order`].
pub struct Order;

impl SortBy {
    pub const CREATED_AT: &'static str = "createdAt";
    pub const VIEW: &'static str = "view";
    pub const SOLD: &'static str = "sold";
    pub const PRICE: &'static str = "price";
}

impl Order {
    pub const ASC: &'static str = "asc";
    pub const DESC: &'static str = "desc";
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub page_size: u64,
}

/// Response data of `GET /products`.
#[derive(Debug, Deserialize, Serialize)]
pub struct ListResData {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

#[derive(Deserialize)]
struct GetListRes {
    data: ListResData,
}

#[derive(Deserialize)]
struct GetRes {
    data: Product,
}

/// `GET /products`
pub async fn list(client: &mut Client, opts: &ListOptions) -> Result<ListResData, Error> {
    let query = match serde_urlencoded::to_string(opts) {
        Err(e) => return Err(Error::Std(Box::new(e))),
        Ok(query) => query,
    };
    let api_path = match query.len() {
        0 => ApiPath::PRODUCTS.to_string(),
        _ => format!("{}?{}", ApiPath::PRODUCTS, query),
    };
    let (_, body) = client.request(Method::GET, api_path.as_str(), None).await?;
    match serde_json::from_slice::<GetListRes>(&body) {
        Err(e) => Err(Error::Std(Box::new(e))),
        Ok(res) => Ok(res.data),
    }
}

/// `GET /products/{id}`
pub async fn get(client: &mut Client, product_id: &str) -> Result<Product, Error> {
    let api_path = format!("{}/{}", ApiPath::PRODUCTS, product_id);
    let (_, body) = client.request(Method::GET, api_path.as_str(), None).await?;
    match serde_json::from_slice::<GetRes>(&body) {
        Err(e) => Err(Error::Std(Box::new(e))),
        Ok(res) => Ok(res.data),
    }
}
