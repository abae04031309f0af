//! A wrapped HTTP client for the storefront APIs with the following features:
//! - Attach the stored access token to every outgoing request.
//! - Capture the token pair and profile from login/registration/refresh responses and persist
//!   them in the injected [`CredentialStore`].
//! - Recover expired access tokens transparently: concurrent requests failing with an
//!   expired-token response share one refresh operation, then each replays itself once with the
//!   new token.
//!
//! Here is an example to create a client and call an API:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use reqwest::Method;
//! use storefront_sdk::{
//!     api::http::{Client, ClientOptions},
//!     storage::FileStore,
//! };
//!
//! async fn example() {
//!     let opts = ClientOptions {
//!         api_base: "http://localhost:4000".to_string(),
//!         ..Default::default()
//!     };
//!     let store = Arc::new(FileStore::new(".storefront.json"));
//!     let mut client = Client::new(opts, store).unwrap();
//!     match client.request(Method::GET, "/products", None).await {
//!         Err(e) => {
//!             // Handle error.
//!             // Transport, validation and session errors must be handled in this arm.
//!         }
//!         Ok((status_code, body)) => {
//!             // Handle response. Only success status codes reach this arm.
//!         }
//!     }
//! }
//! ```

use std::{
    collections::HashMap,
    error::Error as StdError,
    fmt,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt, Shared};
use log::{error, warn};
use reqwest::{Client as ReqwestClient, Method, StatusCode, header};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::{task, time};

use crate::{
    ID_SIZE, randomstring,
    session::{Profile, Session},
    storage::CredentialStore,
    util::err,
};

/// The HTTP client to request storefront APIs. With this client, you do not need to handle the
/// 401 refresh token flow.
#[derive(Clone)]
pub struct Client {
    /// The underlying HTTP client instance.
    client: ReqwestClient,
    /// API base path.
    api_base: String,
    /// How long a settled refresh operation stays shared, in milliseconds.
    refresh_hold_millis: u64,
    /// Session credentials, shared between clones of this client.
    session: Arc<Mutex<Session>>,
    /// The injected credential storage engine.
    store: Arc<dyn CredentialStore>,
    /// The shared in-flight refresh operation.
    refresh_op: Arc<Mutex<Option<RefreshOp>>>,
    /// Event handlers.
    handlers: Arc<Mutex<HashMap<String, Arc<dyn EventHandler>>>>,
}

/// Options of the HTTP client [`Client`].
pub struct ClientOptions {
    /// API base path with scheme and without a trailing slash. For example
    /// `http://localhost:4000`.
    pub api_base: String,
    /// Request timeout in milliseconds.
    ///
    /// Default or zero value is `10000`.
    pub timeout_millis: u64,
    /// Time in milliseconds a settled refresh operation is kept before it is discarded, so that a
    /// burst of requests failing around the same moment converges on one refresh call.
    ///
    /// Default or zero value is `10000`.
    pub refresh_hold_millis: u64,
}

#[derive(Debug)]
pub enum Error {
    /// Transport, timeout or body-decoding error.
    Std(Box<dyn StdError + Send + Sync>),
    /// Error response with any status other than 401/422. The user has been notified through
    /// [`EventHandler::on_notice`].
    Api(ErrorResponse),
    /// 422 response, untouched for field-level handling.
    Validation(ValidationErrors),
    /// Unrecoverable authorization failure. Credentials have been cleared and
    /// [`EventHandler::on_session_cleared`] has fired.
    Session(ErrorResponse),
}

/// The storefront API error response body.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status of the failing response. Zero when the request never completed.
    #[serde(skip)]
    pub status: u16,
    /// Top-level server message.
    pub message: Option<String>,
    /// The discriminating payload of 401 responses.
    pub data: Option<ApiErrorData>,
}

/// The `data` object of 401 responses that distinguishes the unauthorized cause.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiErrorData {
    /// Error name. [`err::E_EXPIRED_TOKEN`] means the access token expired and the session is
    /// recoverable.
    pub name: String,
    /// Detail message.
    pub message: Option<String>,
}

/// The 422 response body. `data` maps field names to messages.
#[derive(Debug, Deserialize)]
pub struct ValidationErrors {
    pub message: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// The event handler for sessions.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Triggered after credentials are cleared, by a logout or by an unrecoverable authorization
    /// failure.
    async fn on_session_cleared(&self, handler_id: String);

    /// Triggered with a user-facing message when a request fails with a generic server error or
    /// an unrecoverable authorization failure.
    async fn on_notice(&self, handler_id: String, message: String);
}

/// API paths with special meaning for the client.
pub struct ApiPath;

impl ApiPath {
    pub const LOGIN: &'static str = "/login";
    pub const REGISTER: &'static str = "/register";
    pub const LOGOUT: &'static str = "/logout";
    pub const REFRESH_TOKEN: &'static str = "/refresh-token";
    pub const ME: &'static str = "/me";
    pub const USER: &'static str = "/user";
    pub const PRODUCTS: &'static str = "/products";
    pub const CATEGORIES: &'static str = "/categories";
    pub const PURCHASES: &'static str = "/purchases";
    pub const PURCHASES_ADD_TO_CART: &'static str = "/purchases/add-to-cart";
    pub const PURCHASES_UPDATE: &'static str = "/purchases/update-purchase";
    pub const PURCHASES_BUY: &'static str = "/purchases/buy-products";
}

/// Response of authentication APIs. Refresh responses carry the access token only.
#[derive(Deserialize)]
struct AuthRes {
    data: AuthResData,
}

#[derive(Deserialize)]
struct AuthResData {
    access_token: String,
    refresh_token: Option<String>,
    user: Option<Profile>,
}

#[derive(serde::Serialize)]
struct PostRefreshReq<'a> {
    refresh_token: &'a str,
}

type RefreshOp = Shared<BoxFuture<'static, Result<String, ErrorResponse>>>;

/// Default request timeout in milliseconds.
const DEF_TIMEOUT_MS: u64 = 10000;
/// Default hold time of a settled refresh operation in milliseconds.
const DEF_REFRESH_HOLD_MS: u64 = 10000;

impl Client {
    /// Create an instance. The persisted session, if any, is loaded from the store.
    pub fn new(opts: ClientOptions, store: Arc<dyn CredentialStore>) -> Result<Self, Error> {
        let timeout_millis = match opts.timeout_millis {
            0 => DEF_TIMEOUT_MS,
            _ => opts.timeout_millis,
        };
        let client = match ReqwestClient::builder()
            .timeout(Duration::from_millis(timeout_millis))
            .build()
        {
            Err(e) => return Err(Error::Std(Box::new(e))),
            Ok(client) => client,
        };
        let session = Session::load(store.as_ref());
        Ok(Client {
            client,
            api_base: opts.api_base,
            refresh_hold_millis: match opts.refresh_hold_millis {
                0 => DEF_REFRESH_HOLD_MS,
                _ => opts.refresh_hold_millis,
            },
            session: Arc::new(Mutex::new(session)),
            store,
            refresh_op: Arc::new(Mutex::new(None)),
            handlers: Arc::new(Mutex::new(HashMap::<String, Arc<dyn EventHandler>>::new())),
        })
    }

    /// A snapshot of the current session.
    pub fn session(&self) -> Session {
        self.session.lock().unwrap().clone()
    }

    /// To add an event handler. This will return an identifier for applications to manage
    /// handlers.
    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) -> String {
        let id = randomstring(ID_SIZE);
        self.handlers.lock().unwrap().insert(id.clone(), handler);
        id
    }

    /// To remove a handler with an identifier from [`Client::add_handler`].
    pub fn remove_handler(&mut self, id: &str) {
        self.handlers.lock().unwrap().remove(id);
    }

    /// Execute a storefront API request.
    /// - `api_path` is the relative path (of the API base) with query string. For example:
    ///   `/products?page=1`, the client will do a request with
    ///   `http://api-host/products?page=1` URL.
    /// - `body` **MUST** be JSON format.
    ///
    /// Success status codes resolve to `Ok`. Everything else is classified: 422 responses become
    /// [`Error::Validation`], expired-token 401 responses are recovered by one shared refresh and
    /// a single replay, any other 401 clears the session, and remaining errors become
    /// [`Error::Api`] after notifying the registered handlers.
    pub async fn request(
        &mut self,
        method: Method,
        api_path: &str,
        body: Option<Bytes>,
    ) -> Result<(StatusCode, Bytes), Error> {
        const FN_NAME: &'static str = "request";

        let mut retry = 1;
        loop {
            let (status, resp_body) = self.send_once(method.clone(), api_path, body.clone()).await?;
            if status.is_success() {
                self.capture_auth_payload(api_path, &resp_body);
                return Ok((status, resp_body));
            }
            if status == StatusCode::UNPROCESSABLE_ENTITY {
                return Err(Error::Validation(parse_validation(&resp_body)));
            }
            let err_resp = parse_error(status, &resp_body);
            if status != StatusCode::UNAUTHORIZED {
                self.notify(err_resp.user_message());
                return Err(Error::Api(err_resp));
            }
            let expired = match err_resp.data.as_ref() {
                None => false,
                Some(data) => data.name.as_str() == err::E_EXPIRED_TOKEN,
            };
            if expired && retry > 0 && api_path != ApiPath::REFRESH_TOKEN {
                retry -= 1;
                match self.refresh_shared().await {
                    Err(e) => return Err(Error::Session(e)),
                    Ok(_) => continue,
                }
            }
            warn!("[{}] unrecoverable 401 for {}", FN_NAME, api_path);
            self.clear_session(FN_NAME);
            self.notify(err_resp.user_message());
            return Err(Error::Session(err_resp));
        }
    }

    /// Refresh the access token now, joining the in-flight operation when one exists. On failure
    /// the session has already been cleared.
    pub async fn refresh_access_token(&mut self) -> Result<String, Error> {
        match self.refresh_shared().await {
            Err(e) => Err(Error::Session(e)),
            Ok(token) => Ok(token),
        }
    }

    /// Send one request with the current access token attached. No classification, no replay.
    async fn send_once(
        &self,
        method: Method,
        api_path: &str,
        body: Option<Bytes>,
    ) -> Result<(StatusCode, Bytes), Error> {
        let url = format!("{}{}", self.api_base, api_path);
        let token = { self.session.lock().unwrap().access_token().to_string() };
        let mut builder = self.client.request(method, url.as_str());
        if token.len() > 0 {
            builder = builder.header(header::AUTHORIZATION, token.as_str());
        }
        if let Some(body) = body {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            builder = builder.body(body);
        }
        let req = match builder.build() {
            Err(e) => return Err(Error::Std(Box::new(e))),
            Ok(req) => req,
        };
        let resp = match self.client.execute(req).await {
            Err(e) => return Err(Error::Std(Box::new(e))),
            Ok(resp) => resp,
        };
        let status = resp.status();
        let resp_body = match resp.bytes().await {
            Err(e) => return Err(Error::Std(Box::new(e))),
            Ok(resp_body) => resp_body,
        };
        Ok((status, resp_body))
    }

    /// Join the in-flight refresh operation, or create one when none exists. The settled
    /// operation stays shared for the hold window before it is discarded.
    fn refresh_shared(&self) -> RefreshOp {
        let mut op_mutex = self.refresh_op.lock().unwrap();
        if let Some(op) = op_mutex.as_ref() {
            return op.clone();
        }
        let this = self.clone();
        let hold_millis = self.refresh_hold_millis;
        let op_cell = self.refresh_op.clone();
        let op: RefreshOp = async move {
            let result = this.do_refresh().await;
            task::spawn(async move {
                time::sleep(Duration::from_millis(hold_millis)).await;
                *op_cell.lock().unwrap() = None;
            });
            result
        }
        .boxed()
        .shared();
        *op_mutex = Some(op.clone());
        op
    }

    /// Issue the refresh request. Success stores the new access token; any failure ends the
    /// session: credentials are cleared once and every caller that joined the operation observes
    /// the same error.
    async fn do_refresh(&self) -> Result<String, ErrorResponse> {
        const FN_NAME: &'static str = "do_refresh";

        let (token, refresh_token) = {
            let session = self.session.lock().unwrap();
            (
                session.access_token().to_string(),
                session.refresh_token().to_string(),
            )
        };
        let url = format!("{}{}", self.api_base, ApiPath::REFRESH_TOKEN);
        let mut builder = self.client.post(url.as_str()).json(&PostRefreshReq {
            refresh_token: refresh_token.as_str(),
        });
        if token.len() > 0 {
            builder = builder.header(header::AUTHORIZATION, token.as_str());
        }
        let resp = match builder.send().await {
            Err(e) => {
                warn!("[{}] execute request error: {}", FN_NAME, e);
                let err_resp = ErrorResponse {
                    status: 0,
                    message: Some(e.to_string()),
                    data: None,
                };
                self.end_session(FN_NAME, &err_resp);
                return Err(err_resp);
            }
            Ok(resp) => resp,
        };
        let status = resp.status();
        let resp_body = match resp.bytes().await {
            Err(e) => {
                warn!("[{}] read body error: {}", FN_NAME, e);
                let err_resp = ErrorResponse {
                    status: status.as_u16(),
                    message: Some(e.to_string()),
                    data: None,
                };
                self.end_session(FN_NAME, &err_resp);
                return Err(err_resp);
            }
            Ok(resp_body) => resp_body,
        };
        if !status.is_success() {
            let err_resp = parse_error(status, &resp_body);
            warn!("[{}] refresh rejected with status {}", FN_NAME, status);
            self.end_session(FN_NAME, &err_resp);
            return Err(err_resp);
        }
        match serde_json::from_slice::<AuthRes>(&resp_body) {
            Err(e) => {
                warn!("[{}] unexpected token body: {}", FN_NAME, e);
                let err_resp = ErrorResponse {
                    status: status.as_u16(),
                    message: Some(e.to_string()),
                    data: None,
                };
                self.end_session(FN_NAME, &err_resp);
                Err(err_resp)
            }
            Ok(res) => {
                let access_token = res.data.access_token.clone();
                self.store_auth_payload(FN_NAME, res.data);
                Ok(access_token)
            }
        }
    }

    /// Handle success responses of the session endpoints: authentication payloads are persisted,
    /// logout clears the session. Other paths pass through untouched.
    fn capture_auth_payload(&self, api_path: &str, body: &Bytes) {
        const FN_NAME: &'static str = "capture_auth_payload";

        if api_path == ApiPath::LOGOUT {
            self.clear_session(FN_NAME);
            return;
        }
        if api_path != ApiPath::LOGIN
            && api_path != ApiPath::REGISTER
            && api_path != ApiPath::REFRESH_TOKEN
        {
            return;
        }
        match serde_json::from_slice::<AuthRes>(body) {
            Err(e) => warn!("[{}] unexpected body for {}: {}", FN_NAME, api_path, e),
            Ok(res) => self.store_auth_payload(FN_NAME, res.data),
        }
    }

    /// Write an authentication payload to the session and the store.
    fn store_auth_payload(&self, fn_name: &str, data: AuthResData) {
        let mut session = self.session.lock().unwrap();
        let result = match data.refresh_token.as_ref() {
            None => session.set_access_token(data.access_token.as_str(), self.store.as_ref()),
            Some(refresh_token) => session.set_tokens(
                data.access_token.as_str(),
                refresh_token.as_str(),
                self.store.as_ref(),
            ),
        };
        if let Err(e) = result {
            error!("[{}] write tokens error: {}", fn_name, e);
        }
        if let Some(user) = data.user {
            if let Err(e) = session.set_profile(user, self.store.as_ref()) {
                error!("[{}] write profile error: {}", fn_name, e);
            }
        }
    }

    /// Clear credentials, notify the user and log the cause. Used on refresh failures where all
    /// three side effects must happen exactly once, inside the shared operation.
    fn end_session(&self, fn_name: &str, err_resp: &ErrorResponse) {
        self.clear_session(fn_name);
        self.notify(err_resp.user_message());
    }

    /// Remove credentials from the session and the store, then fire
    /// [`EventHandler::on_session_cleared`] on every handler.
    fn clear_session(&self, fn_name: &str) {
        {
            let mut session = self.session.lock().unwrap();
            if let Err(e) = session.clear(self.store.as_ref()) {
                error!("[{}] clear store error: {}", fn_name, e);
            }
        }
        let handlers = { (*self.handlers.lock().unwrap()).clone() };
        for (id, handler) in handlers {
            task::spawn(async move {
                handler.on_session_cleared(id.clone()).await;
            });
        }
    }

    /// Fire [`EventHandler::on_notice`] on every handler.
    fn notify(&self, message: String) {
        let handlers = { (*self.handlers.lock().unwrap()).clone() };
        for (id, handler) in handlers {
            let message = message.clone();
            task::spawn(async move {
                handler.on_notice(id.clone(), message).await;
            });
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions {
            api_base: "http://localhost:4000".to_string(),
            timeout_millis: DEF_TIMEOUT_MS,
            refresh_hold_millis: DEF_REFRESH_HOLD_MS,
        }
    }
}

impl ErrorResponse {
    /// The user-facing message: the detail message when present, then the top-level one, then the
    /// status as a fallback.
    pub fn user_message(&self) -> String {
        if let Some(data) = self.data.as_ref() {
            if let Some(message) = data.message.as_ref() {
                return message.clone();
            }
        }
        match self.message.as_ref() {
            None => format!("unexpected status: {}", self.status),
            Some(message) => message.clone(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Std(e) => write!(f, "{}", e),
            Error::Api(e) => write!(f, "API error with status {}: {}", e.status, e.user_message()),
            Error::Validation(e) => write!(
                f,
                "validation error: {}",
                serde_json::to_string(&e.data).unwrap()
            ),
            Error::Session(e) => write!(f, "session ended: {}", e.user_message()),
        }
    }
}

impl StdError for Error {}

fn parse_error(status: StatusCode, body: &Bytes) -> ErrorResponse {
    let mut err_resp = match serde_json::from_slice::<ErrorResponse>(body) {
        Err(_) => ErrorResponse::default(),
        Ok(err_resp) => err_resp,
    };
    err_resp.status = status.as_u16();
    err_resp
}

fn parse_validation(body: &Bytes) -> ValidationErrors {
    match serde_json::from_slice::<ValidationErrors>(body) {
        Err(_) => ValidationErrors {
            message: None,
            data: Map::new(),
        },
        Ok(errors) => errors,
    }
}
