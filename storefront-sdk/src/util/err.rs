//! Error vocabulary of the storefront API.

/// 401, the access token has expired. The session can be recovered with the refresh token.
pub const E_EXPIRED_TOKEN: &'static str = "EXPIRED_TOKEN";
