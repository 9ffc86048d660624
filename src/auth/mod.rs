//! User registration, log-in and the bearer tokens that guard the
//! transaction routes.

mod demo;
mod log_in;
mod middleware;
mod register;
mod token;

pub use demo::{DEMO_FALLBACK_USER_ID, DEMO_USERNAME, demo_log_in, ensure_demo_user};
pub use log_in::{Credentials, TokenResponse, log_in};
pub use middleware::auth_guard;
pub use register::register_user;
pub use token::{Claims, TOKEN_DURATION, TokenKeys, decode_token, encode_claims, encode_token};
