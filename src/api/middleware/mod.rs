pub mod access;
pub mod request_id;

pub use access::{LinkAccessGuard, access_cookie_name, authorize};
pub use request_id::{RequestId, RequestIdMiddleware};
