pub mod request_id;
pub mod security_headers;

pub use request_id::{get_request_id, request_id_middleware, REQUEST_ID_HEADER};
pub use security_headers::{security_headers_middleware, SecurityHeadersConfig};
