pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_cookies, parse_request, HttpRequest};
pub use response::{status_reason, ResponseWriter};
pub use service::AppService;
