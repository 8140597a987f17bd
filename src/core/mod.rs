// Core module - Token exchange, Graph access and the listing pipeline
pub mod auth;
pub mod graph;
pub mod lister;
pub mod transport;

pub use lister::Lister;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
