//! splist library
//!
//! Lists the files of a SharePoint document library through Microsoft Graph
//! using the OAuth2 client-credentials flow, and writes them as JSON.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use domain::error::{ListerError, ListerResult};
pub use domain::config::{Credentials, ListerConfig, ListerSettings};
pub use domain::model::{FileRecord, OutputDocument};
pub use crate::core::{HttpRequest, HttpResponse, HttpTransport, Lister, TransportError};
