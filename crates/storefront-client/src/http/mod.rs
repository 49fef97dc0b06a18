//! HTTP plumbing

mod renewer;
mod transport;

pub use renewer::{HttpTokenRenewer, REFRESH_PATH};
pub use transport::HttpTransport;
