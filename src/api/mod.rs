use reqwest::{StatusCode, Version};

pub mod customer;

/// Status and body of a completed API call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub version: Version,
    pub body: String,
}

impl ApiResponse {
    /// e.g. `HTTP/1.1 400 Bad Request`
    pub fn status_line(&self) -> String {
        format!("{:?} {}", self.version, self.status)
    }
}
