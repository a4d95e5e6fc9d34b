use reqwest::StatusCode;
use serde::Serialize;

use crate::{ApiClient, Error};

/// Body of a customer request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub device: String,
    pub unit: String,
    pub bed: String,
    pub room: String,
    pub msg: String,
    pub organization_id: String,
    pub organization_env: String,
    pub source: String,
}

impl Default for CustomerRequest {
    fn default() -> Self {
        CustomerRequest {
            device: "mydevice".to_string(),
            unit: "myunit".to_string(),
            bed: "mybed".to_string(),
            room: "myroom".to_string(),
            msg: "somemsg".to_string(),
            organization_id: "cshs".to_string(),
            organization_env: "SUP".to_string(),
            source: "R5".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The API answered `204 No Content`
    Accepted,
    /// Any other status. Auth failures are not told apart from the rest.
    Rejected { status_line: String, body: String },
}

pub struct CustomerRequestSender<'a> {
    client: &'a dyn ApiClient,
}

impl<'a> CustomerRequestSender<'a> {
    const URL: &'static str = "/v1/customer/request";

    pub fn new(client: &'a dyn ApiClient) -> Self {
        Self { client }
    }

    /// Sends `request` once. Only transport failures are errors.
    pub fn send(&self, request: &CustomerRequest) -> Result<RequestOutcome, Error> {
        let body = serde_json::to_value(request).map_err(Error::Encode)?;
        let response = self.client.http_post(CustomerRequestSender::URL, &body)?;

        if response.status == StatusCode::NO_CONTENT {
            return Ok(RequestOutcome::Accepted);
        }
        Ok(RequestOutcome::Rejected {
            status_line: response.status_line(),
            body: response.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use reqwest::Version;
    use serde_json::json;

    use super::*;
    use crate::api::ApiResponse;

    struct FakeClient {
        status: StatusCode,
        body: &'static str,
        requests: RefCell<Vec<(String, serde_json::Value)>>,
    }

    impl FakeClient {
        fn answering(status: StatusCode, body: &'static str) -> Self {
            FakeClient {
                status,
                body,
                requests: RefCell::new(vec![]),
            }
        }
    }

    impl ApiClient for FakeClient {
        fn http_post(&self, path: &str, body: &serde_json::Value) -> Result<ApiResponse, Error> {
            self.requests
                .borrow_mut()
                .push((path.to_string(), body.clone()));
            Ok(ApiResponse {
                status: self.status,
                version: Version::HTTP_11,
                body: self.body.to_string(),
            })
        }
    }

    #[test]
    fn posts_fixed_payload() {
        let client = FakeClient::answering(StatusCode::NO_CONTENT, "");

        let outcome = CustomerRequestSender::new(&client)
            .send(&CustomerRequest::default())
            .unwrap();

        assert_eq!(outcome, RequestOutcome::Accepted);
        let requests = client.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "/v1/customer/request");
        assert_eq!(
            requests[0].1,
            json!({
                "device": "mydevice",
                "unit": "myunit",
                "bed": "mybed",
                "room": "myroom",
                "msg": "somemsg",
                "organizationId": "cshs",
                "organizationEnv": "SUP",
                "source": "R5",
            })
        );
    }

    #[test]
    fn only_no_content_is_success() {
        let client = FakeClient::answering(StatusCode::OK, "{}");

        let outcome = CustomerRequestSender::new(&client)
            .send(&CustomerRequest::default())
            .unwrap();

        assert_eq!(
            outcome,
            RequestOutcome::Rejected {
                status_line: "HTTP/1.1 200 OK".to_string(),
                body: "{}".to_string(),
            }
        );
    }

    #[test]
    fn bad_request_keeps_body() {
        let client = FakeClient::answering(StatusCode::BAD_REQUEST, "{\"error\":\"bad bed\"}");

        let outcome = CustomerRequestSender::new(&client)
            .send(&CustomerRequest::default())
            .unwrap();

        match outcome {
            RequestOutcome::Rejected { status_line, body } => {
                assert_eq!(status_line, "HTTP/1.1 400 Bad Request");
                assert_eq!(body, "{\"error\":\"bad bed\"}");
            }
            RequestOutcome::Accepted => panic!("400 must not be accepted"),
        }
    }
}
