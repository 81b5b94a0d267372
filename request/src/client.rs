//! Hand-off to a blocking `reqwest` client.

use reqwest::blocking::{Client, Request};
use reqwest::header::HOST;
use reqwest::redirect::Policy;

use crate::description::RequestDescription;
use crate::error::{Result, TranslateError};

impl RequestDescription {
    /// Builds a client honoring [`ClientOptions`](crate::ClientOptions) and
    /// the request to send with it. The body stays lazy.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::InvalidRequest`] if the method, a header, or
    /// the client configuration is rejected by `reqwest`.
    pub fn into_reqwest(self) -> Result<(Client, Request)> {
        let Self {
            method,
            url,
            host,
            headers,
            body,
            client,
        } = self;

        let policy = if client.follow_redirects {
            Policy::default()
        } else {
            Policy::none()
        };
        let http = Client::builder()
            .danger_accept_invalid_certs(client.insecure_transport)
            .redirect(policy)
            .build()
            .map_err(|err| TranslateError::InvalidRequest(err.to_string()))?;

        let method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|err| TranslateError::InvalidRequest(err.to_string()))?;
        let mut request = http.request(method, url);
        if let Some(host) = &host {
            request = request.header(HOST, host.as_str());
        }
        for (key, value) in &headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(reqwest::blocking::Body::new(body.into_reader()));
        }

        let request = request
            .build()
            .map_err(|err| TranslateError::InvalidRequest(err.to_string()))?;
        Ok((http, request))
    }
}

#[cfg(test)]
mod tests {
    use crate::translate;

    #[test]
    fn test_into_reqwest_carries_method_and_headers() {
        let desc = translate(&["curl", "-X", "PATCH", "-A", "ua/1", "-d", "a=b", "example.com"])
            .unwrap();
        let (_client, request) = desc.into_reqwest().unwrap();
        assert_eq!(request.method().as_str(), "PATCH");
        assert_eq!(request.url().as_str(), "http://example.com/");
        assert_eq!(request.headers()["user-agent"], "ua/1");
        assert_eq!(
            request.headers()["content-type"],
            "application/x-www-form-urlencoded"
        );
        assert!(request.body().is_some());
    }

    #[test]
    fn test_into_reqwest_rejects_bad_method() {
        let desc = translate(&["curl", "-X", "GE T", "example.com"]).unwrap();
        assert!(desc.into_reqwest().is_err());
    }
}
