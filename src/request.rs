use reqwest::{Client, Request};

use crate::config::Credentials;
use crate::{error_time, Error, Result};

/// Builds the structured scopes request for a single program.
/// The handle is interpolated as-is, and no query parameters are added.
pub fn scopes_request(
    client: &Client,
    api_base: &str,
    identifier: &str,
    credentials: &Credentials,
) -> Result<Request> {
    client
        .get(format!(
            "{api_base}/v1/hackers/programs/{identifier}/structured_scopes"
        ))
        .basic_auth(credentials.username(), Some(credentials.key()))
        .build()
        .map_err(|source| Error::Url {
            identifier: identifier.to_string(),
            source,
        })
}

/// Sends the request and returns the whole body, untouched.
/// The status code is not an error here: whatever the API answered gets recorded.
pub async fn fetch_scopes(client: &Client, request: Request, identifier: &str) -> Result<Vec<u8>> {
    let res = client
        .execute(request)
        .await
        .map_err(|source| Error::Request {
            identifier: identifier.to_string(),
            source,
        })?;

    let status = res.status();
    if !status.is_success() {
        error_time!("program {} answered with HTTP {}", identifier, status);
    }

    let body = res.bytes().await.map_err(|source| Error::Body {
        identifier: identifier.to_string(),
        source,
    })?;
    Ok(body.to_vec())
}
