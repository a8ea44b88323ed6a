//! HTTP inventory endpoint.
//!
//! A plain-HTTP `GET` through hyper-util's pooled client. The whole exchange,
//! body included, is bounded by one timeout. Anything but a 2xx is an error.

use crate::error::SourceError;
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::Uri;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::Value;
use std::time::Duration;

/// Fetch `url` and decode the body as JSON.
pub async fn get_json(url: &str, timeout: Duration) -> Result<Value, SourceError> {
    let uri: Uri = url.parse().map_err(|e: hyper::http::uri::InvalidUri| SourceError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let client: Client<_, Empty<Bytes>> = Client::builder(TokioExecutor::new()).build_http();

    let exchange = async {
        let response = client.get(uri).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.into_body().collect().await?.to_bytes();
        tracing::debug!(url, bytes = body.len(), "inventory body received");
        Ok::<Value, SourceError>(serde_json::from_slice(&body)?)
    };

    tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| SourceError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })?
}
