// Management API HTTP client
//
// Wraps `reqwest::Client` with MyHOME-specific URL construction, bearer
// auth, and uniform error extraction. Endpoint methods live in separate
// modules (gateways, discovery, configuration) as inherent impls to keep
// this module focused on transport mechanics.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Path prefix under which the integration registers its views.
const API_PREFIX: &str = "api/myhome";

/// Error body shape produced by the server's `json_message` helper.
#[derive(serde::Deserialize)]
struct MessageBody {
    message: Option<String>,
}

/// Raw HTTP client for the MyHOME management endpoints.
///
/// All methods return decoded payloads; any non-success response is
/// turned into an [`Error`] carrying the server's message.
pub struct MyHomeClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MyHomeClient {
    /// Create a client authenticating with a long-lived access token.
    ///
    /// `base_url` is the Home Assistant root (e.g. `http://homeassistant.local:8123`).
    pub fn new(
        base_url: Url,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::Authentication {
                message: "access token contains invalid header characters".into(),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        let http = transport.build_client(headers)?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Auth headers, if any, must already be configured on `http`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/myhome/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{API_PREFIX}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        Self::parse_response(resp).await
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self.http.post(url).json(body).send().await?;
        Self::parse_response(resp).await
    }

    /// Map the status to an error, or decode the body as `T`.
    ///
    /// The server reports failures as `{"message": "..."}` with a 4xx/5xx
    /// status; that message is preserved verbatim.
    async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;
        trace!(%status, len = body.len(), "response received");

        if !status.is_success() {
            let message = serde_json::from_str::<MessageBody>(&body)
                .ok()
                .and_then(|m| m.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("HTTP {status}: {}", preview(&body)));

            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(Error::Authentication { message });
            }
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

/// First 200 characters of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
