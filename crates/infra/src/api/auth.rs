//! Request authentication for both API revisions
//!
//! [`sign`] is a pure function of its inputs. [`SigningHook`] binds it to
//! one tenant's credentials and nonce source and applies it to outgoing
//! requests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use helpdesk_domain::constants::{
    HEADER_V1_APIKEY, HEADER_V1_PAYLOAD, HEADER_V1_SIGNATURE, HEADER_V2_APIKEY, HEADER_V2_NONCE,
    HEADER_V2_SIGNATURE,
};
use helpdesk_domain::{Credentials, Revision};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderName, HeaderValue, CONTENT_LENGTH};
use reqwest::Request;
use serde_json::{Map, Value};
use sha2::Sha384;
use tracing::debug;

use super::errors::ApiError;
use crate::http::RequestHook;

type HmacSha384 = Hmac<Sha384>;

/// Headers to attach to a request, plus whether its body must be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub headers: Vec<(&'static str, String)>,
    pub clears_body: bool,
}

/// Compute the authentication headers for one request.
///
/// Revision 2 signs `path ++ nonce ++ body` and leaves the body alone.
/// Revision 1 folds `nonce` and `request: path` into the JSON body (an
/// empty object when the body is absent or not an object), base64-encodes
/// it, signs the encoded payload and moves it into a header.
pub fn sign(
    revision: Revision,
    path: &str,
    body: Option<&[u8]>,
    nonce: &str,
    credentials: &Credentials,
) -> Result<Signature, ApiError> {
    match revision {
        Revision::V2 => {
            let body_len = body.map_or(0, <[u8]>::len);
            let mut message = Vec::with_capacity(path.len() + nonce.len() + body_len);
            message.extend_from_slice(path.as_bytes());
            message.extend_from_slice(nonce.as_bytes());
            if let Some(body) = body {
                message.extend_from_slice(body);
            }

            Ok(Signature {
                headers: vec![
                    (HEADER_V2_NONCE, nonce.to_string()),
                    (HEADER_V2_APIKEY, credentials.public_key.clone()),
                    (HEADER_V2_SIGNATURE, compute_hmac(&credentials.private_key, &message)?),
                ],
                clears_body: false,
            })
        }
        Revision::V1 => {
            let mut object = body
                .and_then(|bytes| serde_json::from_slice::<Map<String, Value>>(bytes).ok())
                .unwrap_or_default();
            object.insert("nonce".to_string(), Value::String(nonce.to_string()));
            object.insert("request".to_string(), Value::String(path.to_string()));

            let payload = BASE64.encode(serde_json::to_vec(&object)?);
            let signature = compute_hmac(&credentials.private_key, payload.as_bytes())?;

            Ok(Signature {
                headers: vec![
                    (HEADER_V1_PAYLOAD, payload),
                    (HEADER_V1_APIKEY, credentials.public_key.clone()),
                    (HEADER_V1_SIGNATURE, signature),
                ],
                clears_body: true,
            })
        }
    }
}

fn compute_hmac(secret: &str, payload: &[u8]) -> Result<String, ApiError> {
    let mut mac = HmacSha384::new_from_slice(secret.as_bytes())
        .map_err(|err| ApiError::Signing(format!("invalid private key: {err}")))?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Millisecond nonces that never repeat or go backwards.
///
/// Yields `max(now_ms, last + 1)`.
#[derive(Debug, Default)]
pub struct NonceSource {
    last: AtomicU64,
}

impl NonceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now.max(last.saturating_add(1));
            match self.last.compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst) {
                Ok(_) => return candidate,
                Err(observed) => last = observed,
            }
        }
    }
}

/// Signs requests whose path lies under an API revision root.
///
/// Other paths pass through unsigned.
pub struct SigningHook {
    credentials: Arc<Credentials>,
    nonces: NonceSource,
}

impl SigningHook {
    pub fn new(credentials: Arc<Credentials>) -> Self {
        Self { credentials, nonces: NonceSource::new() }
    }
}

impl RequestHook for SigningHook {
    fn on_request(&self, request: &mut Request) -> Result<(), ApiError> {
        let path = request.url().path().to_string();
        let Some(revision) = Revision::from_path(&path) else {
            debug!(%path, "path outside API roots, sending unsigned");
            return Ok(());
        };

        let nonce = self.nonces.next().to_string();
        let body = request.body().and_then(reqwest::Body::as_bytes);
        let signature = sign(revision, &path, body, &nonce, &self.credentials)?;

        let headers = request.headers_mut();
        for (name, value) in signature.headers {
            let value = HeaderValue::from_str(&value)
                .map_err(|err| ApiError::Signing(format!("invalid {name} header: {err}")))?;
            headers.insert(HeaderName::from_static(name), value);
        }

        if signature.clears_body {
            headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
            *request.body_mut() = None;
        }

        debug!(%path, %revision, %nonce, "request signed");
        Ok(())
    }
}
