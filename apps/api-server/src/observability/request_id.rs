//! Request IDs: reuse an incoming `x-request-id` or mint one, and echo it back.

use actix_web::{
    Error,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
    middleware::Next,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied ID that is accepted as-is.
const MAX_INCOMING_LEN: usize = 128;

fn incoming_id(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(REQUEST_ID_HEADER)?
        .to_str()
        .ok()
        .filter(|id| !id.is_empty() && id.len() <= MAX_INCOMING_LEN)
        .map(String::from)
}

/// Middleware function; install with `actix_web::middleware::from_fn`.
///
/// Everything downstream runs inside a `request` span carrying `request_id`.
pub async fn request_id(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let id = incoming_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());
    let span = tracing::info_span!("request", request_id = %id);

    let mut res = next.call(req).instrument(span).await?;

    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    Ok(res)
}
