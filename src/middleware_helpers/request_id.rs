use crate::tracing::{scope_request_id, RequestId};
use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// A caller-supplied id is kept only if it is short printable ASCII.
fn incoming_request_id(request: &Request) -> Option<RequestId> {
    let value = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    let acceptable = !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|b| b.is_ascii_graphic());
    acceptable.then(|| RequestId::new(value))
}

/// Outermost layer: settles the request id, exposes it as an extension and
/// task-local for the rest of the stack, and echoes it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(&request).unwrap_or_default();
    let header = HeaderName::from_static(REQUEST_ID_HEADER);
    let value = HeaderValue::from_str(request_id.as_str()).ok();

    if let Some(value) = &value {
        request.headers_mut().insert(header.clone(), value.clone());
    }
    request.extensions_mut().insert(request_id.clone());

    let mut response = scope_request_id(request_id, next.run(request)).await;
    if let Some(value) = value {
        response.headers_mut().insert(header, value);
    }
    response
}
