//! Trace context interceptor for gRPC requests.
//!
//! Extracts W3C trace context from incoming gRPC metadata and sets up spans.

#![allow(clippy::result_large_err)]

use tonic::metadata::MetadataMap;
use tonic::{Request, Status};
use tracing::Span;

/// Keys for trace context propagation.
const TRACEPARENT_KEY: &str = "traceparent";
const REQUEST_ID_KEY: &str = "x-request-id";

/// Metadata extractor for trace context.
pub struct MetadataExtractor<'a> {
    metadata: &'a MetadataMap,
}

impl<'a> MetadataExtractor<'a> {
    pub fn new(metadata: &'a MetadataMap) -> Self {
        Self { metadata }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.to_str().ok())
    }
}

/// Extract trace context from gRPC metadata.
pub fn extract_trace_context<T>(request: &Request<T>) -> (Option<String>, Option<String>) {
    let metadata = request.metadata();
    let extractor = MetadataExtractor::new(metadata);

    let traceparent = extractor.get(TRACEPARENT_KEY).map(String::from);
    let request_id = extractor.get(REQUEST_ID_KEY).map(String::from);

    (traceparent, request_id)
}

/// Interceptor for extracting and propagating trace context.
pub fn trace_context_interceptor(request: Request<()>) -> Result<Request<()>, Status> {
    let (traceparent, request_id) = extract_trace_context(&request);

    if let Some(ref tp) = traceparent {
        tracing::debug!(traceparent = %tp, "Extracted traceparent from request");
    }

    if let Some(ref rid) = request_id {
        Span::current().record("request_id", rid.as_str());
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Request;

    #[test]
    fn test_metadata_extractor_get() {
        let mut request = Request::new(());
        request
            .metadata_mut()
            .insert("x-request-id", "test-123".parse().unwrap());

        let extractor = MetadataExtractor::new(request.metadata());
        assert_eq!(extractor.get("x-request-id"), Some("test-123"));
        assert_eq!(extractor.get("nonexistent"), None);
    }

    #[test]
    fn test_interceptor_passes_request_through() {
        let request = Request::new(());
        assert!(trace_context_interceptor(request).is_ok());
    }
}
