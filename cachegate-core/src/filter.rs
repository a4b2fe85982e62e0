//! Cheap request-only gate run before any directive evaluation.

use http::{Method, header::ACCEPT_RANGES, request::Parts};

/// Returns `true` if the request may ever produce a cacheable exchange.
///
/// Rejects:
/// - methods other than `GET` and `HEAD`;
/// - requests carrying a non-empty `Accept-Ranges` header.
///
/// `Accept-Ranges` is conventionally a response header. It is checked on the
/// request on purpose; range caching is unsupported and this is the gate that
/// existing deployments rely on.
pub fn admissible(request: &Parts) -> bool {
    if request.method != Method::GET && request.method != Method::HEAD {
        return false;
    }

    !request
        .headers
        .get(ACCEPT_RANGES)
        .is_some_and(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    fn request(method: Method) -> Parts {
        Request::builder()
            .method(method)
            .uri("/")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn test_get_and_head_are_admissible() {
        assert!(admissible(&request(Method::GET)));
        assert!(admissible(&request(Method::HEAD)));
    }

    #[test]
    fn test_other_methods_are_rejected() {
        for method in [
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
            Method::TRACE,
            Method::CONNECT,
        ] {
            assert!(!admissible(&request(method.clone())), "{method} must be rejected");
        }
    }

    #[test]
    fn test_extension_method_is_rejected() {
        let method = Method::from_bytes(b"PURGE").unwrap();
        assert!(!admissible(&request(method)));
    }

    #[test]
    fn test_request_accept_ranges_quirk() {
        let (parts, ()) = Request::get("/video.mp4")
            .header(ACCEPT_RANGES, "bytes")
            .body(())
            .unwrap()
            .into_parts();
        assert!(!admissible(&parts));
    }

    #[test]
    fn test_empty_accept_ranges_is_ignored() {
        let (parts, ()) = Request::get("/")
            .header(ACCEPT_RANGES, "")
            .body(())
            .unwrap()
            .into_parts();
        assert!(admissible(&parts));
    }
}
