use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

/// Source IP of the client that issued the request.
///
/// Looks at the first hop of `x-forwarded-for`, then `x-real-ip`, then the
/// peer address of the socket. Resolves to the empty string when none of
/// those are available; recording a search never fails on a missing IP.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let ip = header_ip(parts, "x-forwarded-for")
            .or_else(|| header_ip(parts, "x-real-ip"))
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            });

        Ok(Self(ip.unwrap_or_default()))
    }
}

fn header_ip(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl std::fmt::Display for ClientIp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use pretty_assertions::assert_eq;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn prefers_first_forwarded_hop() {
        let mut parts = parts_with_headers(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
            ("x-real-ip", "198.51.100.2"),
        ]);
        let ClientIp(ip) =
            ClientIp::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ip, "203.0.113.7");
    }

    #[tokio::test]
    async fn falls_back_to_real_ip_header() {
        let mut parts =
            parts_with_headers(&[("x-real-ip", "198.51.100.2")]);
        let ClientIp(ip) =
            ClientIp::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ip, "198.51.100.2");
    }

    #[tokio::test]
    async fn falls_back_to_peer_address() {
        let mut parts = parts_with_headers(&[]);
        parts.extensions.insert(ConnectInfo(SocketAddr::from((
            [192, 0, 2, 1],
            54321,
        ))));
        let ClientIp(ip) =
            ClientIp::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ip, "192.0.2.1");
    }

    #[tokio::test]
    async fn resolves_to_empty_string_when_unavailable() {
        let mut parts = parts_with_headers(&[]);
        let ClientIp(ip) =
            ClientIp::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ip, "");
    }

    #[tokio::test]
    async fn ignores_blank_forwarded_header() {
        let mut parts = parts_with_headers(&[("x-forwarded-for", "  ")]);
        let ClientIp(ip) =
            ClientIp::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ip, "");
    }
}
