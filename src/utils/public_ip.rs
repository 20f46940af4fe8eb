use crate::utils::error::{Error, Result};
use cidr::Ipv4Cidr;
use log::{debug, info};
use reqwest::blocking::Client;
use std::fmt::Display;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Echoes the caller's address as seen from the internet, post-NAT.
pub const CHECKIP_URL: &str = "https://checkip.amazonaws.com";
pub const CHECKIP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicAddress(Ipv4Addr);

impl PublicAddress {
    pub fn addr(&self) -> Ipv4Addr {
        self.0
    }

    /// The /32 network holding only this address.
    pub fn host_network(&self) -> Ipv4Cidr {
        Ipv4Cidr::new_host(self.0)
    }
}

impl Display for PublicAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// CIDR text of a network, always with an explicit prefix length.
pub fn cidr_text(network: &Ipv4Cidr) -> String {
    format!("{}/{}", network.first_address(), network.network_length())
}

pub fn parse_public_ipv4(body: &str) -> Result<PublicAddress> {
    let trimmed = body.trim();
    trimmed
        .parse::<Ipv4Addr>()
        .map(PublicAddress)
        .map_err(|source| Error::Parse {
            body: trimmed.to_owned(),
            source,
        })
}

pub fn resolve_public_ipv4(http: &Client, endpoint: &str) -> Result<PublicAddress> {
    let body = http
        .get(endpoint)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(|e| Error::http(endpoint, e))?;
    debug!("Response received: '{}'", body.trim());
    let public_ip = parse_public_ipv4(&body)?;
    info!("External IP address: {}", public_ip);
    Ok(public_ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;
    use crate::utils::test_server;

    #[test]
    fn parses_dotted_quads_with_surrounding_whitespace() {
        for body in [
            "198.51.100.42",
            "198.51.100.42\n",
            "  198.51.100.42\r\n",
            "\t198.51.100.42 ",
        ] {
            let addr = parse_public_ipv4(body).unwrap();
            assert_eq!(addr.addr(), Ipv4Addr::new(198, 51, 100, 42));
        }
        assert_eq!(
            parse_public_ipv4("0.0.0.0").unwrap().addr(),
            Ipv4Addr::UNSPECIFIED
        );
        assert_eq!(
            parse_public_ipv4("255.255.255.255\n").unwrap().addr(),
            Ipv4Addr::BROADCAST
        );
    }

    #[test]
    fn rejects_malformed_bodies() {
        for body in [
            "",
            "   ",
            "not an ip",
            "198.51.100",
            "198.51.100.42.7",
            "198.51.100.256",
            "198.51.1OO.42",
            "198.51.100.42/32",
            "2001:db8::1",
            "<html>error</html>",
        ] {
            let err = parse_public_ipv4(body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse, "{:?} should not parse", body);
        }
    }

    #[test]
    fn host_network_is_a_slash_32() {
        let addr = parse_public_ipv4("203.0.113.7").unwrap();
        let network = addr.host_network();
        assert_eq!(network.network_length(), 32);
        assert_eq!(cidr_text(&network), "203.0.113.7/32");
    }

    #[test]
    fn resolves_from_echo_service() {
        let server = test_server::serve(vec![(200, "198.51.100.42\n")]);
        let addr = resolve_public_ipv4(&test_server::client(), &server.url).unwrap();
        assert_eq!(addr.to_string(), "198.51.100.42");

        let requests = server.finish();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
    }

    #[test]
    fn non_success_status_is_network_error() {
        let server = test_server::serve(vec![(503, "198.51.100.42\n")]);
        let err = resolve_public_ipv4(&test_server::client(), &server.url).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        server.finish();
    }

    #[test]
    fn garbage_body_is_parse_error() {
        let server = test_server::serve(vec![(200, "<html>rate limited</html>")]);
        let err = resolve_public_ipv4(&test_server::client(), &server.url).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        server.finish();
    }

    #[test]
    fn unreachable_endpoint_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let err = resolve_public_ipv4(&test_server::client(), &url).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}
