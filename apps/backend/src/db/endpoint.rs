use std::fmt;
use std::path::PathBuf;

use crate::error::AppError;

/// Parsed location of the object-database backend.
///
/// Exactly one representation: a filesystem path to a local socket, or a
/// host plus TCP port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Local socket path, kept verbatim from configuration.
    Unix(PathBuf),
    /// Remote host and port.
    Tcp { host: String, port: u16 },
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Unix(path) => write!(f, "unix:{}", path.display()),
            Endpoint::Tcp { host, port } => write!(f, "{host}:{port}"),
        }
    }
}

/// Parse a configured address string into an [`Endpoint`].
///
/// Returns `Ok(None)` for an empty string, meaning no backend is configured
/// here; that is distinct from `Err(InvalidEndpoint)`.
///
/// Rules:
/// - starts with `/` — a local socket path, taken verbatim (colons allowed,
///   no existence check)
/// - otherwise split on the *last* `:` into host and port; the port must be a
///   base-10 integer in `1..=65535`. The host is not validated and no DNS
///   resolution happens at parse time.
///
/// Known limitation: bracketed IPv6 literals are not understood; the last
/// colon inside the brackets would be taken as the host/port separator.
pub fn parse_endpoint(raw: &str) -> Result<Option<Endpoint>, AppError> {
    if raw.is_empty() {
        return Ok(None);
    }
    if raw.starts_with('/') {
        return Ok(Some(Endpoint::Unix(PathBuf::from(raw))));
    }
    let Some((host, port)) = raw.rsplit_once(':') else {
        return Err(AppError::invalid_endpoint(format!(
            "'{raw}' is neither a socket path nor host:port"
        )));
    };
    let port: u16 = port.parse().map_err(|_| {
        AppError::invalid_endpoint(format!("'{port}' is not a valid port in '{raw}'"))
    })?;
    if port == 0 {
        return Err(AppError::invalid_endpoint(format!(
            "port must be non-zero in '{raw}'"
        )));
    }
    Ok(Some(Endpoint::Tcp {
        host: host.to_string(),
        port,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_some(raw: &str) -> Endpoint {
        parse_endpoint(raw)
            .expect("should parse")
            .expect("should be present")
    }

    #[test]
    fn test_empty_is_absent_not_invalid() {
        assert_eq!(parse_endpoint("").unwrap(), None);
    }

    #[test]
    fn test_leading_slash_is_local_path() {
        assert_eq!(
            parse_some("/var/run/objdb.sock"),
            Endpoint::Unix(PathBuf::from("/var/run/objdb.sock"))
        );
    }

    #[test]
    fn test_local_path_keeps_colons_verbatim() {
        // A path is a path even when it contains colon characters.
        assert_eq!(
            parse_some("/tmp/db:8001/sock"),
            Endpoint::Unix(PathBuf::from("/tmp/db:8001/sock"))
        );
    }

    #[test]
    fn test_host_port_pair() {
        assert_eq!(
            parse_some("localhost:8001"),
            Endpoint::Tcp {
                host: "localhost".to_string(),
                port: 8001,
            }
        );
    }

    #[test]
    fn test_splits_on_last_colon() {
        assert_eq!(
            parse_some("host:with:many:colons:9999"),
            Endpoint::Tcp {
                host: "host:with:many:colons".to_string(),
                port: 9999,
            }
        );
    }

    #[test]
    fn test_no_colon_is_invalid() {
        let err = parse_endpoint("localhost").unwrap_err();
        assert_eq!(err.code(), "INVALID_ENDPOINT");
    }

    #[test]
    fn test_non_numeric_port_is_invalid() {
        let err = parse_endpoint("localhost:eightthousand").unwrap_err();
        assert_eq!(err.code(), "INVALID_ENDPOINT");
    }

    #[test]
    fn test_negative_port_is_invalid() {
        assert!(parse_endpoint("localhost:-1").is_err());
    }

    #[test]
    fn test_zero_and_overflow_ports_are_invalid() {
        assert!(parse_endpoint("localhost:0").is_err());
        assert!(parse_endpoint("localhost:65536").is_err());
    }

    #[test]
    fn test_display_round_trips_tcp() {
        let ep = parse_some("db.internal:8001");
        assert_eq!(ep.to_string(), "db.internal:8001");
    }
}
