use url::Url;

/// Returns the rate-limiting key for a URL: `host:port`
///
/// The port is included so that two services on the same address (common
/// with test servers on 127.0.0.1) are throttled independently.
pub fn host_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port_or_known_default() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}
