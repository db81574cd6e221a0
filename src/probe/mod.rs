use std::collections::BTreeMap;
use std::time::Duration;

use crate::utils;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:95.0) Gecko/20100101 Firefox/95.0";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reachability {
    Reachable,
    Unreachable(String),
}

pub fn build_http_client(timeout: Duration, user_agent: &str) -> Result<reqwest::Client, String> {
    let mut headers = reqwest::header::HeaderMap::new();
    let ua = reqwest::header::HeaderValue::from_str(user_agent)
        .map_err(|_| format!("invalid user agent '{user_agent}'"))?;
    headers.insert(reqwest::header::USER_AGENT, ua);

    // redirects stay disabled: a 302 off the login page is the success signal
    reqwest::Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::none())
        .timeout(timeout)
        .danger_accept_invalid_hostnames(true)
        .danger_accept_invalid_certs(true)
        .build()
        .map_err(|e| format!("failed to build http client: {e}"))
}

pub fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "timed out".to_string()
    } else if e.is_connect() {
        "failed to connect".to_string()
    } else {
        e.to_string()
    }
}

/// One diagnostic GET before the loop starts. The raw timeout is parsed here
/// so a non-numeric value surfaces as `Unreachable`, never as a panic.
pub async fn check_reachability(url: &str, timeout_raw: &str, user_agent: &str) -> Reachability {
    let secs = match utils::parse_timeout_seconds(timeout_raw) {
        Ok(secs) => secs,
        Err(reason) => return Reachability::Unreachable(reason),
    };
    let client = match build_http_client(Duration::from_secs_f64(secs), user_agent) {
        Ok(client) => client,
        Err(reason) => return Reachability::Unreachable(reason),
    };
    match client.get(url).send().await {
        Ok(resp) => {
            let status = resp.status();
            if status.is_success() || status.is_redirection() {
                Reachability::Reachable
            } else {
                Reachability::Unreachable(format!("status {}", status.as_u16()))
            }
        }
        Err(e) => Reachability::Unreachable(describe_transport_error(&e)),
    }
}

/// Fetches the login page once and captures every cookie the server set. The
/// map is read-only afterwards; cookies are never refreshed mid-loop. An
/// empty map is a valid result.
pub async fn bootstrap_cookies(
    client: &reqwest::Client,
    login_url: &str,
) -> Result<BTreeMap<String, String>, String> {
    let resp = client
        .get(login_url)
        .send()
        .await
        .map_err(|e| describe_transport_error(&e))?;
    let mut cookies = BTreeMap::new();
    for value in resp.headers().get_all(reqwest::header::SET_COOKIE) {
        if let Ok(raw) = value.to_str() {
            if let Some((name, value)) = parse_set_cookie(raw) {
                cookies.insert(name, value);
            }
        }
    }
    Ok(cookies)
}

pub fn parse_set_cookie(raw: &str) -> Option<(String, String)> {
    let (name, rest) = raw.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = rest.split(';').next().unwrap_or("").trim();
    Some((name.to_string(), value.to_string()))
}

pub fn cookie_header(cookies: &BTreeMap<String, String>) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}
