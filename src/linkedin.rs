//! External fetch collaborator: logs into LinkedIn and lists the people the
//! account most recently messaged.
//!
//! This is best-effort scraping of an unofficial endpoint and deliberately
//! opaque: the rest of the crate only sees the [`RecentContactsFetcher`]
//! trait. Any failure (network, credential rejection, a changed response
//! shape) surfaces as a retryable `AuthFetch` error, never a crash.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header;

use crate::config::Session;
use crate::error::OutreachError;
use crate::recent::RecentContactsFetcher;

const BASE_URL: &str = "https://www.linkedin.com";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

pub struct LinkedInFetcher {
    client: Client,
    base_url: String,
}

impl LinkedInFetcher {
    pub fn new() -> Result<Self, OutreachError> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| OutreachError::AuthFetch(format!("Failed to build HTTP client: {e}")))?;
        Ok(LinkedInFetcher {
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Obtain a session cookie + CSRF token, then authenticate.
    fn login(&self, session: &Session) -> Result<String, OutreachError> {
        let auth_url = format!("{}/uas/authenticate", self.base_url);

        let resp = self
            .client
            .get(&auth_url)
            .send()
            .map_err(|e| OutreachError::AuthFetch(format!("Failed to reach LinkedIn: {e}")))?;
        let token = extract_jsessionid(&resp).ok_or_else(|| {
            OutreachError::AuthFetch("LinkedIn did not issue a session cookie".to_string())
        })?;

        let resp = self
            .client
            .post(&auth_url)
            .header("csrf-token", &token)
            .form(&[
                ("session_key", session.username.as_str()),
                ("session_password", session.password()),
                ("JSESSIONID", token.as_str()),
            ])
            .send()
            .map_err(|e| OutreachError::AuthFetch(format!("Login request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(OutreachError::AuthFetch(format!(
                "Login rejected (HTTP {})",
                resp.status()
            )));
        }
        let body: serde_json::Value = resp
            .json()
            .map_err(|e| OutreachError::AuthFetch(format!("Unreadable login response: {e}")))?;
        match body.get("login_result").and_then(|v| v.as_str()) {
            Some("PASS") => Ok(token),
            Some(other) => Err(OutreachError::AuthFetch(format!(
                "LinkedIn rejected the credentials (result: {other})"
            ))),
            None => Err(OutreachError::AuthFetch(
                "Unexpected login response shape".to_string(),
            )),
        }
    }

    /// Pull the conversation list and collect participant display names.
    fn recent_conversation_names(&self, token: &str) -> Result<Vec<String>, OutreachError> {
        let url = format!("{}/voyager/api/messaging/conversations", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("csrf-token", token)
            .header(header::ACCEPT, "application/json")
            .send()
            .map_err(|e| OutreachError::AuthFetch(format!("Conversation fetch failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(OutreachError::AuthFetch(format!(
                "Conversation fetch rejected (HTTP {})",
                resp.status()
            )));
        }
        let body: serde_json::Value = resp
            .json()
            .map_err(|e| OutreachError::AuthFetch(format!("Unreadable conversation list: {e}")))?;

        let mut names = Vec::new();
        collect_participant_names(&body, &mut names);
        log::info!("Fetched {} recently-contacted names", names.len());
        Ok(names)
    }
}

impl RecentContactsFetcher for LinkedInFetcher {
    fn fetch(&self, session: &Session) -> Result<Vec<String>, OutreachError> {
        let token = self.login(session)?;
        self.recent_conversation_names(&token)
    }
}

fn extract_jsessionid(resp: &reqwest::blocking::Response) -> Option<String> {
    for value in resp.headers().get_all(header::SET_COOKIE) {
        let Ok(cookie) = value.to_str() else {
            continue;
        };
        if let Some(rest) = cookie.strip_prefix("JSESSIONID=") {
            let raw = rest.split(';').next().unwrap_or(rest);
            return Some(raw.trim_matches('"').to_string());
        }
    }
    None
}

/// Walk the response and collect every `firstName`/`lastName` pair. The
/// voyager payload nests profiles several levels deep and the exact shape
/// shifts; a structural scan is sturdier than mirroring it.
fn collect_participant_names(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            if let (Some(first), Some(last)) = (
                map.get("firstName").and_then(|v| v.as_str()),
                map.get("lastName").and_then(|v| v.as_str()),
            ) {
                let name = format!("{} {}", first, last).trim().to_string();
                if !name.is_empty() && !out.contains(&name) {
                    out.push(name);
                }
            }
            for v in map.values() {
                collect_participant_names(v, out);
            }
        }
        serde_json::Value::Array(items) => {
            for v in items {
                collect_participant_names(v, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_nested_participant_names() {
        let body: serde_json::Value = serde_json::from_str(
            r#"{
                "elements": [
                    {"participants": [{"miniProfile": {"firstName": "Jane", "lastName": "Doe"}}]},
                    {"participants": [
                        {"miniProfile": {"firstName": "Ann", "lastName": "Li"}},
                        {"miniProfile": {"firstName": "Jane", "lastName": "Doe"}}
                    ]}
                ]
            }"#,
        )
        .unwrap();

        let mut names = Vec::new();
        collect_participant_names(&body, &mut names);
        assert_eq!(names, vec!["Jane Doe".to_string(), "Ann Li".to_string()]);
    }
}
