use crate::linode::{Firewall, FirewallApi, RuleSet};
use crate::utils::error::{Error, Result};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Firewall endpoints are only served from the beta API, not from `/v4`.
pub const LINODE_FIREWALL_API: &str = "https://api.linode.com/v4beta";
pub const API_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SIZE: u32 = 500;

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    page: u32,
    #[serde(default)]
    pages: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrors {
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    reason: String,
    #[serde(default)]
    field: Option<String>,
}

pub struct LinodeClient {
    http: Client,
    base_url: String,
    token: String,
}

impl LinodeClient {
    pub fn new(token: &str) -> Result<LinodeClient> {
        let http = Client::builder()
            .timeout(API_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::http(LINODE_FIREWALL_API, e))?;
        Ok(LinodeClient::with_http(http, LINODE_FIREWALL_API, token))
    }

    pub fn with_http(http: Client, base_url: &str, token: &str) -> LinodeClient {
        LinodeClient {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> Result<T> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| Error::http(url, e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Status {
                url: url.to_owned(),
                status: status.as_u16(),
                reason: api_error_reason(&body),
            });
        }
        response.json::<T>().map_err(|e| Error::http(url, e))
    }
}

impl FirewallApi for LinodeClient {
    fn list_firewalls(&self) -> Result<Vec<Firewall>> {
        let url = self.url("/networking/firewalls");
        let mut firewalls = Vec::new();
        let mut page = 1;
        loop {
            let request = self.http.get(&url).query(&[("page", page), ("page_size", PAGE_SIZE)]);
            let batch: Page<Firewall> = self.send(&url, request)?;
            debug!("Fetched firewall page {} of {}", batch.page, batch.pages);
            firewalls.extend(batch.data);
            if batch.page >= batch.pages {
                break;
            }
            page = batch.page + 1;
        }
        Ok(firewalls)
    }

    fn get_rules(&self, firewall_id: u64) -> Result<RuleSet> {
        let url = self.url(&format!("/networking/firewalls/{}/rules", firewall_id));
        self.send(&url, self.http.get(&url))
    }

    fn update_rules(&self, firewall_id: u64, rules: &RuleSet) -> Result<RuleSet> {
        let url = self.url(&format!("/networking/firewalls/{}/rules", firewall_id));
        self.send(&url, self.http.put(&url).json(rules))
    }
}

/// Summarises a Linode error body (`{"errors": [{"reason": ..}]}`).
fn api_error_reason(body: &str) -> String {
    match serde_json::from_str::<ApiErrors>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed
            .errors
            .iter()
            .map(|e| match &e.field {
                Some(field) => format!("{}: {}", field, e.reason),
                None => e.reason.clone(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ if body.trim().is_empty() => "empty response body".to_owned(),
        _ => body.trim().to_owned(),
    }
}
