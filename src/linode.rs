//! Linode Cloud Firewall types and the operations the updater needs from the API.

use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod client;

pub use client::LinodeClient;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Firewall {
    pub id: u64,
    pub label: String,
    #[serde(default)]
    pub status: String,
}

/// Rules of one firewall as returned by `GET /networking/firewalls/{id}/rules`.
///
/// `fingerprint` and `version` are read-only and never sent back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub inbound: Vec<FirewallRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_policy: Option<String>,
    #[serde(default)]
    pub outbound: Vec<FirewallRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_policy: Option<String>,
    #[serde(default, skip_serializing)]
    pub fingerprint: Option<String>,
    #[serde(default, skip_serializing)]
    pub version: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirewallRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub addresses: RuleAddresses,
    // Fields the API adds later are passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FirewallRule {
    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAddresses {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<Vec<String>>,
}

/// Firewall operations the updater consumes. Implemented by [`LinodeClient`].
pub trait FirewallApi {
    fn list_firewalls(&self) -> Result<Vec<Firewall>>;

    fn get_rules(&self, firewall_id: u64) -> Result<RuleSet>;

    fn update_rules(&self, firewall_id: u64, rules: &RuleSet) -> Result<RuleSet>;
}
