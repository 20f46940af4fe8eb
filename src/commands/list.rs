use crate::linode::{FirewallApi, FirewallRule, LinodeClient};
use crate::utils::error::Result;
use crate::utils::read_token;
use log::debug;

fn describe_rule(rule: &FirewallRule) -> String {
    let ipv4 = rule
        .addresses
        .ipv4
        .as_ref()
        .map(|addrs| addrs.join(", "))
        .unwrap_or_default();
    format!(
        "{} | {} {} {} | {}",
        rule.label.as_deref().unwrap_or("<unlabelled>"),
        rule.action.as_deref().unwrap_or("-"),
        rule.protocol.as_deref().unwrap_or("-"),
        rule.ports.as_deref().unwrap_or("all"),
        ipv4
    )
}

/// Every firewall with its inbound rules, one line per rule.
pub fn render<A: FirewallApi>(api: &A) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for firewall in api.list_firewalls()? {
        debug!("Fetching rules for firewall {}", firewall.id);
        let rules = api.get_rules(firewall.id)?;
        lines.push(format!(
            "{} ({}) [{}] inbound policy {}",
            firewall.label,
            firewall.id,
            firewall.status,
            rules.inbound_policy.as_deref().unwrap_or("-")
        ));
        for rule in &rules.inbound {
            lines.push(format!("    {}", describe_rule(rule)));
        }
    }
    Ok(lines)
}

pub fn main() -> Result<()> {
    let client = LinodeClient::new(&read_token()?)?;
    for line in render(&client)? {
        println!("{}", line);
    }
    Ok(())
}
