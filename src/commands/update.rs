use crate::linode::{FirewallApi, LinodeClient};
use crate::utils::{
    config::UpdaterConfig,
    error::{Error, Result},
    checkip_client, config_path,
    public_ip::{cidr_text, resolve_public_ipv4, CHECKIP_URL},
    read_token,
};
use cidr::Ipv4Cidr;
use clap::ArgMatches;
use reqwest::blocking::Client;
use log::{debug, info, warn};

/// Outcome of a successful rule rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub firewall_id: u64,
    pub firewall_label: String,
    pub rules_updated: usize,
    pub persisted: bool,
}

pub struct FirewallUpdater<A: FirewallApi> {
    client: A,
    config: UpdaterConfig,
    dry_run: bool,
}

impl<A: FirewallApi> FirewallUpdater<A> {
    pub fn new(client: A, config: UpdaterConfig) -> FirewallUpdater<A> {
        FirewallUpdater {
            client,
            config,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> FirewallUpdater<A> {
        self.dry_run = dry_run;
        self
    }

    /// Points every inbound rule labelled `rule_label` at `network` and persists.
    ///
    /// Nothing is written unless both the firewall and at least one rule match.
    pub fn update_firewall_with_network(&self, network: &Ipv4Cidr) -> Result<UpdateReport> {
        let firewall = self
            .client
            .list_firewalls()?
            .into_iter()
            .find(|f| f.label == self.config.firewall_name)
            .ok_or_else(|| Error::FirewallNotFound(self.config.firewall_name.clone()))?;
        let mut rules = self.client.get_rules(firewall.id)?;
        debug!(
            "Firewall '{}' ({}) rules version {:?}, {} inbound",
            firewall.label,
            firewall.id,
            rules.version,
            rules.inbound.len()
        );

        let addresses = vec![cidr_text(network)];
        let mut rules_updated = 0;
        for rule in rules.inbound.iter_mut() {
            if rule.has_label(&self.config.rule_label) {
                rule.addresses.ipv4 = Some(addresses.clone());
                rules_updated += 1;
            }
        }
        if rules_updated == 0 {
            return Err(Error::RuleNotFound(self.config.rule_label.clone()));
        }
        if rules_updated > 1 {
            warn!(
                "{} inbound rules on firewall '{}' are labelled '{}', updating all of them",
                rules_updated, firewall.label, self.config.rule_label
            );
        }

        if self.dry_run {
            info!(
                "Dry run, not persisting rules for firewall '{}': {}",
                firewall.label,
                serde_json::to_string(&rules).unwrap_or_default()
            );
        } else {
            self.client.update_rules(firewall.id, &rules)?;
            info!("Successfully updated firewall");
        }

        Ok(UpdateReport {
            firewall_id: firewall.id,
            firewall_label: firewall.label,
            rules_updated,
            persisted: !self.dry_run,
        })
    }
}

/// Resolves the public address and rewrites the configured rule with it.
pub fn run<A: FirewallApi>(
    updater: &FirewallUpdater<A>,
    checkip: &Client,
    checkip_url: &str,
) -> Result<UpdateReport> {
    let public_ip = resolve_public_ipv4(checkip, checkip_url)?;
    let network = public_ip.host_network();
    let report = updater.update_firewall_with_network(&network)?;
    info!(
        "Firewall '{}' ({}): {} inbound rule(s) now allow {}{}",
        report.firewall_label,
        report.firewall_id,
        report.rules_updated,
        cidr_text(&network),
        if report.persisted { "" } else { " (dry run)" }
    );
    Ok(report)
}

pub fn main(cmd: &ArgMatches) -> Result<()> {
    let config = UpdaterConfig::load(&config_path(cmd)?)?;
    let token = read_token()?;
    let dry_run = cmd.get_one::<bool>("dry-run").copied().unwrap_or(false);
    let updater = FirewallUpdater::new(LinodeClient::new(&token)?, config).dry_run(dry_run);
    run(&updater, &checkip_client()?, CHECKIP_URL)?;
    Ok(())
}
