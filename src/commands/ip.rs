use crate::utils::checkip_client;
use crate::utils::error::Result;
use crate::utils::public_ip::{cidr_text, resolve_public_ipv4, CHECKIP_URL};

pub fn main() -> Result<()> {
    let public_ip = resolve_public_ipv4(&checkip_client()?, CHECKIP_URL)?;
    println!("{} => {}", public_ip, cidr_text(&public_ip.host_network()));
    Ok(())
}
