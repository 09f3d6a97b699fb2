use std::collections::BTreeMap;
use std::fmt;

use constcat::concat;

pub const ANNOTATION_DOMAIN: &str = "proxy.mantalabs.com";
pub const INTERNAL_ENODE_KEY: &str = concat!(ANNOTATION_DOMAIN, "/", "internal-enode-url");
pub const EXTERNAL_ENODE_KEY: &str = concat!(ANNOTATION_DOMAIN, "/", "external-enode-url");

/// Enode URLs a proxy publishes so that its peers can discover it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enodes {
    pub internal: String,
    pub external: String,
}

impl Enodes {
    /// Build both enodes for one node key.
    ///
    /// `public_key` is the hex node id printed by `bootnode -writeaddress`,
    /// the addresses are `host:port`.
    pub fn new(public_key: &str, internal_address: &str, external_address: &str) -> Self {
        let internal = enode(public_key, internal_address);
        let external = enode(public_key, external_address);
        Self { internal, external }
    }

    pub fn annotations(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (INTERNAL_ENODE_KEY.to_string(), self.internal.clone()),
            (EXTERNAL_ENODE_KEY.to_string(), self.external.clone()),
        ])
    }
}

impl fmt::Display for Enodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "internal={} external={}", self.internal, self.external)
    }
}

fn enode(public_key: &str, address: &str) -> String {
    format!("enode://{public_key}@{address}")
}
