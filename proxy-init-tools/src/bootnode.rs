use std::path::Path;

use super::*;

const BOOTNODE: &str = "bootnode";

/// The go-ethereum `bootnode` key utility.
#[derive(Clone, Debug)]
pub struct Bootnode {
    command: ToolCommand,
}

impl Bootnode {
    pub fn locate() -> Result<Self, ToolError> {
        ToolCommand::located(BOOTNODE).map(|command| Self { command })
    }

    /// Generate a fresh node key at `path`.
    pub async fn generate_key(&self, path: &Path) -> Result<(), ToolError> {
        self.command
            .clone()
            .arg("-genkey")
            .arg(path)
            .run()
            .await
    }

    /// Hex encoded public key (the enode id) of the node key at `path`.
    pub async fn public_key(&self, path: &Path) -> Result<String, ToolError> {
        self.command
            .clone()
            .args(["-writeaddress", "-nodekey"])
            .arg(path)
            .output()
            .await
            .map(|stdout| stdout.trim().to_string())
    }
}
