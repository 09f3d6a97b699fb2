use std::path::Path;

use super::*;

const GETH: &str = "geth";

#[derive(Clone, Debug)]
pub struct Geth {
    command: ToolCommand,
}

impl Geth {
    pub fn locate() -> Result<Self, ToolError> {
        ToolCommand::located(GETH).map(|command| Self { command })
    }

    /// Import the private key at `key` into `keystore`, encrypted with the
    /// password stored in `password`.
    pub async fn import_account(
        &self,
        keystore: &Path,
        password: &Path,
        key: &Path,
    ) -> Result<(), ToolError> {
        self.command
            .clone()
            .args(["account", "import", "--keystore"])
            .arg(keystore)
            .arg("--password")
            .arg(password)
            .arg(key)
            .run()
            .await
    }
}
