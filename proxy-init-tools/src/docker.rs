use std::path::Path;

use super::*;

#[derive(Clone, Debug, Default)]
pub struct Docker;

impl Docker {
    pub async fn build(&self, tag: &str, context: &Path) -> Result<(), ToolError> {
        build_command(tag, context).run().await
    }
}

fn build_command(tag: &str, context: &Path) -> ToolCommand {
    ToolCommand::new("docker")
        .args(["build", "-t", tag])
        .arg(context)
}
