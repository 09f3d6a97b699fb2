//! Thin, typed front-ends for the command line tools proxy-init relies on.
//!
//! Every wrapper builds a [`ToolCommand`]; the e2e driver talks to `kind`,
//! `docker` and `kubectl`, the init container to `bootnode` and `geth`.

pub use bootnode::Bootnode;
pub use command::{lookup, ToolCommand, ToolError};
pub use docker::Docker;
pub use geth::Geth;
pub use kind::Kind;
pub use kubectl::Kubectl;

mod bootnode;
mod command;
mod docker;
mod geth;
mod kind;
mod kubectl;
