use clap::Parser as _;
use proxy_init_ext::Enodes;
use proxy_init_kubeapi::KubeApi;
use proxy_init_tools::{Bootnode, Geth};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use cli::Args;

mod cli;
mod keystore;
mod password;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let bootnode = Bootnode::locate()?;
    let geth = Geth::locate()?;

    bootnode.generate_key(&args.private_key).await?;
    tracing::info!(path = %args.private_key.display(), "Generated private key");
    let public_key = bootnode.public_key(&args.private_key).await?;
    tracing::info!(%public_key, "Generated public key");

    let password = password::generate(&mut rand::thread_rng());
    let password_file = password::write_to(&args.secrets_dir, &password)?;
    let keystore = keystore::create_in(&args.secrets_dir)?;
    geth.import_account(keystore.path(), password_file.path(), &args.private_key)
        .await?;
    tracing::info!(path = %args.private_key.display(), "Imported private key");

    let address = keystore::account_address(keystore.path())?;
    tracing::info!(%address, "Extracted account address from keystore");
    tokio::fs::write(&args.account_address, &address).await?;
    tracing::info!(path = %args.account_address.display(), "Wrote account address");

    let enodes = Enodes::new(&public_key, &args.internal_address, &args.external_address);
    let api = KubeApi::new(args.kubeconfig.as_deref()).await?;
    api.publish_enodes(&args.pod_namespace, &args.pod_name, &enodes)
        .await?;

    Ok(())
}
