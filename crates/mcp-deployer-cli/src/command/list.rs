use anyhow::Result;
use clap::Parser;

use mcp_deployer::{ClusterApi, SimpleDeployer};

use crate::render::{OutputType, render_servers};

use super::NamespaceOpt;

#[derive(Debug, Parser)]
pub struct ListOpt {
    #[command(flatten)]
    pub namespace: NamespaceOpt,

    /// Output format
    #[arg(short = 'O', long, value_enum, default_value_t)]
    pub output: OutputType,
}

impl ListOpt {
    pub async fn process<C: ClusterApi>(self, deployer: &SimpleDeployer<C>) -> Result<()> {
        let servers = deployer.list_servers(&self.namespace.namespace).await?;
        println!("{}", render_servers(&servers, self.output)?);
        Ok(())
    }
}
