use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use mcp_deployer::{ClusterApi, SimpleDeployer};

use crate::prompt::confirm_delete;

use super::NamespaceOpt;

#[derive(Debug, Parser)]
pub struct DeleteOpt {
    /// Name of the server
    #[arg(value_name = "NAME")]
    pub name: String,

    #[command(flatten)]
    pub namespace: NamespaceOpt,

    /// Do not prompt for confirmation
    #[arg(long)]
    pub force: bool,
}

impl DeleteOpt {
    pub async fn process<C: ClusterApi>(self, deployer: &SimpleDeployer<C>) -> Result<()> {
        let namespace = &self.namespace.namespace;

        if !self.force && !confirm_delete(&self.name, namespace)? {
            println!("Deletion cancelled");
            return Ok(());
        }

        deployer.delete_server(&self.name, namespace).await?;
        println!(
            "{} MCP server {} deleted from namespace {}",
            "✓".green(),
            self.name.bold(),
            namespace
        );
        Ok(())
    }
}
