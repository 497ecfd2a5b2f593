//! Command line surface of `mcp-wizard`.
//!
//! Without a subcommand the interactive menu is started.

mod delete;
mod deploy;
mod list;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use mcp_deployer::{DEFAULT_NAMESPACE, SimpleDeployer};

use crate::wizard::Wizard;

pub use self::delete::DeleteOpt;
pub use self::deploy::DeployOpt;
pub use self::list::ListOpt;

#[derive(Debug, Parser)]
#[command(
    about = "Deploy, list and delete MCP servers on Kubernetes",
    name = "mcp-wizard",
    max_term_width = 100
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the MCP servers of a namespace
    #[command(name = "list", visible_alias = "ls")]
    List(ListOpt),

    /// Deploy a MCP server described by a YAML file
    #[command(name = "deploy")]
    Deploy(DeployOpt),

    /// Delete a MCP server and its service
    #[command(name = "delete")]
    Delete(DeleteOpt),
}

#[derive(Debug, Clone, Args)]
pub struct NamespaceOpt {
    /// Kubernetes namespace
    #[arg(short, long, env = "MCP_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,
}

impl Cli {
    pub async fn process(self) -> Result<()> {
        let deployer = SimpleDeployer::try_default()?;

        match self.command {
            None => Wizard::new(deployer).run().await,
            Some(Command::List(opt)) => opt.process(&deployer).await,
            Some(Command::Deploy(opt)) => opt.process(&deployer).await,
            Some(Command::Delete(opt)) => opt.process(&deployer).await,
        }
    }
}
