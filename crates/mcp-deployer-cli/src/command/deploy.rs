use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::debug;

use mcp_deployer::{ClusterApi, ServerSpec, SimpleDeployer};

use crate::prompt::confirm;
use crate::render::render_spec_summary;

#[derive(Debug, Parser)]
pub struct DeployOpt {
    /// YAML file describing the server
    #[arg(short, long, value_name = "SPEC.yaml")]
    pub file: PathBuf,

    /// Do not prompt for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

impl DeployOpt {
    pub async fn process<C: ClusterApi>(self, deployer: &SimpleDeployer<C>) -> Result<()> {
        let spec = ServerSpec::from_file(&self.file)
            .with_context(|| format!("unable to load {}", self.file.display()))?;
        debug!(?spec, "loaded server spec");

        if !self.yes {
            println!("{}", render_spec_summary(&spec)?);
            if !confirm("Deploy this server?")? {
                println!("Deployment cancelled");
                return Ok(());
            }
        }

        deployer.deploy_server(&spec).await?;
        println!(
            "{} MCP server {} deployed in namespace {}",
            "✓".green(),
            spec.name.bold(),
            spec.namespace
        );
        Ok(())
    }
}
