//! Interactive menu.
//!
//! Errors of a single operation are printed and the menu is shown again,
//! only prompt failures (e.g. a closed terminal) end the loop.

mod delete;
mod deploy;

use anyhow::Result;
use colored::Colorize;
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use tracing::debug;

use mcp_deployer::{ClusterApi, DEFAULT_NAMESPACE, SimpleDeployer};

use crate::prompt::with_default;
use crate::render::{OutputType, render_servers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    List,
    Deploy,
    Delete,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [Self::List, Self::Deploy, Self::Delete, Self::Exit];

    pub fn label(&self) -> &'static str {
        match self {
            Self::List => "List MCP servers",
            Self::Deploy => "Deploy a MCP server",
            Self::Delete => "Delete a MCP server",
            Self::Exit => "Exit",
        }
    }
}

pub struct Wizard<C> {
    deployer: SimpleDeployer<C>,
}

impl<C: ClusterApi> Wizard<C> {
    pub fn new(deployer: SimpleDeployer<C>) -> Self {
        Self { deployer }
    }

    pub async fn run(self) -> Result<()> {
        println!("{}", "MCP server deployment wizard".bold());

        let labels: Vec<&str> = MenuItem::ALL.iter().map(MenuItem::label).collect();
        loop {
            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("What would you like to do?")
                .items(&labels)
                .default(0)
                .interact()?;

            let item = MenuItem::ALL[selection];
            debug!(?item, "menu selection");

            let result = match item {
                MenuItem::List => self.list().await,
                MenuItem::Deploy => deploy::run(&self.deployer).await,
                MenuItem::Delete => delete::run(&self.deployer).await,
                MenuItem::Exit => return Ok(()),
            };

            if let Err(err) = result {
                eprintln!("{} {err:#}", "error:".red().bold());
            }
            println!();
        }
    }

    async fn list(&self) -> Result<()> {
        let namespace = with_default("Namespace", DEFAULT_NAMESPACE)?;
        let servers = self.deployer.list_servers(&namespace).await?;
        println!("{}", render_servers(&servers, OutputType::Table)?);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::MenuItem;

    #[test]
    fn test_menu_ends_with_exit() {
        assert_eq!(MenuItem::ALL.last(), Some(&MenuItem::Exit));
        assert_eq!(MenuItem::ALL[0].label(), "List MCP servers");
    }
}
