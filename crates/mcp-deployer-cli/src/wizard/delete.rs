use anyhow::Result;
use colored::Colorize;

use mcp_deployer::{ClusterApi, DEFAULT_NAMESPACE, SimpleDeployer};

use crate::prompt::{confirm_delete, required, with_default};
use crate::render::{NO_SERVERS, server_choice_table};

pub async fn run<C: ClusterApi>(deployer: &SimpleDeployer<C>) -> Result<()> {
    let namespace = with_default("Namespace", DEFAULT_NAMESPACE)?;

    let servers = deployer.list_servers(&namespace).await?;
    if servers.is_empty() {
        println!("{NO_SERVERS}");
        return Ok(());
    }
    println!("{}", server_choice_table(&servers));

    let name = required("Name of the server to delete")?;

    if !confirm_delete(&name, &namespace)? {
        println!("Deletion cancelled");
        return Ok(());
    }

    deployer.delete_server(&name, &namespace).await?;
    println!("{} MCP server {} deleted", "✓".green(), name.bold());
    Ok(())
}
