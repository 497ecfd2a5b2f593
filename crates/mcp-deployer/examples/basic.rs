//! Deploy a fully described server into the current kubeconfig context and
//! list the servers of its namespace.
//!
//! cargo run --example basic -- my-server quay.io/example/mcp:latest

use std::collections::BTreeMap;
use std::env;

use fluvio_future::task::run_block_on;

use mcp_deployer::k8::{Quantity, RESOURCE_CPU, RESOURCE_MEMORY, ResourceRequirements};
use mcp_deployer::{EnvEntry, SecretMount, ServerSpec, SimpleDeployer};

fn main() {
    fluvio_future::subscriber::init_logger();

    let mut args = env::args().skip(1);
    let name = args.next().unwrap_or_else(|| "demo-server".to_owned());
    let image = args
        .next()
        .unwrap_or_else(|| "ghcr.io/modelcontextprotocol/servers/everything:latest".to_owned());

    if let Err(err) = run_block_on(run(name, image)) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(name: String, image: String) -> Result<(), Box<dyn std::error::Error>> {
    let deployer = SimpleDeployer::try_default()?;

    let resources = ResourceRequirements::default()
        .with_request(RESOURCE_CPU, "100m".parse::<Quantity>()?)
        .with_request(RESOURCE_MEMORY, "128Mi".parse::<Quantity>()?)
        .with_limit(RESOURCE_MEMORY, "512Mi".parse::<Quantity>()?);

    let spec = ServerSpec::builder()
        .name(name.clone())
        .image(image)
        .port(8080)
        .env(vec![
            EnvEntry::value("LOG_LEVEL", "info"),
            EnvEntry::secret("API_TOKEN", "mcp-credentials", "token"),
        ])
        .args(vec!["--transport".to_owned(), "sse".to_owned()])
        .secret_mounts(vec![SecretMount::new("mcp-config", "/etc/mcp")])
        .labels(BTreeMap::from([("team".to_owned(), "tools".to_owned())]))
        .annotations(BTreeMap::from([(
            "description".to_owned(),
            "demo MCP server".to_owned(),
        )]))
        .resources(resources)
        .build()?;

    deployer.deploy_server(&spec).await?;
    println!("deployed {name} in {}", spec.namespace);

    for server in deployer.list_servers(&spec.namespace).await? {
        let endpoint = if server.endpoint.is_empty() {
            "-"
        } else {
            server.endpoint.as_str()
        };
        println!(
            "{}\t{}\tavailable={}\t{}",
            server.name, server.image, server.available, endpoint
        );
    }

    Ok(())
}
