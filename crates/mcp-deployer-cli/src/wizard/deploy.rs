use std::collections::BTreeMap;

use anyhow::Result;
use colored::Colorize;
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;

use mcp_deployer::k8::{Quantity, RESOURCE_CPU, RESOURCE_MEMORY, ResourceRequirements};
use mcp_deployer::{
    ClusterApi, DEFAULT_NAMESPACE, DEFAULT_PORT, EnvEntry, MCP_SERVER_LABEL,
    MCP_SERVER_LABEL_VALUE, SecretMount, ServerSpec, SimpleDeployer,
};

use crate::prompt::{confirm, key_values, optional, port, required, with_default};
use crate::render::render_spec_summary;

pub async fn run<C: ClusterApi>(deployer: &SimpleDeployer<C>) -> Result<()> {
    let spec = collect_spec()?;

    println!();
    println!("{}", render_spec_summary(&spec)?);
    if !confirm("Deploy this server?")? {
        println!("Deployment cancelled");
        return Ok(());
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

fn collect_spec() -> Result<ServerSpec> {
    let name = required("Server name")?;
    let namespace = with_default("Namespace", DEFAULT_NAMESPACE)?;
    let image = required("Container image")?;
    let port = port("Container port", DEFAULT_PORT)?;

    let env = collect_env()?;
    let args = collect_args()?;
    let secret_mounts = collect_secret_mounts()?;
    let service_account = optional("Service account (empty for the namespace default)")?;
    let labels: BTreeMap<_, _> = key_values("Label")?.into_iter().collect();
    if let Some(warning) = reserved_label_warning(&labels) {
        println!("{} {warning}", "warning:".yellow().bold());
    }
    let annotations: BTreeMap<_, _> = key_values("Annotation")?.into_iter().collect();
    let resources = collect_resources()?;

    Ok(ServerSpec {
        name,
        namespace,
        image,
        port,
        env,
        args,
        secret_mounts,
        service_account,
        labels,
        annotations,
        resources,
    })
}

/// The identifying label is always set to `"true"` when deploying, whatever
/// the user typed for it.
fn reserved_label_warning(labels: &BTreeMap<String, String>) -> Option<String> {
    labels
        .get(MCP_SERVER_LABEL)
        .filter(|value| value.as_str() != MCP_SERVER_LABEL_VALUE)
        .map(|value| {
            format!(
                "label {MCP_SERVER_LABEL}={value} will be replaced by {MCP_SERVER_LABEL}={MCP_SERVER_LABEL_VALUE}"
            )
        })
}

fn collect_env() -> Result<Vec<EnvEntry>> {
    let mut env = vec![];
    while confirm("Add an environment variable?")? {
        let name = required("Variable name")?;
        let source = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Value source")
            .items(&["Plain value", "Secret key"])
            .default(0)
            .interact()?;

        let entry = if source == 0 {
            EnvEntry::value(name, optional("Value")?)
        } else {
            EnvEntry::secret(name, required("Secret name")?, required("Secret key")?)
        };
        env.push(entry);
    }
    Ok(env)
}

fn collect_args() -> Result<Vec<String>> {
    let mut args = vec![];
    loop {
        let arg = optional("Container argument (empty to finish)")?;
        if arg.is_empty() {
            return Ok(args);
        }
        args.push(arg);
    }
}

fn collect_secret_mounts() -> Result<Vec<SecretMount>> {
    let mut mounts = vec![];
    while confirm("Mount a secret?")? {
        let secret_name = required("Secret name")?;
        let mount_path = required("Mount path")?;
        mounts.push(SecretMount::new(secret_name, mount_path));
    }
    Ok(mounts)
}

fn collect_resources() -> Result<Option<ResourceRequirements>> {
    if !confirm("Set resource requests and limits?")? {
        return Ok(None);
    }

    let answers = ResourceAnswers {
        cpu_request: optional("CPU request (e.g. 100m, empty to skip)")?,
        memory_request: optional("Memory request (e.g. 128Mi, empty to skip)")?,
        cpu_limit: optional("CPU limit (e.g. 500m, empty to skip)")?,
        memory_limit: optional("Memory limit (e.g. 512Mi, empty to skip)")?,
    };

    let (resources, warnings) = answers.into_requirements();
    for warning in warnings {
        println!("{} {warning}, skipped", "warning:".yellow().bold());
    }
    Ok(resources)
}

/// Raw answers of the resources prompts
#[derive(Debug, Default)]
struct ResourceAnswers {
    cpu_request: String,
    memory_request: String,
    cpu_limit: String,
    memory_limit: String,
}

impl ResourceAnswers {
    /// Unparsable quantities are dropped and reported. Nothing set means
    /// no resources at all.
    fn into_requirements(self) -> (Option<ResourceRequirements>, Vec<String>) {
        let mut resources = ResourceRequirements::default();
        let mut warnings = vec![];

        let entries = [
            (true, RESOURCE_CPU, self.cpu_request),
            (true, RESOURCE_MEMORY, self.memory_request),
            (false, RESOURCE_CPU, self.cpu_limit),
            (false, RESOURCE_MEMORY, self.memory_limit),
        ];

        for (request, resource, answer) in entries {
            if answer.trim().is_empty() {
                continue;
            }
            match answer.parse::<Quantity>() {
                Ok(quantity) if request => resources = resources.with_request(resource, quantity),
                Ok(quantity) => resources = resources.with_limit(resource, quantity),
                Err(err) => warnings.push(err.to_string()),
            }
        }

        if resources.is_empty() {
            (None, warnings)
        } else {
            (Some(resources), warnings)
        }
    }
}
