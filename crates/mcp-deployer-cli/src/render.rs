//! Terminal output of servers and specs.

use std::collections::BTreeMap;

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Cell, Row, Table};

use mcp_deployer::{EnvSource, ServerSpec, ServerStatus};

pub const NO_SERVERS: &str = "No MCP servers found";

#[derive(ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    #[default]
    Table,
    Json,
    Yaml,
}

pub fn render_servers(servers: &[ServerStatus], output: OutputType) -> Result<String> {
    let text = match output {
        OutputType::Table if servers.is_empty() => NO_SERVERS.to_owned(),
        OutputType::Table => server_table(servers).to_string(),
        OutputType::Json => serde_json::to_string_pretty(servers)?,
        OutputType::Yaml => serde_yaml::to_string(servers)?,
    };
    Ok(text)
}

pub fn server_table(servers: &[ServerStatus]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::NOTHING);
    table.set_header(Row::from([
        "NAME",
        "NAMESPACE",
        "IMAGE",
        "STATUS",
        "ENDPOINT",
        "LABELS",
        "ANNOTATIONS",
        "CONDITIONS",
    ]));

    for server in servers {
        let mut row = Row::new();
        row.add_cell(Cell::new(&server.name));
        row.add_cell(Cell::new(&server.namespace));
        row.add_cell(Cell::new(&server.image));
        row.add_cell(availability_cell(server.available));
        row.add_cell(Cell::new(&server.endpoint));
        row.add_cell(Cell::new(format_map(&server.labels)));
        row.add_cell(Cell::new(format_map(&server.annotations)));
        row.add_cell(Cell::new(server.conditions.join("\n")));
        table.add_row(row);
    }

    table
}

/// Short listing used to pick a server to delete
pub fn server_choice_table(servers: &[ServerStatus]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::NOTHING);
    table.set_header(Row::from(["NAME", "IMAGE", "STATUS"]));
    for server in servers {
        let mut row = Row::new();
        row.add_cell(Cell::new(&server.name));
        row.add_cell(Cell::new(&server.image));
        row.add_cell(availability_cell(server.available));
        table.add_row(row);
    }
    table
}

pub fn availability(available: bool) -> &'static str {
    if available { "Available" } else { "Not ready" }
}

fn availability_cell(available: bool) -> Cell {
    let text = availability(available);
    if available {
        Cell::new(text.green())
    } else {
        Cell::new(text.yellow())
    }
}

/// `key=value` pairs, one per line
pub fn format_map(map: &BTreeMap<String, String>) -> String {
    map.iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Human readable summary shown before a deploy is confirmed
pub fn render_spec_summary(spec: &ServerSpec) -> Result<String> {
    let mut lines = vec![
        format!("{}", "Server summary".bold()),
        format!("  name:            {}", spec.name),
        format!("  namespace:       {}", spec.namespace),
        format!("  image:           {}", spec.image),
        format!("  port:            {}", spec.port),
    ];

    if !spec.service_account.is_empty() {
        lines.push(format!("  service account: {}", spec.service_account));
    }
    if !spec.args.is_empty() {
        lines.push(format!("  args:            {}", spec.args.join(" ")));
    }
    if !spec.env.is_empty() {
        lines.push("  env:".to_owned());
        for entry in &spec.env {
            let source = match &entry.source {
                EnvSource::Value(value) => value.clone(),
                EnvSource::Secret { name, key } => format!("<secret {name}/{key}>"),
            };
            lines.push(format!("    {}={}", entry.name, source));
        }
    }
    if !spec.secret_mounts.is_empty() {
        lines.push("  secret mounts:".to_owned());
        for mount in &spec.secret_mounts {
            lines.push(format!("    {} -> {}", mount.secret_name, mount.mount_path));
        }
    }
    for (title, map) in [("labels", &spec.labels), ("annotations", &spec.annotations)] {
        if !map.is_empty() {
            lines.push(format!("  {title}:"));
            for (key, value) in map {
                lines.push(format!("    {key}={value}"));
            }
        }
    }
    if let Some(resources) = &spec.resources {
        lines.push("  resources:".to_owned());
        let yaml = serde_yaml::to_string(resources)?;
        lines.extend(yaml.lines().map(|line| format!("    {line}")));
    }

    Ok(lines.join("\n"))
}
