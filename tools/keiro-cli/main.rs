use clap::{Parser, Subcommand};
use itertools::Itertools;
use keiro::prelude::*;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Import, inspect and re-export workflow documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a workflow document and print the resulting graph
    Import {
        /// Path to the workflow JSON file
        path: String,
    },
    /// Import a workflow document and write it back in canonical form
    Export {
        /// Path to the workflow JSON file
        path: String,
        /// Where to write the canonical document (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Check every node of a workflow document against its type's rules
    Validate {
        /// Path to the workflow JSON file
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Import { path } => run_import(&path),
        Command::Export { path, output } => run_export(&path, output.as_deref()),
        Command::Validate { path } => run_validate(&path),
    }
}

/// Reads and imports `path`, exiting on any failure.
fn load_flow(repository: &mut FlowRepository, path: &str) -> FlowId {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read workflow file '{}': {}", path, e))
    });
    repository
        .import_flow(&json)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()))
}

fn run_import(path: &str) {
    let mut repository = FlowRepository::new();
    let start = Instant::now();
    let flow_id = load_flow(&mut repository, path);
    let duration = start.elapsed();

    let Some(flow) = repository.flow_by_id(&flow_id) else {
        exit_with_error("Imported flow disappeared from the repository");
    };

    println!("\nFlow '{}' (config {})", flow.name, flow.config_id);
    println!(
        "  type: {}, status: {}, owner: {}",
        flow.config_type, flow.config_status, flow.config_owner
    );
    if !flow.input.is_empty() {
        println!("  inputs: {}", flow.input.keys().join(", "));
    }
    if !flow.required.is_empty() {
        println!("  required: {}", flow.required.keys().join(", "));
    }

    let graph = flow.graph();
    println!("\n--- Nodes ({}) ---", graph.nodes.len());
    for (index, node) in graph.nodes.iter().enumerate() {
        let marker = if index == 0 { " (start)" } else { "" };
        let end = if node.end { " [end]" } else { "" };
        println!(
            "  {:<24} {:<12} at ({}, {}){}{}",
            node.name, node.node_type, node.position.x, node.position.y, marker, end
        );
    }

    println!("\n--- Connections ({}) ---", graph.connections.len());
    for connection in &graph.connections {
        let name_of = |id: &str| {
            graph
                .node(id)
                .map_or_else(|| id.to_string(), |n| n.name.clone())
        };
        let kind = match connection.connection_type {
            Some(ConnectionType::Choice) => " (choice)",
            None => "",
        };
        println!(
            "  {} -> {}{}",
            name_of(&connection.source_id),
            name_of(&connection.target_id),
            kind
        );
    }

    println!("\nImported in {:?}", duration);
}

fn run_export(path: &str, output: Option<&str>) {
    let mut repository = FlowRepository::new();
    let flow_id = load_flow(&mut repository, path);
    let json = repository
        .export_flow_json(&flow_id)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    match output {
        Some(output_path) => {
            fs::write(output_path, json).unwrap_or_else(|e| {
                exit_with_error(&format!("Could not write to file '{}': {}", output_path, e))
            });
            println!("Wrote canonical document to '{}'", output_path);
        }
        None => println!("{}", json),
    }
}

fn run_validate(path: &str) {
    let mut repository = FlowRepository::new();
    let flow_id = load_flow(&mut repository, path);
    let Some(flow) = repository.flow_by_id(&flow_id) else {
        exit_with_error("Imported flow disappeared from the repository");
    };

    let failures = flow.validate(repository.importer().registry());
    if failures.is_empty() {
        println!("All {} nodes are valid.", flow.nodes.len());
        return;
    }

    println!("{} of {} nodes are invalid:", failures.len(), flow.nodes.len());
    for (name, report) in &failures {
        println!("  - {}: {}", name, report);
    }
    std::process::exit(1);
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
