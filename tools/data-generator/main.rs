use clap::Parser;
use keiro::registry::{CONDITIONAL, END, EXECUTE, PARALLEL, REST_API, START};
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use serde_json::{Map, Value, json};
use std::fs;

/// A CLI tool to generate workflow documents for exercising the importer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_workflow.json")]
    output: String,

    /// The number of nodes between the start and the end node
    #[arg(short, long, default_value_t = 8)]
    nodes: usize,

    /// The number of input parameters to declare
    #[arg(long, default_value_t = 3)]
    params: usize,

    /// Write the legacy vintage of the format (bare inputs, object `required`,
    /// `type` keys and top-level `choices`)
    #[arg(long)]
    legacy: bool,
}

const MIDDLE_TYPES: [&str; 4] = [CONDITIONAL, EXECUTE, PARALLEL, REST_API];
const HTTP_METHODS: [&str; 3] = ["GET", "POST", "PUT"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    println!(
        "Generating a workflow with {} inner nodes ({} format)...",
        cli.nodes,
        if cli.legacy { "legacy" } else { "current" }
    );

    let names = node_names(cli.nodes);
    let document = generate_document(&mut rng, &names, cli.params, cli.legacy);

    let json_output = serde_json::to_string_pretty(&document)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved workflow to '{}'",
        cli.output
    );

    Ok(())
}

/// `Start`, `Step 1` .. `Step n`, `End`.
fn node_names(inner: usize) -> Vec<String> {
    let mut names = Vec::with_capacity(inner + 2);
    names.push("Start".to_string());
    names.extend((1..=inner).map(|i| format!("Step {}", i)));
    names.push("End".to_string());
    names
}

fn generate_document(rng: &mut ThreadRng, names: &[String], params: usize, legacy: bool) -> Value {
    let param_names: Vec<String> = (1..=params).map(|i| format!("param{}", i)).collect();

    let mut input = Map::new();
    for name in &param_names {
        let value = json!(rng.random_range(0..1000));
        let entry = if legacy {
            value
        } else {
            json!({ "type": "value", "value": value })
        };
        input.insert(name.clone(), entry);
    }

    let required_names: Vec<&String> = param_names
        .iter()
        .filter(|_| rng.random_bool(0.5))
        .collect();
    let required = if legacy {
        Value::Object(
            required_names
                .iter()
                .map(|name| (name.to_string(), input[name.as_str()].clone()))
                .collect(),
        )
    } else {
        json!(required_names)
    };

    let mut nodes = Map::new();
    let type_key = if legacy { "type" } else { "nodeType" };
    for (index, name) in names.iter().enumerate() {
        let node_type = if index == 0 {
            START
        } else if index == names.len() - 1 {
            END
        } else {
            MIDDLE_TYPES.choose(rng).copied().unwrap_or(EXECUTE)
        };
        let next = names.get(index + 1);

        let mut def = Map::new();
        def.insert(type_key.to_string(), json!(node_type));
        def.insert("config".to_string(), generate_config(rng, node_type, names));
        def.insert("next".to_string(), json!(next));
        def.insert("end".to_string(), json!(node_type == END));

        if node_type == CONDITIONAL {
            let choices = generate_choices(rng, &names[index + 1..]);
            if legacy {
                def.insert("choices".to_string(), choices);
            } else {
                def.insert("nodeAttributes".to_string(), json!({ "choices": choices }));
            }
        }

        nodes.insert(name.clone(), Value::Object(def));
    }

    json!({
        "configId": format!("generated-{}", rng.random_range(1000..10000)),
        "configType": "workflow",
        "configStatus": "draft",
        "configOwner": "data-gen",
        "configDescription": "Generated workflow",
        "input": input,
        "required": required,
        "config": {
            "startNode": names.first(),
            "nodes": nodes
        }
    })
}

fn generate_config(rng: &mut ThreadRng, node_type: &str, names: &[String]) -> Value {
    match node_type {
        CONDITIONAL => json!({
            "condition": format!("data.value > {}", rng.random_range(0..100)),
            "evaluationType": "javascript",
            "contextVariable": "data"
        }),
        EXECUTE => json!({ "configId": format!("sub-{}", rng.random_range(1..50)) }),
        PARALLEL => {
            let picked: Vec<&String> = names.choose_multiple(rng, 2).collect();
            json!({ "nodeNames": picked, "waitForAll": true, "errorHandling": "continueOnError" })
        }
        REST_API => {
            let method = HTTP_METHODS.choose(rng).copied().unwrap_or("GET");
            json!({
                "url": format!("https://api.example.com/items/{}", rng.random_range(1..500)),
                "method": method
            })
        }
        END => json!({ "endType": "success", "statusCode": 200 }),
        _ => json!({}),
    }
}

/// One or two branches pointing at nodes further down the chain.
fn generate_choices(rng: &mut ThreadRng, targets: &[String]) -> Value {
    let count = rng.random_range(1..=2).min(targets.len());
    let choices: Vec<Value> = targets
        .choose_multiple(rng, count)
        .enumerate()
        .map(|(i, target)| json!({ "condition": format!("data.branch == {}", i), "next": target }))
        .collect();
    Value::Array(choices)
}
