use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::{Value, json};
use std::fs;

/// A CLI tool to generate flow documents for exercising keiro's migration
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// The maximum nesting depth of composite modules
    #[arg(long, default_value_t = 2)]
    depth: usize,

    /// The maximum number of modules per sequence
    #[arg(long, default_value_t = 4)]
    width: usize,

    /// Emit legacy field shapes (missing ids, staged transforms, split stop
    /// conditions, doubly-nested loop wrappers)
    #[arg(long)]
    legacy: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.width == 0 {
        eprintln!("Error: --width must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating a {} flow document (depth {}, width {})...",
        if cli.legacy { "legacy-shaped" } else { "canonical" },
        cli.depth,
        cli.width
    );

    let mut next_id = 0u64;
    let modules = generate_sequence(&mut rng, &cli, cli.depth, &mut next_id);
    let doc = json!({ "modules": modules });

    let json_output = serde_json::to_string_pretty(&doc)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved a flow document to '{}'",
        cli.output
    );

    Ok(())
}

fn generate_sequence(rng: &mut ThreadRng, cli: &Cli, depth: usize, next_id: &mut u64) -> Vec<Value> {
    let count = rng.random_range(1..=cli.width);
    (0..count)
        .map(|_| generate_module(rng, cli, depth, next_id))
        .collect()
}

fn generate_module(rng: &mut ThreadRng, cli: &Cli, depth: usize, next_id: &mut u64) -> Value {
    let roll = rng.random_range(0..100);
    let mut module = if depth > 0 && roll < 40 {
        match rng.random_range(0..3) {
            0 => generate_forloop(rng, cli, depth, next_id),
            1 => generate_branchone(rng, cli, depth, next_id),
            _ => generate_branchall(rng, cli, depth, next_id),
        }
    } else if roll >= 90 {
        json!({ "value": { "type": "identity" } })
    } else {
        generate_rawscript(rng, cli)
    };

    // Legacy documents are missing ids on roughly half their modules.
    if !cli.legacy || rng.random_bool(0.5) {
        module["id"] = json!(fresh_id(next_id));
    }
    if cli.legacy && rng.random_bool(0.25) {
        module["stop_after_if_expr"] = json!("result == false");
        module["skip_if_stopped"] = json!(rng.random_bool(0.5));
    }

    module
}

fn generate_rawscript(rng: &mut ThreadRng, cli: &Cli) -> Value {
    let transforms = json!({
        "x": { "type": "static", "value": rng.random_range(0..100) },
        "y": { "type": "javascript", "expr": "previous_result.value" },
    });
    let content = "export function main(x: number, y: any) { return x; }";

    if cli.legacy && rng.random_bool(0.5) {
        // Transforms staged on the module wrapper, the pre-canonical layout.
        json!({
            "input_transforms": transforms,
            "value": { "type": "rawscript", "content": content, "language": "deno" },
        })
    } else {
        json!({
            "value": {
                "type": "rawscript",
                "input_transforms": transforms,
                "content": content,
                "language": "deno",
            },
        })
    }
}

fn generate_forloop(rng: &mut ThreadRng, cli: &Cli, depth: usize, next_id: &mut u64) -> Value {
    let children = generate_sequence(rng, cli, depth - 1, next_id);
    let iterator = json!({ "type": "javascript", "expr": "previous_result.items" });

    if cli.legacy && rng.random_bool(0.5) {
        // The doubly-nested wrapper older documents used for loop bodies.
        json!({
            "value": { "type": "forloopflow", "iterator": iterator, "value": { "modules": children } },
        })
    } else {
        json!({
            "value": {
                "type": "forloopflow",
                "iterator": iterator,
                "modules": children,
                "skip_failures": false,
            },
        })
    }
}

fn generate_branchone(rng: &mut ThreadRng, cli: &Cli, depth: usize, next_id: &mut u64) -> Value {
    let branch_count = rng.random_range(1..=2);
    let branches: Vec<Value> = (0..branch_count)
        .map(|i| {
            json!({
                "expr": format!("previous_result.kind == {}", i),
                "modules": generate_sequence(rng, cli, depth - 1, next_id),
            })
        })
        .collect();

    json!({
        "value": {
            "type": "branchone",
            "branches": branches,
            "default": generate_sequence(rng, cli, depth - 1, next_id),
        },
    })
}

fn generate_branchall(rng: &mut ThreadRng, cli: &Cli, depth: usize, next_id: &mut u64) -> Value {
    let branch_count = rng.random_range(1..=3);
    let branches: Vec<Value> = (0..branch_count)
        .map(|_| {
            json!({
                "skip_failure": rng.random_bool(0.2),
                "modules": generate_sequence(rng, cli, depth - 1, next_id),
            })
        })
        .collect();

    json!({ "value": { "type": "branchall", "branches": branches, "parallel": true } })
}

/// Sequential lowercase base36 ids, starting where keiro's own counter does.
fn fresh_id(next: &mut u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = *next + 40;
    *next += 1;
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    out.into_iter().rev().collect()
}
