use clap::{Parser, ValueEnum};
use itertools::Itertools;
use keiro::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::time::Instant;

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderCli {
    Preview,
    Completion,
}

/// A flow document migration and inspection CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the flow document JSON file (legacy shapes accepted)
    flow_path: Option<String>,

    /// The traversal order to print
    #[arg(short, long, value_enum)]
    order: Option<OrderCli>,

    /// Resolve this selection id and print the activation
    #[arg(short, long)]
    select: Option<String>,

    /// Write the migrated canonical document to this path
    #[arg(short, long)]
    write: Option<String>,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.human {
        run_interactive();
    } else {
        run_non_interactive(cli);
    }
}

fn run_inspection(
    flow_path: String,
    order: TraversalOrder,
    select: Option<String>,
    write: Option<String>,
) {
    let total_start = Instant::now();

    // --- 1. File Loading ---
    let flow_json = fs::read_to_string(&flow_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read flow file '{}': {}", &flow_path, e))
    });

    // --- 2. Migration ---
    println!("\nMigrating document to the canonical shape...");
    let migrate_start = Instant::now();
    let doc: serde_json::Value = serde_json::from_str(&flow_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse flow JSON: {}", e)));
    let (doc, report) = Migrator::new()
        .migrate(doc)
        .unwrap_or_else(|e| exit_with_error(&format!("Migration failed: {}", e)));
    let flow: FlowValue = serde_json::from_value(doc.clone())
        .unwrap_or_else(|e| exit_with_error(&format!("Canonical document is invalid: {}", e)));
    let migrate_duration = migrate_start.elapsed();

    if report.is_noop() {
        println!("Document was already canonical.");
    } else {
        if !report.assigned_ids.is_empty() {
            println!(
                "Assigned {} missing id(s): {}",
                report.assigned_ids.len(),
                report.assigned_ids.iter().join(", ")
            );
        }
        if report.renamed_transforms > 0 {
            println!("Renamed {} legacy transform field(s)", report.renamed_transforms);
        }
        if report.folded_transforms > 0 {
            println!("Folded {} staged transform map(s)", report.folded_transforms);
        }
        if report.rebuilt_stop_conditions > 0 {
            println!("Rebuilt {} stop condition(s)", report.rebuilt_stop_conditions);
        }
        if report.unwrapped_loops > 0 {
            println!("Unwrapped {} legacy loop wrapper(s)", report.unwrapped_loops);
        }
    }

    // --- 3. Traversal ---
    let ids = flatten_order(&flow.modules, order);
    println!(
        "\n{} order ({} modules):",
        match order {
            TraversalOrder::Preview => "Preview",
            TraversalOrder::Completion => "Completion",
        },
        ids.len()
    );
    println!("  {}", ids.iter().join(" -> "));

    // --- 4. Selection ---
    if let Some(selected_id) = select {
        println!("\nResolving selection '{}'...", selected_id);
        match resolve(&flow.modules, &selected_id) {
            Some(Selection::Module {
                module,
                parent,
                previous_sibling,
            }) => {
                println!("  -> Module '{}' ({})", module.id, module.value);
                if let Some(parent) = parent {
                    println!("  -> Nested inside '{}'", parent.id);
                }
                if let Some(previous) = previous_sibling {
                    println!("  -> Previous sibling: '{}'", previous);
                }
            }
            Some(Selection::BranchSurface { module, target }) => match target {
                BranchTarget::Default => {
                    println!("  -> Default branch surface of '{}'", module.id)
                }
                BranchTarget::Index(i) => {
                    println!("  -> Branch surface {} of '{}'", i, module.id)
                }
            },
            None => println!("  -> Nothing selected"),
        }
    }

    // --- 5. Output ---
    if let Some(out_path) = write {
        let pretty = serde_json::to_string_pretty(&doc)
            .unwrap_or_else(|e| exit_with_error(&format!("Serialization failed: {}", e)));
        fs::write(&out_path, pretty).unwrap_or_else(|e| {
            exit_with_error(&format!("Could not write to '{}': {}", out_path, e))
        });
        println!("\nCanonical document written to '{}'", out_path);
    }

    let total_duration = total_start.elapsed();
    println!("\n--- Performance Summary ---");
    println!("Migration:       {:?}", migrate_duration);
    println!("Total Execution: {:?}", total_duration);
    println!();
}

/// Runs the CLI in non-interactive mode, taking all arguments from the command line.
fn run_non_interactive(cli: Cli) {
    let flow_path = cli.flow_path.unwrap_or_else(|| {
        exit_with_error("Flow path is required in non-interactive mode.");
    });
    let order = match cli.order.unwrap_or(OrderCli::Preview) {
        OrderCli::Preview => TraversalOrder::Preview,
        OrderCli::Completion => TraversalOrder::Completion,
    };

    run_inspection(flow_path, order, cli.select, cli.write);
}

/// Runs the CLI in an interactive, human-friendly mode with prompts.
fn run_interactive() {
    println!("--- Keiro Interactive Mode ---");

    let flow_path = prompt_for_input("Enter flow document path", Some("data/flow.json"));
    let select_str = prompt_for_input("Enter a selection id to resolve (optional)", None);
    let select = if select_str.is_empty() {
        None
    } else {
        Some(select_str)
    };

    let order = loop {
        println!("\nPlease select a traversal order:");
        println!("  1: Preview (composite before its children)");
        println!("  2: Completion (composite after its children)");
        let choice_str = prompt_for_input("Enter choice", Some("1"));

        match choice_str.trim() {
            "1" => break TraversalOrder::Preview,
            "2" => break TraversalOrder::Completion,
            _ => println!("Invalid choice. Please enter 1 or 2."),
        }
    };

    run_inspection(flow_path, order, select, None);
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    io::stdout().flush().unwrap();

    io::stdin()
        .read_line(&mut line)
        .expect("Failed to read line");
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
