use clap::Parser;
use michi::data::script::{VisitorAction, VisitorScript, apply};
use michi::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Plays a video funnel headless, from a visitor script or interactively
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the funnel JSON file (or a bundle with --bundle)
    funnel_path: Option<String>,
    /// Optional path to a visitor script JSON file
    script_path: Option<String>,

    /// Treat the funnel path as a bincode bundle
    #[arg(long)]
    bundle: bool,

    /// Path to a player configuration JSON file
    #[arg(short, long)]
    config: Option<String>,

    /// Write the converted funnel as a bundle to this path
    #[arg(long)]
    bundle_out: Option<String>,

    /// Append the lead submission as a JSON line to this file
    #[arg(long)]
    submission_out: Option<String>,

    /// Only print the graph diagnostics
    #[arg(long)]
    check: bool,

    /// Run in interactive mode to be prompted for answers
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("michi=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let funnel_path = cli
        .funnel_path
        .clone()
        .unwrap_or_else(|| exit_with_error("Funnel path is required."));

    // --- 1. Loading ---
    let load_start = Instant::now();
    let funnel = load_funnel(&funnel_path, cli.bundle);
    let config = match &cli.config {
        Some(path) => PlayerConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => PlayerConfig::default(),
    };
    let graph = Arc::new(FunnelGraph::new(funnel));
    let load_duration = load_start.elapsed();

    println!(
        "Loaded funnel '{}' ({} nodes, {} edges) in {:?}",
        graph.name(),
        graph.nodes().len(),
        graph.edges().len(),
        load_duration
    );

    if let Some(path) = &cli.bundle_out {
        FunnelBundle::new(graph.data().clone())
            .save(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write bundle: {}", e)));
        println!("Bundle written to '{}'", path);
    }

    if cli.check {
        print_diagnostics(&graph);
        return;
    }

    let mut player = FunnelPlayer::builder(Arc::clone(&graph))
        .config(config)
        .build();
    println!("Session {}", player.session_id());

    if cli.human {
        run_interactive(&mut player);
    } else {
        let script = match &cli.script_path {
            Some(path) => VisitorScript::from_file(path)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to load script: {}", e))),
            None => {
                println!("No visitor script provided. Watching passively.");
                VisitorScript::passive(graph.nodes().len())
            }
        };
        run_script(&mut player, &script);
    }

    // --- Hand-off ---
    match player.submission() {
        Some(submission) => {
            println!("\n--- Responses ---");
            for response in &submission.responses {
                println!(
                    "  {:<12} {:<15} {}",
                    response.node_id, response.answer_type, response.answer
                );
            }
            if let Some(lead) = &submission.lead_data {
                println!("--- Lead ---");
                for (field, value) in lead {
                    println!("  {}: {}", field, value);
                }
            }
            if let Some(path) = &cli.submission_out {
                write_submission(path, &submission);
            }
        }
        None => println!("\nFunnel not completed, nothing to submit."),
    }
}

fn load_funnel(path: &str, bundle: bool) -> FunnelData {
    if bundle {
        return FunnelBundle::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load bundle: {}", e)))
            .funnel;
    }
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read funnel file '{}': {}", path, e))
    });
    FunnelData::from_json(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert funnel: {}", e)))
}

fn print_diagnostics(graph: &FunnelGraph) {
    let diagnostics = graph.diagnostics();
    if diagnostics.is_empty() {
        println!("No issues found.");
        return;
    }
    for diagnostic in diagnostics {
        println!("  [{:?}] {}", diagnostic.severity, diagnostic);
    }
}

fn write_submission(path: &str, submission: &LeadSubmission) {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Could not open '{}': {}", path, e)));
    JsonLinesSink::new(file)
        .submit(submission)
        .unwrap_or_else(|e| exit_with_error(&format!("Submission failed: {}", e)));
    println!("Submission appended to '{}'", path);
}

/// Runs a visitor script and prints each screen along the way.
fn run_script(player: &mut FunnelPlayer, script: &VisitorScript) {
    let start = Instant::now();
    for step in script.play_on(player) {
        println!(
            "\n{:?} -> {:?} (at {})",
            step.action,
            step.step,
            step.node_id.as_deref().unwrap_or("-")
        );
        println!("{}", ViewFormatter::format_view(&player.view()));
    }
    println!("\nScript finished in {:?}", start.elapsed());
}

/// Runs the funnel in an interactive, human-friendly mode with prompts.
fn run_interactive(player: &mut FunnelPlayer) {
    println!("--- Michi Interactive Mode ---");

    loop {
        if player.is_transitioning() {
            player.finish_transition();
        }
        println!("\n{}", ViewFormatter::format_view(&player.view()));

        let action = match player.view() {
            View::Start { .. } => {
                prompt_for_input("Press enter to start", None);
                VisitorAction::Start
            }
            View::End { .. } => break,
            View::Blank => break,
            View::Video { controls: None, .. } => {
                let seconds = prompt_for_input("Watch for how many seconds", Some("10"));
                VisitorAction::Watch {
                    seconds: seconds.parse().ok(),
                }
            }
            View::Video {
                controls: Some(controls),
                ..
            } => prompt_for_answer(&controls),
            View::LeadCapture { fields, .. } => {
                let mut values = LeadData::new();
                for field in fields {
                    let value = prompt_for_input(&field.label, None);
                    if !value.is_empty() {
                        values.insert(field.name.clone(), value);
                    }
                }
                VisitorAction::Lead { fields: values }
            }
        };

        match apply(player, &action) {
            Step::Ignored => println!("(nothing happened, try again)"),
            Step::Stayed => {
                println!("This funnel has no way forward from here.");
                break;
            }
            _ => {}
        }
    }
}

fn prompt_for_answer(controls: &Controls<'_>) -> VisitorAction {
    match controls {
        Controls::Button { label, .. } => {
            prompt_for_input(&format!("Press enter for '{}'", label), None);
            VisitorAction::Button
        }
        Controls::YesNo => {
            let answer = prompt_for_input("Yes or no (y/n)", Some("y"));
            VisitorAction::YesNo {
                yes: answer.to_lowercase().starts_with('y'),
            }
        }
        Controls::Text { .. } | Controls::Email { .. } => VisitorAction::Text {
            value: prompt_for_input("Your answer", None),
        },
        Controls::Rating { .. } => {
            let rating = prompt_for_input("Rating from 1 to 5", Some("3"));
            VisitorAction::Rate {
                rating: rating.parse().unwrap_or(0),
            }
        }
        Controls::MultipleChoice { .. } => {
            let index = prompt_for_input("Option number", Some("0"));
            VisitorAction::Choose {
                index: index.parse().unwrap_or(usize::MAX),
            }
        }
    }
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if let Err(e) = io::stdout().flush() {
        exit_with_error(&format!("Failed to write prompt: {}", e));
    }
    if let Err(e) = io::stdin().read_line(&mut line) {
        exit_with_error(&format!("Failed to read line: {}", e));
    }
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
