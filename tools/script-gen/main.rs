use clap::Parser;
use michi::data::script::{VisitorAction, VisitorScript, apply};
use michi::prelude::*;
use rand::Rng;
use rand::rngs::ThreadRng;
use std::fs;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// A CLI tool to generate random visitor scripts for a funnel
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the funnel JSON file
    funnel_path: String,

    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_script.json")]
    output: String,

    /// Upper bound of actions, in case the funnel loops
    #[arg(long, default_value_t = 100)]
    max_actions: usize,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("michi=warn")),
        )
        .init();

    let cli = Cli::parse();
    let mut rng = rand::rng();

    let json = fs::read_to_string(&cli.funnel_path)?;
    let graph = Arc::new(FunnelGraph::new(FunnelData::from_json(&json)?));
    let mut player = FunnelPlayer::new(Arc::clone(&graph));

    println!("Generating a random visitor for '{}'...", graph.name());

    let mut actions = vec![VisitorAction::Start];
    apply(&mut player, &VisitorAction::Start);

    while actions.len() < cli.max_actions && !player.is_completed() {
        let Some(action) = next_action(&player, &mut rng) else {
            break;
        };
        if apply(&mut player, &action) == Step::Stayed {
            actions.push(action);
            break;
        }
        if player.is_transitioning() {
            player.finish_transition();
        }
        actions.push(action);
    }

    let reached = player.current_node_id().unwrap_or("-").to_string();
    let script = VisitorScript { actions };
    fs::write(&cli.output, serde_json::to_string_pretty(&script)?)?;

    println!(
        "Successfully generated {} actions (ending at '{}') and saved them to '{}'",
        script.actions.len(),
        reached,
        cli.output
    );
    Ok(())
}

/// Picks a plausible action for what the visitor currently sees.
fn next_action(player: &FunnelPlayer, rng: &mut ThreadRng) -> Option<VisitorAction> {
    let action = match player.view() {
        View::Video { controls: None, .. } => VisitorAction::Watch {
            seconds: Some(f64::from(rng.random_range(5..=30u8))),
        },
        View::Video {
            controls: Some(controls),
            ..
        } => match controls {
            Controls::Button { .. } => VisitorAction::Button,
            Controls::YesNo => VisitorAction::YesNo {
                yes: rng.random_bool(0.5),
            },
            Controls::Text { .. } => VisitorAction::Text {
                value: format!("answer-{}", rng.random_range(1..1000)),
            },
            Controls::Email { .. } => VisitorAction::Text {
                value: format!("visitor{}@example.com", rng.random_range(1..1000)),
            },
            Controls::Rating { .. } => VisitorAction::Rate {
                rating: rng.random_range(1..=5),
            },
            Controls::MultipleChoice { options } => VisitorAction::Choose {
                index: rng.random_range(0..options.len()),
            },
        },
        View::LeadCapture { fields, .. } => VisitorAction::Lead {
            fields: fields
                .iter()
                .map(|field| {
                    let value = match field.input_type.as_str() {
                        "email" => format!("lead{}@example.com", rng.random_range(1..1000)),
                        "tel" => format!("+49 {}", rng.random_range(100_000..999_999)),
                        _ => format!("{}-{}", field.name, rng.random_range(1..100)),
                    };
                    (field.name.clone(), value)
                })
                .collect(),
        },
        View::Start { .. } | View::Blank | View::End { .. } => return None,
    };
    Some(action)
}
