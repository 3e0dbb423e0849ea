//! kkm-patch - Main entry point
//!
//! Runs one patch script against one file and prints its success message.

use std::path::Path;

use anyhow::{Context, Result};
use strum::IntoEnumIterator;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use kkm_patch::cli::{Cli, Commands};
use kkm_patch::{run_patch, PatchPlan, PatchScript, RunOptions, ScriptKind};

/// Initialize logging. Logs go to stderr; stdout carries only results.
/// `RUST_LOG` overrides the default `warn` level.
fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logger();

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    if let Err(e) = run(&cli) {
        eprintln!("{}", failure_line(&e));
        std::process::exit(1);
    }
}

/// The one line a failed run writes to stderr.
fn failure_line(e: &anyhow::Error) -> String {
    format!("✗ {:#}", e)
}

fn run(cli: &Cli) -> Result<()> {
    let options = RunOptions::with_root(&cli.root)
        .dry_run(cli.dry_run)
        .strict(cli.strict);

    match &cli.command {
        Commands::Run { script } => {
            info!("Running built-in script {}", script);
            let script = script.script();
            apply(script.as_ref(), &options)
        }
        Commands::Apply { plan } => {
            let plan = load_plan(plan)?;
            apply(&plan, &options)
        }
        Commands::Validate { plan } => {
            let plan = load_plan(plan)?;
            println!(
                "✓ Plan '{}' is valid: {} rule(s) for {}",
                plan.name,
                plan.rules.len(),
                plan.target.display()
            );
            Ok(())
        }
        Commands::List => {
            for kind in ScriptKind::iter() {
                let script = kind.script();
                println!("{:<20} {}", kind, script.target().display());
                println!("{:<20} {}", "", kind.description());
            }
            Ok(())
        }
    }
}

fn load_plan(path: &Path) -> Result<PatchPlan> {
    info!("Loading patch plan from {}", path.display());
    let plan = PatchPlan::load_from_file(path)
        .with_context(|| format!("Failed to load patch plan {}", path.display()))?;
    plan.validate()
        .with_context(|| format!("Patch plan {} is invalid", path.display()))?;
    Ok(plan)
}

fn apply(script: &dyn PatchScript, options: &RunOptions) -> Result<()> {
    let output = run_patch(script, options)
        .with_context(|| format!("Script {} failed", script.script_name()))?;

    if output.dry_run {
        for count in &output.counts {
            println!("{:>4}  {}", count.count, count.label);
        }
        if output.changed {
            println!("(dry run) {} would be rewritten", output.path.display());
        } else {
            println!("(dry run) {} would not change", output.path.display());
        }
        if options.strict {
            output.ensure_all_matched()?;
        }
        return Ok(());
    }

    for line in script.success_lines(&output.path) {
        println!("{}", line);
    }
    Ok(())
}
