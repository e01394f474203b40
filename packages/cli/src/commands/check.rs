use crate::commands::replay::print_board;
use crate::script::load_fixture;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Board fixture to validate
    pub fixture: PathBuf,
}

pub fn check(args: CheckArgs) -> Result<()> {
    let fixture = load_fixture(&args.fixture)?;
    print_board(&fixture);
    println!();

    let violations = fixture.check_invariants();
    if violations.is_empty() {
        println!("{} {}", "✓".green(), "No invariant violations".green());
        return Ok(());
    }

    for violation in &violations {
        eprintln!("  {} {}", "✗".red(), violation);
    }
    Err(anyhow!(
        "{} invariant violations in {}",
        violations.len(),
        args.fixture.display()
    ))
}
