use clap::Args;
use coursegate_core::{GateDecision, QuizForm};
use std::path::PathBuf;

use super::ConsoleAlerts;

/// Exit code when the form is blocked.
const EXIT_BLOCKED: i32 = 2;

#[derive(Args)]
pub struct ValidateArgs {
    /// Quiz form (JSON); unanswered marks are written back
    #[arg(long)]
    form: PathBuf,
}

pub fn run(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(&args.form)?;
    let mut form: QuizForm = serde_json::from_str(&content)?;

    let decision = form.validate(&ConsoleAlerts);
    std::fs::write(&args.form, serde_json::to_string_pretty(&form)?)?;
    println!("{}", serde_json::to_string_pretty(&decision)?);

    if let GateDecision::Blocked { .. } = decision {
        std::process::exit(EXIT_BLOCKED);
    }
    Ok(())
}
