use clap::Args;
use coursegate_core::countdown::{CountdownEngine, CountdownSettings, UnlockableElement};
use coursegate_core::{CountdownView, Page, SystemClock};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args)]
pub struct CountdownArgs {
    /// Page snapshot (JSON); updated in place when the countdowns finish
    #[arg(long)]
    page: PathBuf,
}

/// Writes through to the page and echoes each update to stdout.
struct ConsoleCountdownView {
    page: Arc<Page>,
}

impl CountdownView for ConsoleCountdownView {
    fn render_countdown(&self, part_id: &str, text: &str) {
        self.page.render_countdown(part_id, text);
        println!("part {part_id}: {text}");
    }

    fn unlock(&self, element_id: &str, label: &str) {
        self.page.unlock(element_id, label);
        println!("{element_id}: {label}");
    }
}

pub async fn run(
    args: CountdownArgs,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let page = Arc::new(Page::load(&args.page)?);

    let elements = UnlockableElement::discover(&page.snapshot());
    if elements.is_empty() {
        eprintln!("no locked retry buttons on page");
        return Ok(());
    }

    let view = Arc::new(ConsoleCountdownView { page: page.clone() });
    let engine = CountdownEngine::new(
        view,
        Arc::new(SystemClock),
        CountdownSettings::try_from(&config.countdown)?,
    );
    let handle = engine.start(elements);

    let stop = handle.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.cancel();
        }
    });

    let results = handle.join().await;
    page.save(&args.page)?;

    let summary: serde_json::Map<String, serde_json::Value> = results
        .into_iter()
        .map(|(element_id, state)| (element_id, serde_json::to_value(state).unwrap_or_default()))
        .collect();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
