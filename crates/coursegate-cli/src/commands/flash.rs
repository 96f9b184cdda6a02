use clap::Args;
use coursegate_core::{FlashDismisser, Page};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args)]
pub struct FlashArgs {
    /// Page snapshot (JSON); updated in place
    #[arg(long)]
    page: PathBuf,
}

pub async fn run(args: FlashArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let page = Arc::new(Page::load(&args.page)?);

    let Some(handle) = FlashDismisser::from(&config.flash).schedule(page.clone()) else {
        println!("no flash messages");
        return Ok(());
    };

    if handle.join().await {
        page.save(&args.page)?;
        println!("flash messages hidden");
    }
    Ok(())
}
