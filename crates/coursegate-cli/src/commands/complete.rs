use clap::Args;
use coursegate_core::{
    csrf_token, CompletionClient, CompletionOutcome, ContentKind, Page, PartCompletionNotifier,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args)]
pub struct CompleteArgs {
    /// Part to mark complete
    part_id: String,
    /// Page snapshot (JSON); updated in place
    #[arg(long)]
    page: PathBuf,
    /// Content kind (part|introduction). Derived from the page when omitted.
    #[arg(long)]
    kind: Option<ContentKind>,
    /// Cookie header to read the csrftoken from
    #[arg(long)]
    cookie: Option<String>,
}

pub async fn run(
    args: CompleteArgs,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let page = Arc::new(Page::load(&args.page)?);

    let kind = match args.kind {
        Some(kind) => kind,
        None => {
            let state = page.snapshot();
            state.require_part(&args.part_id)?;
            state.content_kind(&args.part_id)
        }
    };

    let client = CompletionClient::new(&config.server)?;
    let notifier = PartCompletionNotifier::for_page(client, page.clone())
        .with_course_name(config.server.course_name.clone())
        .with_csrf_token(args.cookie.as_deref().and_then(csrf_token));

    let outcome = notifier.complete(&args.part_id, kind).await;
    page.save(&args.page)?;

    match outcome {
        CompletionOutcome::QuizRevealed => println!("quiz revealed for part {}", args.part_id),
        CompletionOutcome::ContentHidden => println!("part {} complete", args.part_id),
        CompletionOutcome::Navigated(url) => println!("navigate: {url}"),
        CompletionOutcome::Reloaded => println!("reload"),
        CompletionOutcome::Failed(message) => return Err(message.into()),
    }
    Ok(())
}
