use clap::Args;
use coursegate_core::navigation::fetch_current_part;
use coursegate_core::{ContentView, Page, PageState};

#[derive(Args)]
pub struct RedirectArgs {
    /// Course name (percent-encoded in the URL)
    course: String,
    /// Part to open
    part_id: String,
    /// Pane to open (quiz|part|0|1)
    view: ContentView,
    /// Part currently on screen
    #[arg(long)]
    show_part: String,
    /// Current page path, used for mount point detection
    #[arg(long, default_value = "/")]
    path: String,
}

pub fn run(args: RedirectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let page = Page::new(PageState {
        location: args.path,
        ..Default::default()
    });

    if let Some(url) = fetch_current_part(&page, &args.course, &args.part_id, args.view, &args.show_part)
    {
        println!("{url}");
    }
    Ok(())
}
