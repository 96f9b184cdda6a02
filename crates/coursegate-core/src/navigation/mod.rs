//! Deep links between course parts.
//!
//! Builds `fetch_current_part` URLs (honouring the deployment mount point)
//! and performs full-page navigations through a [`Navigator`].

mod course_name;

pub use course_name::{CourseNameResolver, CourseNameSource, ExplicitCourseName, PathCourseName};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::page::Navigator;

/// Path prefix of the sub-path deployment.
pub const MOUNT_POINT: &str = "/counselor_project";

/// Which pane of a part the server should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentView {
    Quiz,
    Part,
}

impl ContentView {
    /// Value of the `<part_or_quiz>` path segment.
    pub fn as_segment(self) -> u8 {
        match self {
            ContentView::Quiz => 0,
            ContentView::Part => 1,
        }
    }
}

impl fmt::Display for ContentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_segment())
    }
}

impl FromStr for ContentView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "quiz" => Ok(ContentView::Quiz),
            "1" | "part" => Ok(ContentView::Part),
            other => Err(format!("unknown content view '{other}' (expected quiz|part|0|1)")),
        }
    }
}

/// `/counselor_project` when the current page lives under the mount point.
pub fn mount_prefix(current_path: &str) -> &'static str {
    if current_path.contains("/counselor_project/") {
        MOUNT_POINT
    } else {
        ""
    }
}

pub fn fetch_current_part_url(
    current_path: &str,
    course_name: &str,
    part_id: &str,
    view: ContentView,
) -> String {
    format!(
        "{}/fetch_current_part/{}/{}/{}/",
        mount_prefix(current_path),
        urlencoding::encode(course_name),
        part_id,
        view
    )
}

/// Navigate to `part_id` unless it is already the part on screen.
///
/// Returns the URL navigated to, or `None` when nothing happened.
pub fn fetch_current_part(
    navigator: &dyn Navigator,
    course_name: &str,
    part_id: &str,
    view: ContentView,
    show_part_id: &str,
) -> Option<String> {
    if part_id == show_part_id {
        debug!(part = %part_id, "part already displayed, not navigating");
        return None;
    }

    let url = fetch_current_part_url(&navigator.current_path(), course_name, part_id, view);
    info!(%url, "redirecting");
    navigator.navigate(&url);
    Some(url)
}
