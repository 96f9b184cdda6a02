//! Course name resolution.
//!
//! An ordered chain of sources, each of which may or may not know the
//! course name. The first non-empty answer wins.

use tracing::debug;

/// Path segments whose next segment is the course name.
const COURSE_ROUTES: &[&str] = &[
    "fetch_current_part",
    "counselor_enrolled_course",
    "course-overview",
];

pub trait CourseNameSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    fn resolve(&self) -> Option<String>;
}

/// A course name configured up front.
#[derive(Debug, Clone, Default)]
pub struct ExplicitCourseName(pub Option<String>);

impl CourseNameSource for ExplicitCourseName {
    fn name(&self) -> &str {
        "explicit"
    }

    fn resolve(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Extracts the course name from a course route in the current path.
#[derive(Debug, Clone)]
pub struct PathCourseName {
    path: String,
}

impl PathCourseName {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl CourseNameSource for PathCourseName {
    fn name(&self) -> &str {
        "path"
    }

    fn resolve(&self) -> Option<String> {
        let mut segments = self.path.split('/').filter(|s| !s.is_empty());
        while let Some(segment) = segments.next() {
            if COURSE_ROUTES.contains(&segment) {
                let raw = segments.next()?;
                return urlencoding::decode(raw).ok().map(|s| s.into_owned());
            }
        }
        None
    }
}

#[derive(Default)]
pub struct CourseNameResolver {
    sources: Vec<Box<dyn CourseNameSource>>,
}

impl CourseNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit value first, then the current path.
    pub fn standard(explicit: Option<String>, current_path: &str) -> Self {
        Self::new()
            .with_source(ExplicitCourseName(explicit))
            .with_source(PathCourseName::new(current_path))
    }

    pub fn with_source(mut self, source: impl CourseNameSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn resolve(&self) -> Option<String> {
        self.sources.iter().find_map(|source| {
            let found = source.resolve().filter(|name| !name.trim().is_empty());
            if let Some(name) = &found {
                debug!(source = source.name(), course = %name, "course name resolved");
            }
            found
        })
    }
}
