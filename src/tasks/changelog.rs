// src/tasks/changelog.rs

//! `make_changelog`: open a section for the freshly bumped manifest version.

use std::path::PathBuf;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::{NoExpand, Regex};
use tracing::{info, warn};

use crate::errors::{DevtasksError, Result};
use crate::manifest::read_version;

use super::TaskContext;

pub const UNRELEASED_HEADING: &str = "## [Unreleased]";

static PREVIOUS_RE: OnceLock<Regex> = OnceLock::new();
static UNRELEASED_LINK_RE: OnceLock<Regex> = OnceLock::new();

fn previous_re() -> &'static Regex {
    PREVIOUS_RE.get_or_init(|| {
        Regex::new(r"(?s)## \[Unreleased\].*?## \[(.*?)\]").expect("valid heading regex")
    })
}

fn unreleased_link_re() -> &'static Regex {
    UNRELEASED_LINK_RE
        .get_or_init(|| Regex::new(r"\[unreleased\]:.*?HEAD").expect("valid link regex"))
}

/// Version of the first release heading after `## [Unreleased]`.
pub fn previous_version(changelog: &str) -> Option<&str> {
    previous_re()
        .captures(changelog)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Insert a templated `version` section below `## [Unreleased]` and point
/// the comparison links at it.
///
/// Returns `None` if there is no release heading after `## [Unreleased]`.
/// A missing `[unreleased]: ...HEAD` link is left alone.
pub fn render_changelog(
    changelog: &str,
    version: &str,
    today: NaiveDate,
    repo_link: &str,
) -> Option<String> {
    let old_version = previous_version(changelog)?;

    let section = new_section(version, today);
    let updated = changelog.replace(UNRELEASED_HEADING, &section);

    let links = format!(
        "[unreleased]: {repo_link}/compare/{version}...HEAD\n\
         [{version}]: {repo_link}/compare/{old_version}...{version}"
    );

    if !unreleased_link_re().is_match(&updated) {
        warn!("no `[unreleased]: ...HEAD` link found; links left unchanged");
    }

    Some(
        unreleased_link_re()
            .replace_all(&updated, NoExpand(&links))
            .into_owned(),
    )
}

fn new_section(version: &str, today: NaiveDate) -> String {
    let date = today.format("%Y-%m-%d");
    format!(
        "{UNRELEASED_HEADING}

## [{version}] - {date}

### Added

- Describe what's been added or remove if not applicable

### Changed

- Describe what's been changed or remove if not applicable

### Removed

- Describe what's been removed or remove this section if not applicable

### Fixed

- Describe what's been fixed or remove this section if not applicable"
    )
}

/// Rewrite the changelog in place. Returns the changelog path.
pub fn make_changelog(ctx: &TaskContext<'_>, today: NaiveDate) -> Result<PathBuf> {
    let manifest = ctx.manifest_path();
    let changelog_path = ctx.changelog_path();

    let version = read_version(ctx.fs, &manifest)?;
    let changelog = ctx.fs.read_to_string(&changelog_path)?;

    let updated = render_changelog(
        &changelog,
        &version,
        today,
        &ctx.config.changelog().repo_link,
    )
    .ok_or_else(|| DevtasksError::PreviousVersionNotFound(changelog_path.clone()))?;

    ctx.fs.write(&changelog_path, updated.as_bytes())?;

    info!(%version, path = ?changelog_path, "changelog updated");
    println!(
        "{} was updated, please fill in release information",
        changelog_path.display()
    );
    Ok(changelog_path)
}
