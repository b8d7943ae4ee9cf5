// ABOUTME: Text normalization for user-authored recipe input and remote instruction blobs
// ABOUTME: Pure functions: line splitting, list validation, step-label noise removal

//! # Text Normalization
//!
//! Two pipelines share this module:
//!
//! - user-authored multi-line text → ordered non-empty trimmed lines
//!   ([`parse_lines`], [`ensure_list`], [`number_steps`])
//! - TheMealDB instruction blobs → cleaned, densely numbered steps
//!   ([`clean_instructions`])
//!
//! Everything here is deterministic, side-effect free, and idempotent:
//! re-running any function on its own output is a no-op.

use crate::errors::{AppError, AppResult};
use crate::models::RecipeStep;
use regex::Regex;
use std::sync::LazyLock;

// Classification patterns run against a lowercased, bold-stripped copy of
// the line; display patterns are anchored to line start so legitimate
// numeric content inside a step ("Bake for 15 minutes") survives.
// Stored as Option to handle compilation failures gracefully (should never
// fail for static patterns); a failed pattern means "no match".
static BARE_STEP_LABEL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^step\s+\d+\.?\s*$").ok());

static BARE_NUMBER_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*$").ok());

static LEADING_NUMBER_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").ok());

static LEADING_STEP_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^step\s+\d+\.?\s*").ok());

/// Split raw multi-line text into trimmed, non-empty lines
///
/// Splits on any of `\r\n`, `\r`, `\n`; absent input yields an empty list.
/// Relative order of surviving lines is preserved. Emptiness is not an
/// error here — callers enforce "must be non-empty" via [`ensure_list`].
#[must_use]
pub fn parse_lines(input: Option<&str>) -> Vec<String> {
    // Splitting on the individual characters turns every \r\n into one
    // extra empty fragment, which the empty-line filter drops anyway.
    input.map_or_else(Vec::new, |text| {
        text.split(['\r', '\n'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    })
}

/// Apply the same trim/drop-empty rules to input that is already a list
#[must_use]
pub fn tidy_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Fail with a field-scoped validation error when a normalized list is empty
pub fn ensure_list(items: &[String], field: &str) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::validation(
            field,
            "Please provide at least one entry.",
        ));
    }
    Ok(())
}

/// Assign dense 1-based sequence numbers to step descriptions in order
#[must_use]
pub fn number_steps(descriptions: Vec<String>) -> Vec<RecipeStep> {
    descriptions
        .into_iter()
        .enumerate()
        .map(|(index, description)| RecipeStep {
            number: index as u32 + 1,
            description,
        })
        .collect()
}

/// Clean a remote instructions blob into ordered steps
///
/// TheMealDB instruction text frequently embeds redundant "Step 1" labels
/// and "1." markers, inline with or on separate lines from the actual
/// instruction. Lines that are nothing but such noise are dropped silently;
/// surviving lines lose their leading markers and markdown bold, then get
/// dense sequence numbers in surviving order.
#[must_use]
pub fn clean_instructions(blob: Option<&str>) -> Vec<RecipeStep> {
    let Some(blob) = blob else {
        return Vec::new();
    };

    let descriptions: Vec<String> = blob
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !is_step_noise(line))
        .filter_map(|line| {
            let display = display_text(line);
            (!display.is_empty()).then_some(display)
        })
        .collect();

    number_steps(descriptions)
}

/// True when a line is only a step label or a bare numbered-list marker
fn is_step_noise(line: &str) -> bool {
    // Classification runs on a lowercase copy with markdown bold removed,
    // so "**Step 1**" is recognized as noise too.
    let classified = line.to_lowercase().replace("**", "");
    let classified = classified.trim();

    matches_opt(&BARE_STEP_LABEL, classified) || matches_opt(&BARE_NUMBER_MARKER, classified)
}

/// Produce the display text for a surviving line
fn display_text(line: &str) -> String {
    let stripped = strip_prefix_opt(&LEADING_NUMBER_PREFIX, line);
    let stripped = stripped.replace("**", "");
    let stripped = strip_prefix_opt(&LEADING_STEP_PREFIX, &stripped);
    stripped.trim().to_owned()
}

fn matches_opt(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}

fn strip_prefix_opt(pattern: &LazyLock<Option<Regex>>, text: &str) -> String {
    pattern
        .as_ref()
        .map_or_else(|| text.to_owned(), |re| re.replace(text, "").into_owned())
}
