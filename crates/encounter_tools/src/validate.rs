//! Settings validation.

use std::path::Path;

use encounter_core::config::Settings;

use crate::Result;

/// Load settings strictly and list every problem found.
///
/// Unlike startup, a file that cannot be read or parsed is an error here.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn validate_settings(path: &Path) -> Result<Vec<String>> {
    let settings = Settings::load(path)?;
    let problems = settings.validate();
    for problem in &problems {
        tracing::warn!(path = %path.display(), "{problem}");
    }
    Ok(problems)
}
