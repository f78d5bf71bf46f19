//! Theme preference command.
//!
//! # Usage
//!
//! ```bash
//! qc theme          # print the current theme
//! qc theme dark     # set it
//! qc theme toggle   # flip it
//! ```

use std::io::Write;

use quickcart_storefront::preferences::{self, PreferenceStore};
use quickcart_storefront::{FilePreferenceStore, Theme};

/// What to do with the stored theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Show,
    Set(Theme),
    Toggle,
}

impl std::str::FromStr for ThemeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "show" => Ok(Self::Show),
            "toggle" => Ok(Self::Toggle),
            other => other
                .parse::<Theme>()
                .map(Self::Set)
                .map_err(|_| format!("invalid theme action: {s} (expected light, dark or toggle)")),
        }
    }
}

/// Run a theme action against the preferences file.
///
/// # Errors
///
/// Returns an error if the preferences file cannot be read or written.
pub fn run(
    preferences_path: &std::path::Path,
    action: ThemeAction,
    out: &mut impl Write,
) -> Result<Theme, Box<dyn std::error::Error>> {
    let mut store = FilePreferenceStore::new(preferences_path);
    let theme = apply(&mut store, action)?;
    writeln!(out, "{theme}")?;
    Ok(theme)
}

/// Apply a theme action to any preference store.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub fn apply(
    store: &mut dyn PreferenceStore,
    action: ThemeAction,
) -> Result<Theme, preferences::PreferenceError> {
    let current = preferences::load_theme(store)?;
    let next = match action {
        ThemeAction::Show => return Ok(current),
        ThemeAction::Set(theme) => theme,
        ThemeAction::Toggle => current.toggle(),
    };
    preferences::save_theme(store, next)?;
    tracing::info!(from = %current, to = %next, "Theme updated");
    Ok(next)
}
