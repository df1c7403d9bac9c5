//! Secondary, externally-owned visualization surface.
//!
//! The current selection is serialized as query parameters (service wire
//! names) onto the configured URL and handed to the system browser.
//! Fire-and-forget: whatever happens after the URL is opened belongs to the
//! external surface.
use anyhow::{Context, Result};
use url::Url;

use crate::form::FormSelection;

/// Build the external view URL for a selection.
pub fn external_view_url(base: &str, form: &FormSelection) -> Result<Url> {
    Url::parse_with_params(base, form.wire_pairs())
        .with_context(|| format!("invalid external view URL: {base}"))
}

/// Open a URL in the system default browser.
pub fn open_in_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}
