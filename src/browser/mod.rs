use anyhow::{Context, Result};

/// Open a student's Kaggle profile in the user's default browser.
///
/// # Errors
/// Returns error if no browser is available to open the URL.
pub fn open_profile(base_url: &str, username: &str) -> Result<String> {
    let url = format!("{}/{}", base_url, username);
    webbrowser::open(&url)
        .with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(url)
}
