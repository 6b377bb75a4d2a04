use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::get_config_path;

const STARTER_CONFIG: &str = r#"# kaggle-board configuration
#
# Roster order is preserved in the output; ties on the board keep it.
roster:
  - name: Alice Liddell
    username: alice
  - name: Bob Bobberson
    username: bob

# Competitions that count toward the board. Titles must match the profile
# pages byte-for-byte - watch for typographic apostrophes (’) and accents,
# which are NOT interchangeable with their ASCII lookalikes.
competitions:
  - "Porto Seguro’s Safe Driver Prediction"
  - "Statoil/C-CORE Iceberg Classifier Challenge"

# Placements from competitions that ended before this instant are ignored.
# Remove the line to count everything, like the classic behavior.
# since: "2017-09-01T00:00:00Z"

# Scoring constants. The defaults reproduce the published progression
# formula; each team member receives full points (no division by team
# size). Uncomment to recalibrate.
# scoring:
#   vote_weight: 80
#   placement:
#     scale: 100000
#     rank_exponent: -0.75
#     log_base: 10

# Fetch behavior. Keep workers at 1 unless you know the remote tolerates
# parallel sessions.
# fetch:
#   timeout: 10s
#   attempts: 3
#   workers: 1
"#;

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    print!("{} [{}]: ", message, hint);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    let input = input.trim().to_lowercase();

    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Write a commented starter config, asking before overwriting an
/// existing one. Returns the path written, or None if the user declined.
pub fn write_starter_config(path: Option<PathBuf>) -> Result<Option<PathBuf>> {
    let config_path = path.unwrap_or_else(get_config_path);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!("{} already exists. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            return Ok(None);
        }
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory at {}", parent.display())
        })?;
    }

    std::fs::write(&config_path, STARTER_CONFIG)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(Some(config_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_starter_config_parses() {
        let config: Config = serde_saphyr::from_str(STARTER_CONFIG).unwrap();
        assert_eq!(config.roster.len(), 2);
        assert_eq!(config.competitions.len(), 2);
        // Commented-out sections stay absent
        assert!(config.scoring.is_none());
        assert!(config.fetch.is_none());
        assert!(config.since.is_none());
    }

    #[test]
    fn test_starter_config_writes_to_fresh_path() {
        let path = std::env::temp_dir().join("kaggle_board_test_config.yaml");
        let _ = std::fs::remove_file(&path);

        let written = write_starter_config(Some(path.clone())).unwrap();
        assert_eq!(written, Some(path.clone()));
        assert!(path.exists());

        let _ = std::fs::remove_file(&path);
    }
}
