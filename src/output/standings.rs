use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;

use super::formatter::RankedEntry;

/// Write the standings to a tab-separated file, atomically.
///
/// The file carries a header row and full-precision points (the display
/// table rounds; a standings file fed to a spreadsheet should not).
/// Incomplete extractions are marked in their own column instead of
/// mangling the points value.
pub fn write_standings(path: &Path, entries: &[RankedEntry]) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open standings file at {}", path.display()))?;

    writeln!(file, "name\tusername\tpoints\textraction")
        .context("Failed to write standings header")?;

    for entry in entries {
        let status = if entry.incomplete { "partial" } else { "complete" };
        writeln!(
            file,
            "{}\t{}\t{:.3}\t{}",
            entry.name, entry.username, entry.points, status
        )
        .context("Failed to write standings row")?;
    }

    file.commit()
        .with_context(|| format!("Failed to save standings to {}", path.display()))?;

    Ok(())
}
