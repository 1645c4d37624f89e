use std::io;
use std::path::Path;

use chrono::{DateTime, Local};
use tokio::fs;

/// Title prefix of every saved report.
pub const REPORT_TITLE: &str = "# Resposta do Gemini em";

/// Renders a report: a title with the timestamp, a blank line, then
/// `text` unchanged.
pub fn render_report(text: &str, timestamp: &DateTime<Local>) -> String {
    format!(
        "{REPORT_TITLE} {}\n\n{text}",
        timestamp.format("%a %b %d %H:%M:%S %:z %Y")
    )
}

/// Renders a report stamped with the current time and writes it to
/// `path`, replacing any existing file.
pub async fn save_report(path: &Path, text: &str) -> io::Result<()> {
    let content = render_report(text, &Local::now());
    fs::write(path, content).await?;
    debug!("saved report to {}", path.display());
    Ok(())
}
