use std::path::Path;

use tokio::fs;

/// Writes a request or response body into the dump directory, if one is
/// configured. Failures are only logged.
pub async fn write_body(dir: Option<&Path>, file_name: &str, body: &str) {
    let Some(dir) = dir else {
        return;
    };
    let path = dir.join(file_name);
    match fs::write(&path, body).await {
        Ok(()) => trace!("dumped body to {}", path.display()),
        Err(err) => warn!("failed to dump body to {}: {err}", path.display()),
    }
}
