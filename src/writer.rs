//! Owner-only token persistence

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::IssueError;

/// Owner read/write, nothing for group or other
pub const OWNER_ONLY_MODE: u32 = 0o600;

/// Write `secret` to `path`, readable and writable by the owner only.
///
/// New files are created with [`OWNER_ONLY_MODE`]. An existing file is
/// truncated and has its mode tightened through the open handle before any
/// byte is written.
pub fn write_secret(path: &Path, secret: &str) -> Result<(), IssueError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(OWNER_ONLY_MODE);
    }

    let mut file = options.open(path).map_err(|e| IssueError::file(path, e))?;

    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(Permissions::from_mode(OWNER_ONLY_MODE))
            .map_err(|e| IssueError::file(path, e))?;
    }
    #[cfg(not(unix))]
    tracing::warn!(
        path = %path.display(),
        "Owner-only permissions are not enforced on this platform"
    );

    file.write_all(secret.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| IssueError::file(path, e))?;

    debug!(path = %path.display(), "Wrote secret file");
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    #[test]
    fn test_new_file_is_owner_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("installation.token");

        write_secret(&path, "ghs_newfile").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "group/other bits set: {mode:o}");
        assert_eq!(mode & 0o777, OWNER_ONLY_MODE);
        assert_eq!(fs::read_to_string(&path).unwrap(), "ghs_newfile");
    }

    #[test]
    fn test_existing_world_readable_file_is_tightened_and_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("installation.token");
        fs::write(&path, "an older and much longer token value").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_secret(&path, "ghs_replacement").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, OWNER_ONLY_MODE);
        assert_eq!(fs::read_to_string(&path).unwrap(), "ghs_replacement");
    }

    #[test]
    fn test_missing_directory_is_file_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("installation.token");

        let err = write_secret(&path, "ghs_nowhere").err().unwrap();
        assert!(matches!(err, IssueError::File { .. }));
        assert!(!err.to_string().contains("ghs_nowhere"));
    }
}
