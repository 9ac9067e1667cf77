//! Write-temp-then-rename file replacement.

use std::io::Write as _;
use std::path::Path;

use crate::Result;

/// Replace the file at `path` with `bytes` atomically: write to a temp file
/// in the same directory, then rename over the target. The temp file must
/// live in the same directory for the rename to stay on one filesystem.
pub(crate) fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
  let dir = path.parent().unwrap_or_else(|| Path::new("."));
  let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
  tmp.write_all(bytes)?;
  tmp.flush()?;
  tmp.persist(path).map_err(|e| e.error)?;
  Ok(())
}
