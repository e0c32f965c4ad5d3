/// Batch conversion: every archive record → one set of text level files.
///
/// A record that fails to decode is reported and skipped; the rest are
/// still written. Write failures abort the batch.

use std::path::Path;

use tracing::{error, info};

use super::decode::decode_archive_level;
use super::record::{FormatError, RECORD_COUNT};
use super::text::{write_level, LevelError};

#[derive(Debug, Default)]
pub struct Generated {
    pub written: Vec<u8>,
    pub failed: Vec<FormatError>,
    pub warnings: usize,
}

pub fn generate_game(archive: &[u8], dir: &Path) -> Result<Generated, LevelError> {
    let mut out = Generated::default();
    for level in 0..RECORD_COUNT {
        match decode_archive_level(archive, level) {
            Ok(decoded) => {
                write_level(dir, level, &decoded.data)?;
                out.warnings += decoded.warnings.len();
                out.written.push(level);
            }
            Err(e) => {
                error!("skipping record {level}: {e}");
                out.failed.push(e);
            }
        }
    }
    info!(
        written = out.written.len(),
        failed = out.failed.len(),
        warnings = out.warnings,
        dir = %dir.display(),
        "level files generated"
    );
    Ok(out)
}
