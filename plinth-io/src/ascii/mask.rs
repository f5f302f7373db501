use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Writes one line per entry of `mask`: `1` for `true`, `0` for `false`
pub fn write_mask<W: Write>(mut write: W, mask: &[bool]) -> Result<()> {
    for flag in mask {
        writeln!(write, "{}", if *flag { 1 } else { 0 })?;
    }
    write.flush()?;
    Ok(())
}

/// Like [write_mask], writing to a newly created file at `path`
pub fn write_mask_to_path<P: AsRef<Path>>(path: P, mask: &[bool]) -> Result<()> {
    let file = File::create(path.as_ref())
        .with_context(|| format!("Could not open file {} for writing", path.as_ref().display()))?;
    write_mask(BufWriter::new(file), mask)
}
