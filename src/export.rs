//! Final document writer.
//!
//! Pure serialization: the session hands over the sorted packet slice and
//! this writes it as an indented JSON array.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::packet::Packet;

/// Write `packets` as pretty-printed JSON to `path`, creating parent
/// directories as needed.
pub fn write_json(path: &Path, packets: &[Packet]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).ok();
        }
    }
    let file = File::create(path).with_context(|| format!("create {path:?}"))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, packets).context("serialize packets")?;
    w.flush()?;
    Ok(())
}
