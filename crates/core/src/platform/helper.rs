use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use chrono::Local;
use image::RgbaImage;

use crate::error::CaptureError;
use crate::logger;

/// Timestamped scratch file for helper-based captures.
fn scratch_path() -> PathBuf {
    let stamp = Local::now().format("%Y-%m%d_%H-%M-%S-%f");
    std::env::temp_dir().join(format!(".mouseinfo-screenshot{}.png", stamp))
}

/// Run an external screenshot program that writes a PNG to the path given as
/// its last argument, then load it. The file is removed afterwards unless
/// `keep` names it.
pub(super) fn capture_with_helper(
    program: &'static str,
    args: &[&str],
    keep: Option<&Path>,
) -> Result<RgbaImage, CaptureError> {
    let path = keep.map(Path::to_path_buf).unwrap_or_else(scratch_path);

    let status = Command::new(program)
        .args(args)
        .arg(&path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| CaptureError::Helper { program, detail: e.to_string() })?;

    let loaded = if status.success() {
        load_sniffed(&path)
    } else {
        Err(CaptureError::Helper { program, detail: format!("exited with {}", status) })
    };

    if keep.is_none() && path.exists() {
        if let Err(e) = std::fs::remove_file(&path) {
            logger::warn(&format!("could not remove {}: {}", path.display(), e));
        }
    }
    loaded
}

/// Decode by content; a permanent screenshot's name need not carry an extension.
fn load_sniffed(path: &Path) -> Result<RgbaImage, CaptureError> {
    let img = image::io::Reader::open(path)?.with_guessed_format()?.decode()?;
    Ok(img.to_rgba8())
}
