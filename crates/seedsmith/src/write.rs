//! Whole-file replacement.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Replace the contents of `path` with `bytes`.
///
/// The bytes go to a sibling temporary file which is synced and then renamed
/// over `path`, so readers see either the old or the new file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path has no file name: {}", path.display()),
        )
    })?;

    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(format!(".tmp.{}", std::process::id()));
    let tmp_path = path.with_file_name(tmp_name);

    let written = fs::File::create(&tmp_path).and_then(|mut f| {
        f.write_all(bytes)?;
        f.sync_all()
    });
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    match fs::rename(&tmp_path, path) {
        Ok(()) => Ok(()),
        Err(err) => {
            // Windows refuses to replace an existing file with `rename`.
            if cfg!(windows) && path.exists() {
                fs::remove_file(path)?;
                fs::rename(&tmp_path, path)
            } else {
                let _ = fs::remove_file(&tmp_path);
                Err(err)
            }
        }
    }
}
