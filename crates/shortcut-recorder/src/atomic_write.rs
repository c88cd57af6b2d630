use std::{fs, io::Write, path::Path};

/// Write `contents` to `path` via a sibling temp file and rename.
///
/// Creates the parent directory if needed. A crash mid-write leaves the old
/// file intact.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    let mut temp_file = fs::File::create(temp_path)?;
    temp_file.write_all(contents)?;
    temp_file.sync_all()?;

    fs::rename(temp_path, path)
}
