use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Writes `content` to `path` through a sibling temp file and a rename.
pub fn atomic_write_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| std::io::Error::other("path has no parent"))?;
    fs::create_dir_all(parent)?;

    let tmp_name = format!(
        ".{}.partial-{}-{}",
        path.file_name()
            .and_then(|v| v.to_str())
            .unwrap_or("document"),
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    let tmp_path = parent.join(tmp_name);

    let written = fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&tmp_path)
        .and_then(|mut file| {
            file.write_all(content)?;
            file.sync_all()
        });
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    fs::rename(&tmp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_missing_parent_and_leaves_no_temp_files() {
        let dir = tempdir().expect("tempdir");
        let target = dir.path().join("out/nested/doc.json");

        atomic_write_file(&target, b"{}").expect("write");
        atomic_write_file(&target, b"{\"a\":1}").expect("overwrite");

        assert_eq!(fs::read_to_string(&target).expect("read"), "{\"a\":1}");
        let leftovers = fs::read_dir(target.parent().expect("parent"))
            .expect("read dir")
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().contains(".partial-"))
            .count();
        assert_eq!(leftovers, 0);
    }
}
