//! Resolves the CLI file arguments into a concrete file list: directories
//! recurse (filtered to `.jpg`/`.jpeg`), and an empty argument list instead
//! reads one path per line from stdin.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

const JPEG_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| JPEG_EXTENSIONS.iter().any(|want| ext.eq_ignore_ascii_case(want)))
}

fn walk_dir(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|entry| entry.path());
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, out)?;
        } else if is_jpeg(&path) {
            out.push(path);
        }
    }
    Ok(())
}

/// Expand `args` (file and/or directory paths) into a flat file list,
/// recursing into directories. An empty `args` list reads one path per line
/// from stdin instead.
pub fn resolve(args: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    if args.is_empty() {
        let stdin = io::stdin();
        let mut out = Vec::new();
        for line in stdin.lock().lines() {
            let trimmed = line?;
            let trimmed = trimmed.trim();
            if !trimmed.is_empty() {
                out.push(PathBuf::from(trimmed));
            }
        }
        return Ok(out);
    }

    let mut out = Vec::new();
    for path in args {
        if path.is_dir() {
            walk_dir(path, &mut out)?;
        } else {
            out.push(path.clone());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_jpeg_is_case_insensitive() {
        assert!(is_jpeg(Path::new("a.JPG")));
        assert!(is_jpeg(Path::new("a.jpeg")));
        assert!(!is_jpeg(Path::new("a.png")));
    }

    #[test]
    fn test_resolve_recurses_directories_and_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"").unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("c.jpeg"), b"").unwrap();

        let files = resolve(std::slice::from_ref(&dir.path().to_path_buf())).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_resolve_passes_through_explicit_files_unfiltered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whatever.bin");
        std::fs::write(&path, b"").unwrap();

        let files = resolve(&[path.clone()]).unwrap();
        assert_eq!(files, vec![path]);
    }
}
