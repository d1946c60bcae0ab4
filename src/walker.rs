use std::path::{Component, Path, PathBuf};

use anyhow::Result;
use ignore::WalkBuilder;

use crate::config::Config;

/// Collect the source files under `root` whose headers should be credited.
///
/// Honors `.gitignore`, keeps only the configured extensions and skips paths
/// starting with one of the configured `exclude` prefixes. The result is sorted
/// so runs are reproducible.
pub fn collect_source_files(root: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkBuilder::new(root).hidden(true).git_ignore(true).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let wanted_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| config.extensions.iter().any(|e| e == ext));
        if !wanted_ext {
            continue;
        }

        let Some(rel) = relative_path(root, path) else {
            continue;
        };
        if config.exclude.iter().any(|prefix| rel.starts_with(prefix.as_str())) {
            tracing::trace!(path = %rel, "excluded");
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// `path` relative to `root`, `/`-separated, as used by the bucket table.
///
/// `.` and `..` components are resolved first, so `libavcodec/../libavcodec/a.c`
/// gets the same key as `libavcodec/a.c`. `None` when the path leaves `root`.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let path = normalize_lexically(&root.join(path));
    let rel = path.strip_prefix(normalize_lexically(root)).ok()?;
    Some(
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
    )
}

/// Resolve `.` and `..` without touching the filesystem. `..` at the top of
/// an absolute path stays there.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_relative_path() {
        let root = Path::new("/src/ffmpeg");
        assert_eq!(
            relative_path(root, Path::new("/src/ffmpeg/libavcodec/jrevdct.c")).as_deref(),
            Some("libavcodec/jrevdct.c")
        );
        assert_eq!(relative_path(root, Path::new("libavutil/a.c")).as_deref(), Some("libavutil/a.c"));
    }

    #[test]
    fn test_relative_path_resolves_dot_components() {
        let root = Path::new("/src/ffmpeg");
        assert_eq!(
            relative_path(root, Path::new("libavcodec/../libavcodec/jrevdct.c")).as_deref(),
            Some("libavcodec/jrevdct.c")
        );
        assert_eq!(
            relative_path(root, Path::new("./libavcodec/./jrevdct.c")).as_deref(),
            Some("libavcodec/jrevdct.c")
        );
        assert_eq!(
            relative_path(Path::new("/src/./ffmpeg/"), Path::new("/src/ffmpeg/x86/../a.c")).as_deref(),
            Some("a.c")
        );
    }

    #[test]
    fn test_relative_path_outside_root() {
        let root = Path::new("/src/ffmpeg");
        assert_eq!(relative_path(root, Path::new("/usr/include/stdio.h")), None);
        assert_eq!(relative_path(root, Path::new("../other/a.c")), None);
        assert_eq!(relative_path(root, Path::new("/src/ffmpeg-old/a.c")), None);
    }

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(normalize_lexically(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_lexically(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_lexically(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_collect_filters_extensions_and_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("libavcodec/x86")).unwrap();
        fs::create_dir_all(root.join("tests")).unwrap();
        fs::write(root.join("libavcodec/a.c"), "").unwrap();
        fs::write(root.join("libavcodec/a.h"), "").unwrap();
        fs::write(root.join("libavcodec/x86/dsp.asm"), "").unwrap();
        fs::write(root.join("libavcodec/Makefile"), "").unwrap();
        fs::write(root.join("libavcodec/notes.txt"), "").unwrap();
        fs::write(root.join("tests/checkasm.c"), "").unwrap();

        let mut config = Config::default();
        config.exclude = vec!["tests/".to_string()];

        let files: Vec<String> = collect_source_files(root, &config)
            .unwrap()
            .iter()
            .filter_map(|p| relative_path(root, p))
            .collect();
        assert_eq!(
            files,
            vec!["libavcodec/a.c", "libavcodec/a.h", "libavcodec/x86/dsp.asm"]
        );
    }
}
