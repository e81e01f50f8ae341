use crate::record::GeneratedFile;
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

fn marker_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| regex::Regex::new(r"\[FILE_GENERATED:\s*([^\]]+)\]").unwrap())
}

fn absolute_path_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| regex::Regex::new(r"(/[^\s]+)").unwrap())
}

/// Snapshot of every regular file under `workspace_path` before a run
/// starts, used by detection layer 3 to find files that weren't there
/// before.
pub fn snapshot(workspace_path: &Path) -> HashSet<PathBuf> {
    walk(workspace_path).collect()
}

fn walk(workspace_path: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    WalkBuilder::new(workspace_path)
        .hidden(false)
        .git_ignore(false)
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            name != "node_modules" && name != ".git" && name != "media_input"
        })
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.into_path())
}

/// Union of the three detection layers described in spec §4.4.
pub fn detect(
    workspace_path: &Path,
    stdout: &str,
    pre_execution_snapshot: &HashSet<PathBuf>,
    started_at_unix: i64,
) -> Vec<GeneratedFile> {
    let mut found: HashSet<PathBuf> = HashSet::new();

    for capture in marker_pattern().captures_iter(stdout) {
        let path = PathBuf::from(capture[1].trim());
        if is_regular_file(&path) {
            found.insert(path);
        }
    }

    for capture in absolute_path_pattern().captures_iter(stdout) {
        let raw = capture[1].trim_end_matches(|c: char| c.is_ascii_punctuation() && c != '/' && c != '_' && c != '-');
        let path = PathBuf::from(raw);
        if path.starts_with(workspace_path) && is_regular_file(&path) {
            found.insert(path);
        }
    }

    for path in walk(workspace_path) {
        let is_new = !pre_execution_snapshot.contains(&path);
        let is_fresh = mtime_unix(&path).map(|mtime| mtime >= started_at_unix).unwrap_or(false);
        if is_new || is_fresh {
            found.insert(path);
        }
    }

    let mut files: Vec<GeneratedFile> = found
        .into_iter()
        .filter_map(|path| {
            let size = std::fs::metadata(&path).ok()?.len();
            Some(GeneratedFile::from_path(path, size))
        })
        .collect();
    files.sort_by(|a, b| a.full_path.cmp(&b.full_path));
    files
}

fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

fn mtime_unix(path: &Path) -> Option<i64> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let duration = modified.duration_since(SystemTime::UNIX_EPOCH).ok()?;
    Some(duration.as_secs() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn marker_is_detected_when_file_exists() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("report.pdf");
        std::fs::write(&file, b"x").unwrap();
        let stdout = format!("done\n[FILE_GENERATED: {}]\n", file.display());
        let pre = HashSet::new();
        let files = detect(tmp.path(), &stdout, &pre, 0);
        assert!(files.iter().any(|f| f.full_path == file));
    }

    #[test]
    fn marker_for_missing_file_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let stdout = "[FILE_GENERATED: /tmp/does/not/exist/ghost.txt]".to_string();
        let pre = HashSet::new();
        let files = detect(tmp.path(), &stdout, &pre, 0);
        assert!(files.is_empty());
    }

    #[test]
    fn absolute_path_under_workspace_is_detected_with_trailing_punctuation_trimmed() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("out.csv");
        std::fs::write(&file, b"a,b").unwrap();
        let stdout = format!("Wrote file to {}.", file.display());
        let pre = HashSet::new();
        let files = detect(tmp.path(), &stdout, &pre, 0);
        assert!(files.iter().any(|f| f.full_path == file));
    }

    #[test]
    fn walk_detects_new_file_absent_from_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let pre = snapshot(tmp.path());
        let file = tmp.path().join("new.txt");
        std::fs::write(&file, b"hi").unwrap();
        let files = detect(tmp.path(), "", &pre, 0);
        assert!(files.iter().any(|f| f.full_path == file));
    }

    #[test]
    fn walk_excludes_node_modules_and_git() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("node_modules")).unwrap();
        std::fs::write(tmp.path().join("node_modules/pkg.js"), b"x").unwrap();
        std::fs::create_dir_all(tmp.path().join(".git")).unwrap();
        std::fs::write(tmp.path().join(".git/HEAD"), b"x").unwrap();
        let pre = HashSet::new();
        let files = detect(tmp.path(), "", &pre, 0);
        assert!(files.is_empty());
    }

    #[test]
    fn preexisting_unchanged_file_is_not_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("old.txt");
        std::fs::write(&file, b"x").unwrap();
        let pre = snapshot(tmp.path());
        let files = detect(tmp.path(), "", &pre, i64::MAX);
        assert!(files.is_empty());
    }
}
