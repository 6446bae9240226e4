use deplinks::core::scanner::DirectoryScanner;
use std::fs;
use std::path::{Path, PathBuf};

fn touch<P: AsRef<Path>>(path: P) {
    let path = path.as_ref();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "package x\n").unwrap();
}

fn scan_sorted(root: &Path) -> Vec<PathBuf> {
    let mut dirs = DirectoryScanner::new().scan(root).unwrap();
    dirs.sort();
    dirs
}

#[test]
fn scanner_finds_directories_with_go_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();

    touch(root.join("cmd/api/main.go"));
    touch(root.join("pkg/server/server.go"));
    touch(root.join("pkg/server/server_test.go"));
    touch(root.join("docs/readme.txt"));

    let dirs = scan_sorted(root);
    assert_eq!(dirs, vec![root.join("cmd/api"), root.join("pkg/server")]);
}

#[test]
fn scanner_prunes_git_and_vendor_subtrees() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();

    touch(root.join("pkg/ok/ok.go"));
    touch(root.join(".git/objects/blob.go"));
    touch(root.join("vendor/github.com/dep/dep.go"));
    touch(root.join("pkg/ok/vendor/nested/nested.go"));

    let dirs = scan_sorted(root);
    assert_eq!(dirs, vec![root.join("pkg/ok")]);
}

#[test]
fn scanner_compares_skip_names_by_segment_not_substring() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();

    touch(root.join("vendors/v.go"));
    touch(root.join("not.git/g.go"));

    let dirs = scan_sorted(root);
    assert_eq!(dirs, vec![root.join("not.git"), root.join("vendors")]);
}

#[test]
fn scanner_ignores_non_go_extensions() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();

    touch(root.join("a/notes.gop"));
    touch(root.join("a/main.go.bak"));
    touch(root.join("b/lib.go"));

    let dirs = scan_sorted(root);
    assert_eq!(dirs, vec![root.join("b")]);
}

#[test]
fn scanner_fails_on_unreadable_root() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");

    let result = DirectoryScanner::new().scan(&missing);
    assert!(result.is_err());
}
