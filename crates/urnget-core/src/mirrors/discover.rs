//! Discovery of standard mirror list files.
//!
//! Pure over its parameters (no ambient cwd/env reads) so tests can point
//! it at scratch directories.

use std::path::{Path, PathBuf};

/// Well-known mirror list names checked in each searched directory.
pub const LIST_FILENAMES: [&str; 2] = [".ccouch/remote-repos.lst", ".ccouch-remote-repos.lst"];

/// Collect existing mirror list files: every ancestor of `start_dir`
/// (itself included, root last), then `home_dir`. Duplicates collapse.
pub fn discover_list_paths(start_dir: &Path, home_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for dir in start_dir.ancestors() {
        push_lists_in(dir, &mut found);
    }
    if let Some(home) = home_dir {
        push_lists_in(home, &mut found);
    }
    found
}

fn push_lists_in(dir: &Path, out: &mut Vec<PathBuf>) {
    for name in LIST_FILENAMES {
        let path = dir.join(name);
        if path.is_file() && !out.contains(&path) {
            out.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_lists_walking_up_then_home() {
        let root = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();

        let project = root.path().join("work/project");
        fs::create_dir_all(&project).unwrap();
        fs::create_dir_all(project.join(".ccouch")).unwrap();
        fs::write(project.join(".ccouch/remote-repos.lst"), "a.example\n").unwrap();
        fs::write(
            root.path().join("work/.ccouch-remote-repos.lst"),
            "b.example\n",
        )
        .unwrap();
        fs::write(home.path().join(".ccouch-remote-repos.lst"), "c.example\n").unwrap();

        let paths = discover_list_paths(&project, Some(home.path()));
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0], project.join(".ccouch/remote-repos.lst"));
        assert_eq!(paths[1], root.path().join("work/.ccouch-remote-repos.lst"));
        assert_eq!(paths[2], home.path().join(".ccouch-remote-repos.lst"));
    }

    #[test]
    fn home_inside_search_path_not_duplicated() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join(".ccouch-remote-repos.lst"), "a.example\n").unwrap();
        let paths = discover_list_paths(root.path(), Some(root.path()));
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn missing_lists_yield_nothing() {
        let root = tempfile::tempdir().unwrap();
        assert!(discover_list_paths(root.path(), None).is_empty());
    }
}
