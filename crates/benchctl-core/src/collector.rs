//! Manifest collection
//!
//! Expands a list of file and directory arguments into the ordered list of
//! manifest files to process:
//! - Directories are walked recursively, sorted by file name, and only
//!   `.yaml`/`.yml` files are kept
//! - Plain file arguments are kept as given, whatever their extension
//! - Argument order is preserved

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{CoreError, Result};

/// Extensions picked up when walking directories
const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Check whether a path has a manifest extension
pub fn is_manifest_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext.as_str()))
}

/// Expand paths into a flat, deterministically ordered list of manifest files
pub fn collect<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();

        if path.is_dir() {
            files.extend(walk_dir(path)?);
        } else if path.exists() {
            files.push(path.to_path_buf());
        } else {
            return Err(CoreError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(files)
}

fn walk_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| CoreError::Walk {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        if entry.file_type().is_file() && is_manifest_path(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "kind: ConfigMap\n").unwrap();
    }

    #[test]
    fn test_is_manifest_path() {
        assert!(is_manifest_path(Path::new("a.yaml")));
        assert!(is_manifest_path(Path::new("a.yml")));
        assert!(is_manifest_path(Path::new("dir/A.YAML")));
        assert!(!is_manifest_path(Path::new("a.json")));
        assert!(!is_manifest_path(Path::new("README")));
    }

    #[test]
    fn test_collect_walks_directories_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("2_deployment.yaml"));
        touch(&root.join("1_namespace.yml"));
        touch(&root.join("nested/3_service.yaml"));
        touch(&root.join("notes.txt"));
        touch(&root.join("nested/values.json"));

        let files = collect(&[root]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            names,
            vec!["1_namespace.yml", "2_deployment.yaml", "nested/3_service.yaml"]
        );
    }

    #[test]
    fn test_collect_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.yaml", "a.yaml", "b/z.yaml", "b/a.yaml"] {
            touch(&dir.path().join(name));
        }

        let first = collect(&[dir.path()]).unwrap();
        let second = collect(&[dir.path()]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_collect_keeps_plain_files_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("manifest.txt");
        let yaml = dir.path().join("a.yaml");
        touch(&txt);
        touch(&yaml);

        let files = collect(&[&txt, &yaml]).unwrap();
        assert_eq!(files, vec![txt, yaml]);
    }

    #[test]
    fn test_collect_preserves_argument_order() {
        let dir = tempfile::tempdir().unwrap();
        let b = dir.path().join("b.yaml");
        let a = dir.path().join("a.yaml");
        touch(&b);
        touch(&a);

        let files = collect(&[&b, &a]).unwrap();
        assert_eq!(files, vec![b, a]);
    }

    #[test]
    fn test_collect_missing_path() {
        let err = collect(&[Path::new("/no/such/manifests")]).unwrap_err();
        assert!(matches!(err, CoreError::PathNotFound { .. }));
    }
}
