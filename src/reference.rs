//! Reference name resolution.
//!
//! A reference name is lower-cased, spaces become underscores, it is joined
//! with the reference root and `.png` is appended when it has no extension
//! and does not name a directory. A directory stands for an ordered list of
//! alternative needles, tried in ascending file-name order.

use crate::util::{ScreenMatchError, ScreenMatchResult};
use std::path::{Component, Path, PathBuf};

/// Resolves reference names against a root directory.
#[derive(Clone, Copy, Debug)]
pub struct ReferenceResolver<'a> {
    root: Option<&'a Path>,
}

/// Ordered, immutable candidate needles for one reference name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateSet {
    spec: String,
    paths: Vec<PathBuf>,
    from_directory: bool,
}

impl CandidateSet {
    /// The reference name the set was resolved from.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Candidate paths in try order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// True when the name resolved to a directory of alternatives.
    pub fn is_directory(&self) -> bool {
        self.from_directory
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(root: Option<&'a Path>) -> Self {
        Self { root }
    }

    fn root(&self) -> ScreenMatchResult<&'a Path> {
        let root = self
            .root
            .ok_or_else(|| ScreenMatchError::InvalidConfiguration {
                reason: "reference root is not set".to_string(),
            })?;
        if !root.is_dir() {
            return Err(ScreenMatchError::InvalidConfiguration {
                reason: format!("reference root is not a directory: {}", root.display()),
            });
        }
        Ok(root)
    }

    /// Maps a reference name to an absolute, existing file or directory.
    ///
    /// Absolute names are taken as already normalized and are not
    /// lower-cased, so normalizing a normalized path is a no-op.
    pub fn normalize(&self, name: &str) -> ScreenMatchResult<PathBuf> {
        let root = self.root()?;
        if name.trim().is_empty() {
            return Err(ScreenMatchError::InvalidImageSpec {
                spec: name.to_string(),
                reason: "empty image name",
            });
        }

        let joined = if Path::new(name).is_absolute() {
            PathBuf::from(name)
        } else {
            root.join(name.to_lowercase().replace(' ', "_"))
        };
        let mut path = absolute(&joined);
        if path.extension().is_none() && !path.is_dir() {
            path.as_mut_os_string().push(".png");
        }

        if !path.is_file() && !path.is_dir() {
            return Err(ScreenMatchError::InvalidImageSpec {
                spec: name.to_string(),
                reason: "image path not found",
            });
        }
        Ok(path)
    }

    /// Resolves a reference name into its ordered candidates.
    ///
    /// A file yields a single candidate. A directory yields its entries in
    /// ascending lexicographic order and must contain only plain files.
    pub fn list_candidates(&self, spec: &str) -> ScreenMatchResult<CandidateSet> {
        let path = self.normalize(spec)?;
        if path.is_file() {
            return Ok(CandidateSet {
                spec: spec.to_string(),
                paths: vec![path],
                from_directory: false,
            });
        }

        let io_err = |err: std::io::Error| ScreenMatchError::ImageIo {
            path: path.clone(),
            reason: err.to_string(),
        };
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&path).map_err(io_err)? {
            let entry_path = entry.map_err(io_err)?.path();
            if !entry_path.is_file() {
                return Err(ScreenMatchError::InvalidImageSpec {
                    spec: spec.to_string(),
                    reason: "reference directory may only contain image files",
                });
            }
            paths.push(entry_path);
        }
        if paths.is_empty() {
            return Err(ScreenMatchError::InvalidImageSpec {
                spec: spec.to_string(),
                reason: "reference directory is empty",
            });
        }
        paths.sort();

        Ok(CandidateSet {
            spec: spec.to_string(),
            paths,
            from_directory: true,
        })
    }
}

/// Makes `path` absolute and removes `.` and `..` components lexically.
fn absolute(path: &Path) -> PathBuf {
    let base = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut out = PathBuf::new();
    for component in base.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{absolute, ReferenceResolver};
    use crate::ScreenMatchError;
    use std::fs;
    use std::path::Path;

    #[test]
    fn absolute_collapses_dot_segments() {
        let out = absolute(Path::new("/a/b/./c/../d.png"));
        assert_eq!(out, Path::new("/a/b/d.png"));
    }

    #[test]
    fn unset_root_is_invalid_configuration() {
        let resolver = ReferenceResolver::new(None);
        assert!(matches!(
            resolver.normalize("ok"),
            Err(ScreenMatchError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn missing_root_is_invalid_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let resolver = ReferenceResolver::new(Some(&missing));
        assert!(matches!(
            resolver.list_candidates("ok"),
            Err(ScreenMatchError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn extension_is_kept_when_present() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("shot.jpg"), b"x").unwrap();
        let resolver = ReferenceResolver::new(Some(dir.path()));
        let path = resolver.normalize("Shot.jpg").unwrap();
        assert_eq!(path.file_name().unwrap(), "shot.jpg");
    }

    #[test]
    fn empty_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        let resolver = ReferenceResolver::new(Some(dir.path()));
        assert!(matches!(
            resolver.list_candidates("empty"),
            Err(ScreenMatchError::InvalidImageSpec { .. })
        ));
    }
}
