//! Scene paths
//!
//! A [`ScenePath`] names one prim in the scene graph, e.g. `/World/Geo/torch_1`.
//! Paths are absolute, slash-delimited and immutable. The pseudo-root is `/`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Errors produced while parsing path text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Path text was empty
    #[error("Path is empty")]
    Empty,

    /// Path did not start with `/`
    #[error("Path must be absolute: {0}")]
    NotAbsolute(String),

    /// One element of the path is not a valid prim name
    #[error("Invalid prim name '{name}' in path {path}")]
    InvalidName {
        /// Full path text
        path: String,
        /// Offending element
        name: String,
    },
}

/// Immutable absolute path of a prim
///
/// Cloning is cheap (shared string). Ordering is lexicographic on the path
/// text, which sorts parents before their children.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScenePath(Arc<str>);

impl ScenePath {
    /// The pseudo-root path `/`
    pub fn root() -> Self {
        Self(Arc::from("/"))
    }

    /// Parse and validate path text
    pub fn parse(text: &str) -> Result<Self, PathError> {
        if text.is_empty() {
            return Err(PathError::Empty);
        }
        if !text.starts_with('/') {
            return Err(PathError::NotAbsolute(text.to_string()));
        }
        if text == "/" {
            return Ok(Self::root());
        }

        for name in text[1..].split('/') {
            if !is_valid_name(name) {
                return Err(PathError::InvalidName {
                    path: text.to_string(),
                    name: name.to_string(),
                });
            }
        }

        Ok(Self(Arc::from(text)))
    }

    /// Path text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the pseudo-root
    pub fn is_root(&self) -> bool {
        &*self.0 == "/"
    }

    /// Number of elements below the pseudo-root (`/` has 0, `/World` has 1)
    pub fn element_count(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.0.matches('/').count()
        }
    }

    /// Last element, or `None` for the pseudo-root
    pub fn name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.rsplit('/').next()
    }

    /// Parent path, or `None` for the pseudo-root
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(Arc::from(&self.0[..idx]))),
            None => None,
        }
    }

    /// Append a child element
    pub fn child(&self, name: &str) -> Result<Self, PathError> {
        if !is_valid_name(name) {
            return Err(PathError::InvalidName {
                path: self.to_string(),
                name: name.to_string(),
            });
        }
        let text = if self.is_root() {
            format!("/{name}")
        } else {
            format!("{}/{name}", self.0)
        };
        Ok(Self(Arc::from(text)))
    }

    /// Whether `prefix` is this path or one of its ancestors
    pub fn has_prefix(&self, prefix: &Self) -> bool {
        if prefix.is_root() || self == prefix {
            return true;
        }
        self.0.len() > prefix.0.len()
            && self.0.starts_with(&*prefix.0)
            && self.0.as_bytes()[prefix.0.len()] == b'/'
    }

    /// Ancestors from the parent up to (and including) the pseudo-root
    pub fn ancestors(&self) -> impl Iterator<Item = ScenePath> {
        std::iter::successors(self.parent(), ScenePath::parent)
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for ScenePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ScenePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScenePath({})", self.0)
    }
}

impl FromStr for ScenePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ScenePath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for ScenePath {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ScenePath> for String {
    fn from(path: ScenePath) -> Self {
        path.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(text: &str) -> ScenePath {
        ScenePath::parse(text).unwrap()
    }

    #[test]
    fn test_parse_rejects_bad_text() {
        assert_eq!(ScenePath::parse(""), Err(PathError::Empty));
        assert!(matches!(ScenePath::parse("World"), Err(PathError::NotAbsolute(_))));
        assert!(matches!(ScenePath::parse("/World/"), Err(PathError::InvalidName { .. })));
        assert!(matches!(ScenePath::parse("/World//Geo"), Err(PathError::InvalidName { .. })));
        assert!(matches!(ScenePath::parse("/9lives"), Err(PathError::InvalidName { .. })));
    }

    #[test]
    fn test_parent_and_name() {
        let path = p("/World/Geo/torch_1");
        assert_eq!(path.name(), Some("torch_1"));
        assert_eq!(path.parent(), Some(p("/World/Geo")));
        assert_eq!(p("/World").parent(), Some(ScenePath::root()));
        assert_eq!(ScenePath::root().parent(), None);
        assert_eq!(ScenePath::root().name(), None);
        assert_eq!(path.element_count(), 3);
    }

    #[test]
    fn test_child_and_prefix() {
        let world = ScenePath::root().child("World").unwrap();
        let lights = world.child("Lights").unwrap();
        assert_eq!(lights.as_str(), "/World/Lights");
        assert!(lights.has_prefix(&world));
        assert!(lights.has_prefix(&lights));
        assert!(!p("/WorldX/Lights").has_prefix(&world));
        assert!(world.child("bad name").is_err());
    }

    #[test]
    fn test_ancestors_end_at_root() {
        let chain: Vec<_> = p("/A/B/C").ancestors().collect();
        assert_eq!(chain, vec![p("/A/B"), p("/A"), ScenePath::root()]);
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut paths = vec![p("/World/b"), p("/World"), p("/World/a/x"), p("/World/a")];
        paths.sort();
        assert_eq!(paths, vec![p("/World"), p("/World/a"), p("/World/a/x"), p("/World/b")]);
    }

    #[test]
    fn test_serde_as_string() {
        let path = p("/World/Lights/Sky_light");
        let text = ron::to_string(&path).unwrap();
        assert_eq!(text, "\"/World/Lights/Sky_light\"");
        let back: ScenePath = ron::from_str(&text).unwrap();
        assert_eq!(back, path);
        assert!(ron::from_str::<ScenePath>("\"relative\"").is_err());
    }
}
