use std::fmt;
use std::fmt::Formatter;

/// Server-relative path of an uploaded resource, e.g. `uploads/img1.png`.
///
/// Order and uniqueness are whatever the server returned; nothing here
/// normalises the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePath(String);

impl FilePath {
    /// Final `/`-delimited segment. A trailing slash yields an empty name.
    pub fn display_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// Root-relative source the page requests the image from.
    pub fn resource_src(&self) -> String {
        format!("/{}", self.0)
    }
}

impl From<String> for FilePath {
    fn from(path: String) -> Self {
        FilePath(path)
    }
}

impl From<&str> for FilePath {
    fn from(path: &str) -> Self {
        FilePath(path.to_owned())
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
