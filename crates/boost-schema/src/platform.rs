//! Host operating system identifiers.

/// Operating system identifier as it appears in the manifest's `platform` field.
///
/// The string forms follow the convention used by the catalog
/// (`win32`, `linux`, `darwin`). Anything else is carried verbatim in
/// [`Platform::Other`] so comparisons stay exact.
///
/// # Example
///
/// ```
/// use boost_schema::Platform;
///
/// let current = Platform::current();
/// println!("Running on: {}", current);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Windows
    Win32,
    /// Linux
    Linux,
    /// macOS
    Darwin,
    /// Any other identifier, matched verbatim
    Other(String),
}

impl Platform {
    /// Get the platform this binary was compiled for
    pub fn current() -> Self {
        #[cfg(target_os = "windows")]
        {
            Self::Win32
        }
        #[cfg(target_os = "macos")]
        {
            Self::Darwin
        }
        #[cfg(target_os = "linux")]
        {
            Self::Linux
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            Self::Other(std::env::consts::OS.to_string())
        }
    }

    /// Convert to the manifest's string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Win32 => "win32",
            Self::Linux => "linux",
            Self::Darwin => "darwin",
            Self::Other(s) => s,
        }
    }

    /// Returns `true` for Windows hosts.
    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Win32)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = std::convert::Infallible;

    // Case-sensitive on purpose: "Linux" is not "linux" in the manifest.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "win32" => Self::Win32,
            "linux" => Self::Linux,
            "darwin" => Self::Darwin,
            other => Self::Other(other.to_string()),
        })
    }
}
