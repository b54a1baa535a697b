use boost_schema::Platform;
use std::path::PathBuf;

/// Install root used on Windows runners
pub const WINDOWS_ROOT_DIR: &str = r"D:\boost";

/// Install root used everywhere else
pub const UNIX_ROOT_DIR: &str = "/usr/boost";

/// Default root directory for `platform`.
pub fn default_root_dir(platform: &Platform) -> PathBuf {
    if platform.is_windows() {
        PathBuf::from(WINDOWS_ROOT_DIR)
    } else {
        PathBuf::from(UNIX_ROOT_DIR)
    }
}
