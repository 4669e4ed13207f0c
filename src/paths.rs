//! Platform application-data directory resolution.
//!
//! The base directory is `%APPDATA%` when that variable is set, otherwise
//! `~/Library/Preferences` on macOS, otherwise the home directory.

use std::ffi::OsString;
use std::path::PathBuf;

/// Directory for this application's data, `<base>/<app_dir_name>`.
///
/// Returns `None` when neither `APPDATA` nor a home directory is available.
///
/// # Examples
///
/// ```rust,no_run
/// use settings_store::paths::app_data_dir;
///
/// let dir = app_data_dir(".tjmc").expect("no home directory");
/// println!("settings live in {}", dir.display());
/// ```
pub fn app_data_dir(app_dir_name: &str) -> Option<PathBuf> {
    resolve_app_data_dir(
        std::env::var_os("APPDATA"),
        dirs::home_dir(),
        cfg!(target_os = "macos"),
        app_dir_name,
    )
}

/// [`app_data_dir`] with every input passed explicitly.
pub fn resolve_app_data_dir(
    appdata: Option<OsString>,
    home: Option<PathBuf>,
    macos: bool,
    app_dir_name: &str,
) -> Option<PathBuf> {
    let base = match appdata.filter(|v| !v.is_empty()) {
        Some(appdata) => PathBuf::from(appdata),
        None if macos => home?.join("Library").join("Preferences"),
        None => home?,
    };
    Some(base.join(app_dir_name))
}
