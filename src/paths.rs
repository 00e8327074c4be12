//! Configuration directory resolution
//!
//! Maps an application name onto the directory where the operating system
//! conventionally keeps per-user settings:
//!
//! | Platform | Directory |
//! |---|---|
//! | Windows | `%APPDATA%\<app>` or `<home>\AppData\Roaming\<app>` |
//! | macOS | `<home>/Library/Application Support/<app>` |
//! | everything else | `$XDG_CONFIG_HOME/<app>` or `<home>/.config/<app>` |
//!
//! Resolution is a pure function of the application name, the platform and an
//! [`Environment`] snapshot. Nothing is cached.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Operating system family used to pick a directory convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    /// Linux, the BSDs, Solaris and anything else Unix-like
    Unix,
}

impl Platform {
    /// The platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Unix
        }
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    /// Accepts both Rust (`windows`, `macos`) and Node-style (`win32`,
    /// `darwin`) names. Unknown names fall into the Unix-like bucket.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "win32" | "windows" => Platform::Windows,
            "darwin" | "macos" | "osx" => Platform::MacOs,
            _ => Platform::Unix,
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
            Platform::Unix => "unix",
        };
        f.write_str(name)
    }
}

/// Snapshot of the environment inputs that feed directory resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub home: Option<PathBuf>,
    pub appdata: Option<OsString>,
    pub xdg_config_home: Option<OsString>,
}

impl Environment {
    /// Read the live process environment
    pub fn from_process() -> Self {
        Self {
            home: dirs::home_dir(),
            appdata: non_empty(std::env::var_os("APPDATA")),
            xdg_config_home: non_empty(std::env::var_os("XDG_CONFIG_HOME")),
        }
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn with_appdata(mut self, appdata: impl Into<OsString>) -> Self {
        self.appdata = non_empty(Some(appdata.into()));
        self
    }

    pub fn with_xdg_config_home(mut self, xdg: impl Into<OsString>) -> Self {
        self.xdg_config_home = non_empty(Some(xdg.into()));
        self
    }

    fn home_or_empty(&self) -> &Path {
        match &self.home {
            Some(home) => home,
            None => {
                log::warn!("Could not determine home directory, resolving relative to cwd");
                Path::new("")
            }
        }
    }
}

// Empty variables are treated the same as unset ones
fn non_empty(value: Option<OsString>) -> Option<OsString> {
    value.filter(|v| !v.is_empty())
}

/// Compute the configuration directory for `app_name`
///
/// `app_name` is used verbatim as a path segment; it is not checked for
/// separators or other characters that would escape the directory.
///
/// # Example
///
/// ```
/// use appconf::paths::{resolve_directory, Environment, Platform};
/// use std::path::PathBuf;
///
/// let env = Environment::default().with_home("/home/alice");
/// let dir = resolve_directory("myapp", Platform::Unix, &env);
/// assert_eq!(dir, PathBuf::from("/home/alice/.config/myapp"));
/// ```
pub fn resolve_directory(app_name: &str, platform: Platform, env: &Environment) -> PathBuf {
    let dir = match platform {
        Platform::Windows => match &env.appdata {
            Some(appdata) => PathBuf::from(appdata).join(app_name),
            None => env
                .home_or_empty()
                .join("AppData")
                .join("Roaming")
                .join(app_name),
        },
        Platform::MacOs => env
            .home_or_empty()
            .join("Library")
            .join("Application Support")
            .join(app_name),
        Platform::Unix => match &env.xdg_config_home {
            Some(xdg) => PathBuf::from(xdg).join(app_name),
            None => env.home_or_empty().join(".config").join(app_name),
        },
    };

    log::debug!(
        "Resolved {} config directory for {}: {}",
        platform,
        app_name,
        dir.display()
    );
    dir
}

/// Compute the path of `file_name` inside the configuration directory
pub fn resolve_file(
    app_name: &str,
    file_name: impl AsRef<Path>,
    platform: Platform,
    env: &Environment,
) -> PathBuf {
    resolve_directory(app_name, platform, env).join(file_name)
}

/// [`resolve_directory`] against the running OS and live environment,
/// or against `platform` when one is given
pub fn get_dir_for(app_name: &str, platform: Option<Platform>) -> PathBuf {
    resolve_directory(
        app_name,
        platform.unwrap_or_else(Platform::current),
        &Environment::from_process(),
    )
}

/// [`resolve_file`] against the running OS and live environment
pub fn get_file_for(
    app_name: &str,
    file_name: impl AsRef<Path>,
    platform: Option<Platform>,
) -> PathBuf {
    get_dir_for(app_name, platform).join(file_name)
}
