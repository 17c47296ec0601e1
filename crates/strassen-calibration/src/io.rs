//! Profile persistence (load/save).

use std::path::{Path, PathBuf};

use crate::profile::{self, CalibrationProfile};

const PROFILE_FILENAME: &str = "strassen_calibration.json";
const CONFIG_DIR_NAME: &str = "strassen";

/// Errors raised while reading or writing a profile.
#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    #[error("profile I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("profile is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load calibration profile from the standard location.
/// Tries the XDG config dir first, then the working directory.
#[must_use]
pub fn load_profile() -> Option<CalibrationProfile> {
    candidate_paths()
        .into_iter()
        .filter(|path| path.exists())
        .find_map(|path| match load_from_path(&path) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "skipping unreadable profile");
                None
            }
        })
}

/// Load a profile and validate it against the current environment.
/// Returns `None` if the profile is incompatible, invalid, or for a different CPU.
#[must_use]
pub fn load_validated_profile() -> Option<CalibrationProfile> {
    load_profile().and_then(validated)
}

/// Keep `p` only if it can be used on this machine.
#[must_use]
pub fn validated(p: CalibrationProfile) -> Option<CalibrationProfile> {
    if !p.is_compatible() {
        tracing::warn!(version = p.version, "profile version mismatch, ignoring cached profile");
        return None;
    }
    if !p.is_valid() {
        tracing::warn!(
            threshold = p.base_case_threshold,
            "profile has an invalid threshold, ignoring cached profile"
        );
        return None;
    }
    if !p.matches_cpu(&profile::cpu_fingerprint()) {
        tracing::warn!(cpu = %p.cpu_model, "profile CPU mismatch, ignoring cached profile");
        return None;
    }
    Some(p)
}

/// Save calibration profile to the XDG config directory.
/// Falls back to the working directory if no config dir is known.
/// Returns the path written.
pub fn save_profile(p: &CalibrationProfile) -> Result<PathBuf, CalibrationError> {
    let path = if let Some(xdg_path) = xdg_profile_path() {
        if let Some(parent) = xdg_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        xdg_path
    } else {
        cwd_profile_path()
    };

    save_to_path(p, &path)?;
    Ok(path)
}

/// Save profile to a specific path.
pub fn save_to_path(p: &CalibrationProfile, path: &Path) -> Result<(), CalibrationError> {
    let content = serde_json::to_string_pretty(p)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a profile from a specific path without validating it.
pub fn load_from_path(path: &Path) -> Result<CalibrationProfile, CalibrationError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Delete the first saved profile found, returning its path.
pub fn delete_profile() -> Result<Option<PathBuf>, CalibrationError> {
    for path in candidate_paths() {
        if delete_from_path(&path)? {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Delete the profile at `path`; `false` if there was none.
pub fn delete_from_path(path: &Path) -> Result<bool, CalibrationError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn candidate_paths() -> Vec<PathBuf> {
    xdg_profile_path()
        .into_iter()
        .chain(std::iter::once(cwd_profile_path()))
        .collect()
}

/// The XDG config path for the profile.
pub fn xdg_profile_path() -> Option<PathBuf> {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;

    Some(config_dir.join(CONFIG_DIR_NAME).join(PROFILE_FILENAME))
}

fn cwd_profile_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(format!(".{PROFILE_FILENAME}"))
}
