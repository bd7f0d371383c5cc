//! Ignore rules deciding which relative paths are excluded from
//! reconciliation before any hashing happens.
//!
//! Rules are evaluated in order with short-circuiting; the order only
//! affects which reason gets logged, not the boolean result.

use camino::Utf8Path;

use crate::models::version_at_least;

/// Known non-content files ignored regardless of location.
const IGNORE_FILES: [&str; 3] = ["config.ini", "vulkan_gpu_list_config.txt", "version.dll"];

/// Extensions (without the dot) ignored regardless of location.
const IGNORE_EXTENSIONS: [&str; 3] = ["log", "dmp", "bak"];

/// Cache/plugin/SDK directory names; any path containing one of these as a
/// component is ignored.
const IGNORE_DIRS: [&str; 7] =
    ["SDKCaches", "webCaches", "Persistent", "SDK", "LauncherPlugins", "blob_storage", "ldiff"];

/// Decide whether a relative path is excluded from reconciliation.
///
/// `new_ver` gates the voice-over rule: `VO_*.pck` files are only ignored
/// from 2.7.0 onward, when voice packs moved out of the main packages. The
/// version comparison deliberately fails open (see
/// [`version_at_least`](crate::models::version_at_least)): an unparsable
/// version counts as at-least-2.7.0 and the file is ignored.
pub fn should_ignore(rel_path: &str, new_ver: &str) -> bool {
    let path = Utf8Path::new(rel_path);
    let basename = path.file_name().unwrap_or(rel_path);
    let extension = path.extension().unwrap_or("");

    if extension == "pck" {
        if basename.starts_with("SFX_") || basename.starts_with("Music_") {
            tracing::debug!("Ignored file by prefix rule: {basename}");
            return true;
        }

        if basename.starts_with("VO_") && version_at_least(new_ver, 2, 7, 0) {
            tracing::debug!("Ignored file by prefix rule: {basename}");
            return true;
        }
    }

    if IGNORE_FILES.contains(&basename) {
        tracing::debug!("Ignored file: {basename}");
        return true;
    }

    if IGNORE_EXTENSIONS.contains(&extension) {
        tracing::debug!("Ignored extension: {basename}");
        return true;
    }

    if rel_path
        .split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .any(|part| IGNORE_DIRS.contains(&part))
    {
        tracing::debug!("Ignored directory pattern: {rel_path}");
        return true;
    }

    // Package-version markers sit at the category root and are compared as
    // a dedicated pair, never by the tree walk.
    if basename.starts_with("Audio_") && basename.ends_with("_pkg_version") {
        return true;
    }

    false
}
