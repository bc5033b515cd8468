use std::path::Path;

/// Separator between a naming prefix and the rest of a directory name.
const PREFIX_SEPARATOR: char = '-';

/// Derive a package name from the last segment of `dir`.
///
/// When the segment starts with one of `prefixes` followed by `-` and a
/// non-empty remainder, the prefix becomes the scope: `octo-tool` with prefix
/// `octo` yields `@octo/tool`. Prefixes are tried in order. Returns `None`
/// when the path has no usable final segment.
pub fn derive_name(dir: &Path, prefixes: &[String]) -> Option<String> {
    let segment = dir.file_name()?.to_string_lossy().into_owned();
    if segment.is_empty() {
        return None;
    }

    for prefix in prefixes.iter().filter(|p| !p.is_empty()) {
        let rest = segment
            .strip_prefix(prefix.as_str())
            .and_then(|rest| rest.strip_prefix(PREFIX_SEPARATOR));

        if let Some(rest) = rest.filter(|r| !r.is_empty()) {
            return Some(format!("@{}/{}", prefix, rest));
        }
    }

    Some(segment)
}

/// Repository slug for a package name: every run of non-word characters
/// (anything but ASCII letters, digits and `_`) becomes one hyphen, and
/// leading or trailing hyphens are dropped. Case is preserved.
pub fn repo_slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_was_dash = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
            prev_was_dash = false;
        } else if !prev_was_dash {
            out.push('-');
            prev_was_dash = true;
        }
    }

    out.trim_matches('-').to_string()
}
