//! URL rewriting for merged style text.
//!
//! When style fragments are concatenated into an artifact that lives
//! somewhere else than the sources they came from, absolute `url(...)`
//! references into the output directory would break at runtime. This pass
//! rewrites them relative to the artifact's own final directory. Anything
//! else — already-relative paths, data URIs, references outside the output
//! directory — is left untouched.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*(['"]?)([^'")]+)(['"]?)\s*\)"#).expect("url pattern is valid")
});

/// Rewrite absolute `url(...)` references under `out_dir` to be relative to
/// the directory of `artifact_file_name` (itself relative to `out_dir`).
#[must_use]
pub fn rewrite_relative_urls(content: &str, out_dir: &Path, artifact_file_name: &str) -> String {
    let artifact_dir = match Path::new(artifact_file_name).parent() {
        Some(parent) => out_dir.join(parent),
        None => out_dir.to_path_buf(),
    };

    URL_PATTERN
        .replace_all(content, |caps: &regex::Captures<'_>| {
            let open = &caps[1];
            let target = &caps[2];
            let close = &caps[3];
            let path = Path::new(target);
            if path.is_absolute() && path.starts_with(out_dir) {
                let rel = relative_path(&artifact_dir, path);
                format!("url({open}{rel}{close})")
            } else {
                caps[0].to_owned()
            }
        })
        .into_owned()
}

/// Express `to` relative to the directory `from_dir`, with forward slashes.
///
/// Both paths must be absolute or both relative to the same root for the
/// result to be meaningful.
#[must_use]
pub(crate) fn relative_path(from_dir: &Path, to: &Path) -> String {
    let from: Vec<Component<'_>> = from_dir.components().collect();
    let to_parts: Vec<Component<'_>> = to.components().collect();

    let common = from
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..from.len() {
        rel.push("..");
    }
    for part in &to_parts[common..] {
        rel.push(part);
    }

    let mut out = String::new();
    for part in rel.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&part.as_os_str().to_string_lossy());
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_reference_under_output_dir() {
        let css = ".bg { background: url(/abs/out/sub/img.png); }";
        let out = rewrite_relative_urls(css, Path::new("/abs/out"), "a.css");
        assert_eq!(out, ".bg { background: url(sub/img.png); }");
    }

    #[test]
    fn leaves_reference_outside_output_dir() {
        let css = ".bg { background: url(/elsewhere/img.png); }";
        let out = rewrite_relative_urls(css, Path::new("/abs/out"), "a.css");
        assert_eq!(out, css);
    }

    #[test]
    fn leaves_relative_and_data_urls() {
        let css = ".a { background: url(img.png); } .b { background: url(data:image/png;base64,ab=); }";
        let out = rewrite_relative_urls(css, Path::new("/abs/out"), "a.css");
        assert_eq!(out, css);
    }

    #[test]
    fn repeated_calls_share_the_pattern() {
        // The pattern is a process-wide static; every call must see the
        // same compiled regex and produce identical rewrites.
        let css = ".a { background: url(/abs/out/img.png); }";
        let first = rewrite_relative_urls(css, Path::new("/abs/out"), "a.css");
        let second = rewrite_relative_urls(css, Path::new("/abs/out"), "a.css");
        assert_eq!(first, ".a { background: url(img.png); }");
        assert_eq!(first, second);
    }

    #[test]
    fn preserves_quote_style() {
        let css = r#".a { background: url('/abs/out/x.png'); } .b { background: url("/abs/out/y.png"); }"#;
        let out = rewrite_relative_urls(css, Path::new("/abs/out"), "a.css");
        assert_eq!(
            out,
            r#".a { background: url('x.png'); } .b { background: url("y.png"); }"#
        );
    }

    #[test]
    fn artifact_in_subdirectory_climbs_up() {
        let css = ".a { background: url(/abs/out/img.png); }";
        let out = rewrite_relative_urls(css, Path::new("/abs/out"), "assets/a.css");
        assert_eq!(out, ".a { background: url(../img.png); }");
    }

    #[test]
    fn sibling_subdirectory() {
        let css = ".a { background: url(/abs/out/media/img.png); }";
        let out = rewrite_relative_urls(css, Path::new("/abs/out"), "assets/a.css");
        assert_eq!(out, ".a { background: url(../media/img.png); }");
    }

    #[test]
    fn relative_path_same_dir() {
        assert_eq!(
            relative_path(Path::new("/abs/out"), Path::new("/abs/out/a.png")),
            "a.png"
        );
    }

    #[test]
    fn relative_path_descends() {
        assert_eq!(
            relative_path(Path::new("/abs/out"), Path::new("/abs/out/sub/deep/a.png")),
            "sub/deep/a.png"
        );
    }

    #[test]
    fn relative_path_climbs() {
        assert_eq!(
            relative_path(Path::new("/abs/out/assets"), Path::new("/abs/out/a.png")),
            "../a.png"
        );
    }

    #[test]
    fn relative_path_between_plain_names() {
        // Chunk-relative linking: both sides relative to the bundle root.
        assert_eq!(relative_path(Path::new(""), Path::new("vendor.css")), "vendor.css");
        assert_eq!(
            relative_path(Path::new("nested"), Path::new("vendor.css")),
            "../vendor.css"
        );
    }
}
