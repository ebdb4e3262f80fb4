//! pkg-config adapter: resolve a package's compile and link flags.
//!
//! One query per package, no retries. The tool is expected to print a
//! single whitespace-separated line of GCC-style tokens on standard output;
//! each token lands in exactly one bucket of [`PkgInfo`], decided by its
//! leading two characters.

use crate::error::{Error, Result};
use crate::process;
use crate::strlist::StringList;

const DEFAULT_TOOL: &str = "pkg-config";

/// Flags and search paths reported for one package.
///
/// Merge into a build target with
/// [`BuildTarget::add_package`](crate::target::BuildTarget::add_package).
#[derive(Debug, Clone, Default)]
pub struct PkgInfo {
    pub package: String,
    /// Tokens that matched no known prefix, passed to the compiler verbatim.
    pub cflags: StringList,
    /// `-I` tokens, prefix stripped.
    pub include_dirs: StringList,
    /// `-L` tokens, prefix stripped.
    pub lib_dirs: StringList,
    /// `-l` tokens, prefix stripped.
    pub libs: StringList,
}

/// Queries the default metadata tool for `package`.
///
/// Honors the conventional `PKG_CONFIG` environment variable for picking
/// the tool binary, falling back to `pkg-config`.
pub fn query(package: &str) -> Result<PkgInfo> {
    let tool = std::env::var("PKG_CONFIG").unwrap_or_else(|_| DEFAULT_TOOL.to_string());
    query_with(&tool, package)
}

/// Queries a specific metadata tool for `package`.
///
/// Invoked as `<tool> --cflags --libs <package>`. A missing tool surfaces
/// as a spawn error and a non-zero exit as [`Error::PkgConfig`]; either way
/// the caller gets no partially-populated result.
pub fn query_with(tool: &str, package: &str) -> Result<PkgInfo> {
    let args = [
        "--cflags".to_string(),
        "--libs".to_string(),
        package.to_string(),
    ];

    let captured = process::run_captured(tool, &args)?;
    if !captured.success() {
        return Err(Error::PkgConfig {
            package: package.to_string(),
        });
    }

    Ok(parse(package, &captured.stdout))
}

/// Classifies every whitespace-separated token of a query output.
///
/// Empty tokens from consecutive separators are skipped and the trailing
/// newline disappears with the rest of the whitespace.
fn parse(package: &str, output: &str) -> PkgInfo {
    let mut info = PkgInfo {
        package: package.to_string(),
        ..Default::default()
    };

    for token in output.split_whitespace() {
        if let Some(dir) = token.strip_prefix("-I") {
            info.include_dirs.push(dir);
        } else if let Some(dir) = token.strip_prefix("-L") {
            info.lib_dirs.push(dir);
        } else if let Some(lib) = token.strip_prefix("-l") {
            info.libs.push(lib);
        } else {
            info.cflags.push(token);
        }
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(list: &StringList) -> Vec<&str> {
        list.iter().collect()
    }

    #[test]
    fn classifies_each_token_into_one_bucket() {
        let info = parse("demo", "-Iinc -Lpath -lfoo -DBAR\n");
        assert_eq!(strs(&info.include_dirs), ["inc"]);
        assert_eq!(strs(&info.lib_dirs), ["path"]);
        assert_eq!(strs(&info.libs), ["foo"]);
        assert_eq!(strs(&info.cflags), ["-DBAR"]);
    }

    #[test]
    fn keeps_token_order_within_buckets() {
        let info = parse(
            "gtk",
            "-I/usr/include/gtk -I/usr/include/glib -lgtk-3 -lglib-2.0 -pthread",
        );
        assert_eq!(
            strs(&info.include_dirs),
            ["/usr/include/gtk", "/usr/include/glib"]
        );
        assert_eq!(strs(&info.libs), ["gtk-3", "glib-2.0"]);
        assert_eq!(strs(&info.cflags), ["-pthread"]);
        assert!(info.lib_dirs.is_empty());
    }

    #[test]
    fn skips_empty_tokens_and_trailing_newline() {
        let info = parse("z", "  -lz   \n");
        assert_eq!(strs(&info.libs), ["z"]);
        assert!(info.cflags.is_empty());
        assert!(info.include_dirs.is_empty());
        assert!(info.lib_dirs.is_empty());
    }

    #[test]
    fn empty_output_yields_empty_buckets() {
        let info = parse("nothing", "\n");
        assert!(info.cflags.is_empty());
        assert!(info.include_dirs.is_empty());
        assert!(info.lib_dirs.is_empty());
        assert!(info.libs.is_empty());
    }

    #[test]
    fn prefix_rule_uses_leading_two_chars_only() {
        // -L inside a token does not make it a library dir
        let info = parse("odd", "-Wl,-L/opt -lm");
        assert_eq!(strs(&info.cflags), ["-Wl,-L/opt"]);
        assert_eq!(strs(&info.libs), ["m"]);
    }

    #[cfg(unix)]
    #[test]
    fn missing_tool_is_a_typed_failure() {
        let err = query_with("cforge-no-such-pkg-config", "zlib").unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_yields_no_partial_data() {
        // `false` prints nothing and exits 1: the query must fail cleanly
        let err = query_with("false", "zlib").unwrap_err();
        assert!(matches!(err, Error::PkgConfig { package } if package == "zlib"));
    }
}
