//! Build target description and its configuration vocabulary.
//!
//! A [`BuildTarget`] is created once per invocation, filled in by the user's
//! configuration closure through the `add_*` methods, and then handed to the
//! engine. The engine only ever writes one field back: `objects`.

use crate::error::{Error, Result};
use crate::pkgconfig::PkgInfo;
use crate::strlist::StringList;
use std::fmt;

/// Kind of artifact a build produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductType {
    Executable,
    StaticLib,
    SharedLib,
}

impl ProductType {
    /// Suffix appended to the output name at link time.
    pub(crate) fn suffix(self) -> &'static str {
        match self {
            ProductType::Executable => "",
            ProductType::StaticLib => ".a",
            ProductType::SharedLib => ".so",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProductType::Executable => "executable",
            ProductType::StaticLib => "static library",
            ProductType::SharedLib => "shared library",
        })
    }
}

/// Lifecycle hook, fired at a fixed point of the orchestration sequence.
pub type Hook = Box<dyn FnMut(&mut BuildTarget)>;

/// Per-file compile gate. Returning `false` vetoes the file and aborts the
/// whole build; it is not a skip-this-file mechanism.
pub type CompileGate = Box<dyn FnMut(&BuildTarget, &str) -> bool>;

/// Everything the engine needs to know to build one artifact.
pub struct BuildTarget {
    pub name: String,
    pub kind: ProductType,
    /// Compiler binary for compile and link steps. Defaults to `cc`.
    pub compiler: String,
    /// Archiver binary for static libraries. Defaults to `ar`.
    pub archiver: String,
    pub files: StringList,
    pub include_dirs: StringList,
    pub libraries: StringList,
    pub library_dirs: StringList,
    pub flags: StringList,
    /// Object files accumulated by the compile phase, in wait order.
    pub objects: StringList,
    pub(crate) before_compile: Option<Hook>,
    pub(crate) after_compile: Option<Hook>,
    pub(crate) before_link: Option<Hook>,
    pub(crate) after_link: Option<Hook>,
    pub(crate) on_compile: Option<CompileGate>,
}

impl std::fmt::Debug for BuildTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildTarget")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("compiler", &self.compiler)
            .field("archiver", &self.archiver)
            .field("files", &self.files)
            .field("include_dirs", &self.include_dirs)
            .field("libraries", &self.libraries)
            .field("library_dirs", &self.library_dirs)
            .field("flags", &self.flags)
            .field("objects", &self.objects)
            .field("before_compile", &self.before_compile.is_some())
            .field("after_compile", &self.after_compile.is_some())
            .field("before_link", &self.before_link.is_some())
            .field("after_link", &self.after_link.is_some())
            .field("on_compile", &self.on_compile.is_some())
            .finish()
    }
}

impl BuildTarget {
    /// Creates an empty description for `name`.
    pub fn new(name: impl Into<String>, kind: ProductType) -> Self {
        Self {
            name: name.into(),
            kind,
            compiler: "cc".to_string(),
            archiver: "ar".to_string(),
            files: StringList::new(),
            include_dirs: StringList::new(),
            libraries: StringList::new(),
            library_dirs: StringList::new(),
            flags: StringList::new(),
            objects: StringList::new(),
            before_compile: None,
            after_compile: None,
            before_link: None,
            after_link: None,
            on_compile: None,
        }
    }

    /// Appends one source file.
    pub fn add_file(&mut self, file: impl Into<String>) -> &mut Self {
        self.files.push(file);
        self
    }

    /// Appends several source files in order.
    pub fn add_files<I>(&mut self, files: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.files.push_all(files);
        self
    }

    /// Expands a shell-style pattern and appends every match.
    ///
    /// Zero matches is not an error; the pattern simply contributes
    /// nothing. A pattern that does not parse is [`Error::Pattern`].
    pub fn add_glob(&mut self, pattern: &str) -> Result<&mut Self> {
        let paths = glob::glob(pattern).map_err(|source| Error::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        for path in paths.flatten() {
            self.files.push(path.to_string_lossy());
        }
        Ok(self)
    }

    /// Appends one include search directory (`-I` at compile time).
    pub fn add_include_dir(&mut self, dir: impl Into<String>) -> &mut Self {
        self.include_dirs.push(dir);
        self
    }

    pub fn add_include_dirs<I>(&mut self, dirs: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.include_dirs.push_all(dirs);
        self
    }

    /// Appends one library to link against (`-l` at link time).
    pub fn add_library(&mut self, library: impl Into<String>) -> &mut Self {
        self.libraries.push(library);
        self
    }

    pub fn add_libraries<I>(&mut self, libraries: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.libraries.push_all(libraries);
        self
    }

    /// Appends one library search directory (`-L` at link time).
    pub fn add_library_dir(&mut self, dir: impl Into<String>) -> &mut Self {
        self.library_dirs.push(dir);
        self
    }

    pub fn add_library_dirs<I>(&mut self, dirs: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.library_dirs.push_all(dirs);
        self
    }

    /// Appends one compiler flag, passed through verbatim.
    pub fn add_flag(&mut self, flag: impl Into<String>) -> &mut Self {
        self.flags.push(flag);
        self
    }

    pub fn add_flags<I>(&mut self, flags: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.flags.push_all(flags);
        self
    }

    /// Merges a resolved package's buckets onto the matching lists.
    ///
    /// A one-way copy: the target keeps no reference to the package.
    pub fn add_package(&mut self, pkg: &PkgInfo) -> &mut Self {
        self.flags.push_all(pkg.cflags.iter());
        self.include_dirs.push_all(pkg.include_dirs.iter());
        self.library_dirs.push_all(pkg.lib_dirs.iter());
        self.libraries.push_all(pkg.libs.iter());
        self
    }

    /// Installs the hook fired just before the compile phase.
    pub fn before_compile(&mut self, hook: impl FnMut(&mut BuildTarget) + 'static) -> &mut Self {
        self.before_compile = Some(Box::new(hook));
        self
    }

    /// Installs the hook fired after a successful compile phase.
    pub fn after_compile(&mut self, hook: impl FnMut(&mut BuildTarget) + 'static) -> &mut Self {
        self.after_compile = Some(Box::new(hook));
        self
    }

    /// Installs the hook fired just before the link phase.
    pub fn before_link(&mut self, hook: impl FnMut(&mut BuildTarget) + 'static) -> &mut Self {
        self.before_link = Some(Box::new(hook));
        self
    }

    /// Installs the hook fired after a successful link phase.
    pub fn after_link(&mut self, hook: impl FnMut(&mut BuildTarget) + 'static) -> &mut Self {
        self.after_link = Some(Box::new(hook));
        self
    }

    /// Installs the per-file compile gate.
    pub fn on_compile(
        &mut self,
        gate: impl FnMut(&BuildTarget, &str) -> bool + 'static,
    ) -> &mut Self {
        self.on_compile = Some(Box::new(gate));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn new_target_defaults() {
        let target = BuildTarget::new("app", ProductType::Executable);
        assert_eq!(target.compiler, "cc");
        assert_eq!(target.archiver, "ar");
        assert!(target.files.is_empty());
        assert!(target.objects.is_empty());
    }

    #[test]
    fn add_methods_preserve_order() {
        let mut target = BuildTarget::new("app", ProductType::Executable);
        target
            .add_file("main.c")
            .add_files(["util.c", "io.c"])
            .add_include_dir("include")
            .add_flags(["-Wall", "-O2"]);

        let files: Vec<&str> = target.files.iter().collect();
        assert_eq!(files, ["main.c", "util.c", "io.c"]);
        let flags: Vec<&str> = target.flags.iter().collect();
        assert_eq!(flags, ["-Wall", "-O2"]);
    }

    #[test]
    fn add_package_merges_all_buckets() {
        let mut pkg = PkgInfo {
            package: "demo".to_string(),
            ..Default::default()
        };
        pkg.cflags.push("-DDEMO");
        pkg.include_dirs.push("/opt/demo/include");
        pkg.lib_dirs.push("/opt/demo/lib");
        pkg.libs.push("demo");

        let mut target = BuildTarget::new("app", ProductType::Executable);
        target.add_flag("-g").add_package(&pkg);

        let flags: Vec<&str> = target.flags.iter().collect();
        assert_eq!(flags, ["-g", "-DDEMO"]);
        let includes: Vec<&str> = target.include_dirs.iter().collect();
        assert_eq!(includes, ["/opt/demo/include"]);
        let lib_dirs: Vec<&str> = target.library_dirs.iter().collect();
        assert_eq!(lib_dirs, ["/opt/demo/lib"]);
        let libs: Vec<&str> = target.libraries.iter().collect();
        assert_eq!(libs, ["demo"]);
    }

    #[test]
    fn glob_appends_matches_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.c"), "").unwrap();
        fs::write(dir.path().join("b.c"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let mut target = BuildTarget::new("app", ProductType::Executable);
        let pattern = format!("{}/*.c", dir.path().display());
        target.add_glob(&pattern).unwrap();

        assert_eq!(target.files.len(), 2);
        for file in target.files.iter() {
            assert!(file.ends_with(".c"), "unexpected match {file}");
        }
    }

    #[test]
    fn glob_zero_matches_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut target = BuildTarget::new("app", ProductType::Executable);
        let pattern = format!("{}/*.nothing", dir.path().display());
        target.add_glob(&pattern).unwrap();
        assert!(target.files.is_empty());
    }

    #[test]
    fn glob_bad_pattern_is_typed() {
        let mut target = BuildTarget::new("app", ProductType::Executable);
        let err = target.add_glob("src/[").unwrap_err();
        assert!(matches!(err, Error::Pattern { .. }));
    }

    #[test]
    fn product_type_display_and_suffix() {
        assert_eq!(ProductType::Executable.to_string(), "executable");
        assert_eq!(ProductType::StaticLib.to_string(), "static library");
        assert_eq!(ProductType::SharedLib.to_string(), "shared library");
        assert_eq!(ProductType::Executable.suffix(), "");
        assert_eq!(ProductType::StaticLib.suffix(), ".a");
        assert_eq!(ProductType::SharedLib.suffix(), ".so");
    }
}
