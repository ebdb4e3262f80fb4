//! The build engine: parallel compile dispatch, link synthesis,
//! orchestration and lifecycle hooks.
//!
//! Parallelism is multi-process with a single waiting parent: every
//! translation unit is dispatched before the first wait, then children are
//! reaped in dispatch order. Launched children always run to completion;
//! on failure the engine stops collecting their objects rather than
//! signalling them, and every child is reaped before the first failure is
//! reported.

use crate::error::{Error, Result, Stage};
use crate::process;
use crate::target::{BuildTarget, Hook, ProductType};
use colored::*;
use std::process::Child;

/// Argument vector for one translation unit.
///
/// Shape: `-c <file> -I<dir>.. <flags>.. -o <file>.o`. The object file is
/// the source path suffixed `.o`, returned alongside for correlation.
fn compile_command(target: &BuildTarget, file: &str) -> (Vec<String>, String) {
    let object = format!("{file}.o");

    let mut args = vec!["-c".to_string(), file.to_string()];
    for dir in target.include_dirs.iter() {
        args.push(format!("-I{dir}"));
    }
    for flag in target.flags.iter() {
        args.push(flag.to_string());
    }
    args.push("-o".to_string());
    args.push(object.clone());

    (args, object)
}

/// Program and argument vector for the link or archive step.
///
/// Executables and shared libraries go through the compiler (the latter
/// with `-shared` up front); static libraries go through the archiver with
/// `rcs`. Search paths, libraries and flags trail the output name in every
/// case. The archiver ignores them, but they are passed through
/// positionally for compatibility.
fn link_command(target: &BuildTarget) -> (String, Vec<String>) {
    let mut args = Vec::new();
    let program = match target.kind {
        ProductType::Executable => target.compiler.clone(),
        ProductType::SharedLib => {
            args.push("-shared".to_string());
            target.compiler.clone()
        }
        ProductType::StaticLib => {
            args.push("rcs".to_string());
            target.archiver.clone()
        }
    };

    for object in target.objects.iter() {
        args.push(object.to_string());
    }
    args.push("-o".to_string());
    args.push(format!("{}{}", target.name, target.kind.suffix()));
    for dir in target.library_dirs.iter() {
        args.push(format!("-L{dir}"));
    }
    for library in target.libraries.iter() {
        args.push(format!("-l{library}"));
    }
    for flag in target.flags.iter() {
        args.push(flag.to_string());
    }

    (program, args)
}

fn status_code(status: std::process::ExitStatus) -> i32 {
    // a signal-terminated child has no code
    status.code().unwrap_or(1)
}

/// Compile phase: dispatch every file, then reap in dispatch order.
///
/// A gate veto or a spawn failure stops dispatching immediately, but
/// children already launched are still reaped before the error returns.
/// Each zero-exit child contributes its object file to `target.objects`.
fn compile(target: &mut BuildTarget) -> Result<()> {
    let mut gate = target.on_compile.take();
    let mut pending: Vec<(Child, String)> = Vec::new();
    let mut failure: Option<Error> = None;

    let files: Vec<String> = target.files.iter().map(str::to_string).collect();
    for file in files {
        if let Some(check) = gate.as_mut() {
            if !check(target, &file) {
                eprintln!("{} {} rejected {}", "x".red(), "on_compile".bold(), file);
                failure = Some(Error::Rejected { file });
                break;
            }
        }

        let (args, object) = compile_command(target, &file);
        match process::run_async(&target.compiler, &args) {
            Ok(child) => pending.push((child, object)),
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    for (mut child, object) in pending {
        match child.wait() {
            Ok(status) if status.success() => {
                target.objects.push(object);
            }
            Ok(status) => {
                if failure.is_none() {
                    failure = Some(Error::ToolFailed {
                        stage: Stage::Compile,
                        code: status_code(status),
                    });
                }
            }
            Err(source) => {
                if failure.is_none() {
                    failure = Some(Error::Wait {
                        command: target.compiler.clone(),
                        source,
                    });
                }
            }
        }
    }

    target.on_compile = gate;

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Link/archive phase: one synchronous command, status passed through.
fn link(target: &mut BuildTarget) -> Result<()> {
    let (program, args) = link_command(target);
    let mut child = process::run_async(&program, &args)?;
    let status = child.wait().map_err(|source| Error::Wait {
        command: program,
        source,
    })?;

    if !status.success() {
        let stage = match target.kind {
            ProductType::StaticLib => Stage::Archive,
            _ => Stage::Link,
        };
        return Err(Error::ToolFailed {
            stage,
            code: status_code(status),
        });
    }
    Ok(())
}

/// Fires the hook in `slot`, if installed.
///
/// The hook is taken out for the duration of the call so it can receive
/// the target mutably; it cannot re-enter itself.
fn fire(target: &mut BuildTarget, slot: fn(&mut BuildTarget) -> &mut Option<Hook>) {
    if let Some(mut hook) = slot(target).take() {
        hook(target);
        *slot(target) = Some(hook);
    }
}

/// Runs the full orchestration for one target.
///
/// Sequence: announce, user configuration, input dump, `before_compile`,
/// compile, `after_compile`, `before_link`, link, `after_link`. Each stage
/// is entered only if the previous one succeeded.
pub fn execute(
    target: &mut BuildTarget,
    configure: impl FnOnce(&mut BuildTarget) -> anyhow::Result<()>,
) -> Result<()> {
    println!(
        "{} Configuring {} {}",
        "⚙".blue(),
        target.kind,
        target.name.bold()
    );
    configure(target).map_err(Error::Config)?;

    println!("Files: {}", target.files);
    println!("Include Directories: {}", target.include_dirs);
    println!("Libraries: {}", target.libraries);
    println!("Library Directories: {}", target.library_dirs);
    println!("Flags: {}", target.flags);

    fire(target, |t| &mut t.before_compile);
    compile(target)?;
    fire(target, |t| &mut t.after_compile);

    fire(target, |t| &mut t.before_link);
    link(target)?;
    fire(target, |t| &mut t.after_link);

    println!(
        "{} Built {} {}",
        "✓".green(),
        target.kind,
        target.name.bold()
    );
    Ok(())
}

/// Configures and builds one target, returning the process exit status.
///
/// This is the whole of a build program's `main`:
///
/// ```no_run
/// use cforge::ProductType;
///
/// fn main() {
///     std::process::exit(cforge::run("app", ProductType::Executable, |t| {
///         t.add_glob("src/*.c")?;
///         t.add_flags(["-Wall", "-Wextra"]);
///         Ok(())
///     }));
/// }
/// ```
pub fn run(
    name: &str,
    kind: ProductType,
    configure: impl FnOnce(&mut BuildTarget) -> anyhow::Result<()>,
) -> i32 {
    let mut target = BuildTarget::new(name, kind);
    match execute(&mut target, configure) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{} {err:#}", "x".red());
            err.exit_code()
        }
    }
}
