//! Main orchestration logic.

use crate::cli::Args;
use crate::config::resolve_options;
use crate::error::CliError;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use macro_engine::MacroEngine;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use styletakeout::StyleTakeout;
use walkdir::WalkDir;

/// Module extensions picked up when walking directories.
pub const EXTENSIONS: [&str; 8] = ["js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx"];

/// What one run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub replacements: usize,
    pub stylesheet: Utf8PathBuf,
}

/// A transformed module waiting to be written.
struct Transformed {
    path: Utf8PathBuf,
    code: String,
}

/// Transforms every input module, then writes the modules and the
/// stylesheet.
///
/// Nothing is written unless every module transforms successfully.
pub fn run(args: &Args, cwd: &Utf8Path) -> Result<Summary, CliError> {
    let options = resolve_options(args, cwd)?;
    let stylesheet = options.output_file.clone();
    let plugin = StyleTakeout::new(options)?;

    let ignore = build_ignore_set(&args.ignore)?;
    let out_dir = args.out_dir.as_ref().map(|dir| absolute(cwd, dir));
    let files = discover_files(&args.inputs, cwd, &ignore, out_dir.as_deref())?;
    tracing::debug!(count = files.len(), "discovered modules");

    let mut engine = MacroEngine::new(vec![Box::new(plugin)]);
    let mut replacements = 0;
    let mut transformed = Vec::with_capacity(files.len());
    for path in files {
        let code = fs::read_to_string(&path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        })?;
        let name = display_path(cwd, &path);
        let out = engine
            .replace_macros(name.as_str(), &code)
            .map_err(|err| CliError::transform(&name, &code, err))?;
        tracing::debug!(file = %name, replacements = out.replacements, "transformed");
        replacements += out.replacements;
        transformed.push(Transformed {
            path,
            code: out.code,
        });
    }

    match &out_dir {
        Some(dir) => write_modules(&transformed, cwd, dir)?,
        None => print_modules(&transformed, cwd)?,
    }
    engine
        .finish()
        .map_err(|source| CliError::Finish { source })?;

    Ok(Summary {
        files: transformed.len(),
        replacements,
        stylesheet,
    })
}

fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, CliError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns
        .iter()
        .map(String::as_str)
        .chain(["**/node_modules/**"])
    {
        let glob = Glob::new(pattern).map_err(|source| CliError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| CliError::InvalidGlob {
        pattern: patterns.join(", "),
        source,
    })
}

/// Expands inputs into a sorted, deduplicated list of module paths.
///
/// Files named directly are always included; directories are walked for
/// known extensions. Ignore globs match paths relative to `cwd`.
fn discover_files(
    inputs: &[Utf8PathBuf],
    cwd: &Utf8Path,
    ignore: &GlobSet,
    out_dir: Option<&Utf8Path>,
) -> Result<Vec<Utf8PathBuf>, CliError> {
    let mut files = Vec::new();
    for input in inputs {
        let input = absolute(cwd, input);
        if !input.is_dir() {
            files.push(input);
            continue;
        }
        for entry in WalkDir::new(&input).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = Utf8PathBuf::from_path_buf(entry.into_path())
                .map_err(|path| CliError::NonUtf8Path { path })?;
            let known = path
                .extension()
                .is_some_and(|ext| EXTENSIONS.contains(&ext));
            let in_out_dir = out_dir.is_some_and(|dir| path.starts_with(dir));
            if !known || in_out_dir || ignore.is_match(display_path(cwd, &path).as_str()) {
                continue;
            }
            files.push(path);
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Computes the output path of every module, rejecting two modules that
/// would land on the same file.
fn output_targets(
    modules: &[Transformed],
    cwd: &Utf8Path,
    out_dir: &Utf8Path,
) -> Result<Vec<Utf8PathBuf>, CliError> {
    let mut claimed: HashMap<Utf8PathBuf, &Utf8Path> = HashMap::with_capacity(modules.len());
    let mut targets = Vec::with_capacity(modules.len());
    for module in modules {
        let target = out_dir.join(mirrored_path(cwd, &module.path));
        if let Some(first) = claimed.insert(target.clone(), &module.path) {
            return Err(CliError::OutputCollision {
                target,
                first: first.to_owned(),
                second: module.path.clone(),
            });
        }
        targets.push(target);
    }
    Ok(targets)
}

fn write_modules(
    modules: &[Transformed],
    cwd: &Utf8Path,
    out_dir: &Utf8Path,
) -> Result<(), CliError> {
    let targets = output_targets(modules, cwd, out_dir)?;
    for (module, target) in modules.iter().zip(targets) {
        let write_err = |source| CliError::Write {
            path: target.clone(),
            source,
        };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&target, &module.code).map_err(write_err)?;
        tracing::debug!(path = %target, "wrote module");
    }
    Ok(())
}

fn print_modules(modules: &[Transformed], cwd: &Utf8Path) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let write_err = |source| CliError::Write {
        path: Utf8PathBuf::from("<stdout>"),
        source,
    };
    for module in modules {
        if modules.len() > 1 {
            writeln!(stdout, "// {}", display_path(cwd, &module.path)).map_err(write_err)?;
        }
        stdout
            .write_all(module.code.as_bytes())
            .map_err(write_err)?;
        if !module.code.ends_with('\n') {
            writeln!(stdout).map_err(write_err)?;
        }
    }
    stdout.flush().map_err(write_err)
}

fn absolute(cwd: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_owned()
    } else {
        cwd.join(path)
    }
}

/// The path relative to `cwd` when it lies inside it.
fn display_path(cwd: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    path.strip_prefix(cwd).unwrap_or(path).to_owned()
}

/// Where a module lands below the output directory: its path relative to
/// `cwd`, or just its file name when it lies outside.
fn mirrored_path(cwd: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    match path.strip_prefix(cwd) {
        Ok(relative) => relative.to_owned(),
        Err(_) => Utf8PathBuf::from(path.file_name().unwrap_or("module.js")),
    }
}
