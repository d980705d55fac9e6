//! Configuration loading.

use crate::cli::Args;
use crate::error::CliError;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use styletakeout::PluginOptions;

/// Configuration file looked up in the working directory when `--config` is
/// not given.
pub const DEFAULT_CONFIG_FILE: &str = "styletakeout.config.json";

/// The on-disk configuration. Comments are allowed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    /// Stylesheet path, relative to the configuration file.
    pub output_file: Option<Utf8PathBuf>,
    /// Static objects importable from the macro.
    #[serde(default)]
    pub import_objects: IndexMap<String, serde_json::Value>,
}

impl ConfigFile {
    /// Reads and parses a configuration file.
    pub fn load(path: &Utf8Path) -> Result<Self, CliError> {
        let content = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_owned(),
            source,
        })?;
        let mut config: Self = serde_json::from_str(&strip_json_comments(&content)).map_err(
            |source| CliError::ConfigParse {
                path: path.to_owned(),
                source,
            },
        )?;

        let base = path.parent().unwrap_or(Utf8Path::new(""));
        if let Some(output_file) = config.output_file.take() {
            config.output_file = Some(absolutize(base, output_file));
        }
        Ok(config)
    }
}

/// Builds the plugin options for a run from the command line and the
/// configuration file.
///
/// An explicit `--config` must exist; the default file is optional.
/// `--output-file` resolves against `cwd` and wins over the configured path.
pub fn resolve_options(args: &Args, cwd: &Utf8Path) -> Result<PluginOptions, CliError> {
    let config = match &args.config {
        Some(path) => ConfigFile::load(&absolutize(cwd, path.clone()))?,
        None => {
            let default = cwd.join(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                ConfigFile::load(&default)?
            } else {
                tracing::debug!(path = %default, "no config file");
                ConfigFile::default()
            }
        }
    };

    let output_file = match &args.output_file {
        Some(path) => absolutize(cwd, path.clone()),
        None => config.output_file.ok_or(CliError::MissingOutputFile)?,
    };

    Ok(PluginOptions {
        output_file,
        import_objects: config.import_objects,
    })
}

fn absolutize(base: &Utf8Path, path: Utf8PathBuf) -> Utf8PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Removes `//` and `/* */` comments outside of strings.
fn strip_json_comments(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '"' => in_string = false,
                '\\' => out.extend(chars.next()),
                _ => {}
            }
            continue;
        }
        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                while chars.next_if(|&next| next != '\n').is_some() {}
            }
            ('/', Some('*')) => {
                chars.next();
                while let Some(next) = chars.next() {
                    if next == '*' && chars.next_if_eq(&'/').is_some() {
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}
