use std::{
    convert::Infallible,
    fs::File,
    io::{self, Write as _},
    path::PathBuf,
    str::FromStr,
};

use anyhow::Context as _;
use serde::Serialize;

/// Argument wrapper whose parse never fails: an unparseable value is
/// kept as raw text and resolved to the documented default with a
/// warning on stderr, instead of aborting with a usage error.
#[derive(Debug, Clone)]
pub(crate) enum Lenient<T> {
    Valid(T),
    Invalid(String),
}

impl<T: FromStr> FromStr for Lenient<T> {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse()
            .map_or_else(|_| Self::Invalid(s.to_owned()), Self::Valid))
    }
}

impl<T> Lenient<T> {
    /// The parsed value, or `default()` after warning about the raw text.
    pub(crate) fn resolve_with(self, name: &str, default: impl FnOnce() -> T) -> T {
        match self {
            Self::Valid(value) => value,
            Self::Invalid(raw) => {
                eprintln!("warning: invalid value {raw:?} for --{name}; using default");
                default()
            }
        }
    }

    pub(crate) fn resolve(self, name: &str, default: T) -> T {
        self.resolve_with(name, || default)
    }
}

/// Resolves an optional board dimension against its variant default.
pub(crate) fn resolve_dim(arg: Option<&Lenient<usize>>, name: &str, default: usize) -> usize {
    arg.map_or(default, |value| value.clone().resolve(name, default))
}

/// Destination for command output: stdout, or a file given with
/// `--output`.
#[derive(Debug, Clone)]
pub(crate) enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    pub(crate) fn from_arg(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }

    pub(crate) fn save_json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        match self {
            Self::Stdout => {
                let stdout = io::stdout().lock();
                serde_json::to_writer_pretty(stdout, value).context("failed to write JSON")?;
                println!();
            }
            Self::File(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                serde_json::to_writer_pretty(file, value)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
        Ok(())
    }

    pub(crate) fn save_text(&self, text: &str) -> anyhow::Result<()> {
        match self {
            Self::Stdout => {
                print!("{text}");
                io::stdout().flush().context("failed to write stdout")?;
            }
            Self::File(path) => {
                let mut file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                file.write_all(text.as_bytes())
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
        Ok(())
    }
}
