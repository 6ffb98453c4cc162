use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct PreprocessedArgs {
    pub cleaned_args: Vec<OsString>,
    pub rc_overrides: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tasktab",
    version,
    about = "Tasks grouped into categories, kept in a local store",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "tasktabrc", global = true)]
    pub tasktabrc: Option<PathBuf>,

    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List categories with their completion.
    Categories,

    /// Add, rename or remove a category.
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Show the tasks of a category, completed last.
    List {
        #[arg(short = 'c', long = "category")]
        category: Option<String>,

        /// Hide completed tasks.
        #[arg(short = 'a', long = "active")]
        active: bool,
    },

    /// Add a task.
    Add {
        #[arg(short = 'c', long = "category")]
        category: Option<String>,

        #[arg(short = 'p', long = "priority")]
        priority: Option<String>,

        #[arg(short = 'd', long = "due")]
        due: Option<String>,

        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Toggle a task between active and completed.
    Done {
        #[arg(short = 'c', long = "category")]
        category: Option<String>,

        task: String,
    },

    /// Delete a task.
    Delete {
        #[arg(short = 'c', long = "category")]
        category: Option<String>,

        task: String,
    },

    /// Change priority, due date or text of a task.
    Edit {
        #[arg(short = 'c', long = "category")]
        category: Option<String>,

        task: String,

        #[arg(short = 'p', long = "priority")]
        priority: Option<String>,

        #[arg(short = 'd', long = "due")]
        due: Option<String>,

        #[arg(short = 't', long = "text")]
        text: Option<String>,
    },

    /// Move a task from one 0-based position to another.
    Move {
        #[arg(short = 'c', long = "category")]
        category: Option<String>,

        from: usize,

        to: usize,
    },

    /// Show or change the stored theme.
    Theme {
        /// `toggle`, `light` or `dark`.
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CategoryCommand {
    Add {
        #[arg(required = true, trailing_var_arg = true)]
        name: Vec<String>,
    },
    Rename {
        selector: String,

        #[arg(required = true, trailing_var_arg = true)]
        name: Vec<String>,
    },
    Remove {
        selector: String,
    },
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Pulls positional `rc.key=value` / `rc.key:value` tokens out of the
/// argument list before clap sees it.
#[tracing::instrument(skip_all)]
pub fn preprocess_args(raw: &[OsString]) -> anyhow::Result<PreprocessedArgs> {
    let mut cleaned = Vec::with_capacity(raw.len());
    let mut overrides: Vec<(String, String)> = Vec::new();

    let mut iter = raw.iter().cloned();
    if let Some(bin) = iter.next() {
        cleaned.push(bin);
    }

    for arg in iter {
        let s = arg.to_string_lossy();
        if let Some(rest) = s.strip_prefix("rc.") {
            let parsed = if let Some((k, v)) = rest.split_once('=') {
                Some((format!("rc.{k}"), v.to_string()))
            } else if let Some((k, v)) = rest.split_once(':') {
                Some((format!("rc.{k}"), v.to_string()))
            } else {
                None
            };

            if let Some((k, v)) = parsed {
                debug!(key = %k, value = %v, "captured positional rc override");
                overrides.push((k, v));
                continue;
            }
        }

        cleaned.push(arg);
    }

    Ok(PreprocessedArgs {
        cleaned_args: cleaned,
        rc_overrides: overrides,
    })
}

/// Maps the `default.command` setting to the command run when none is
/// given on the command line.
pub fn default_command(name: &str) -> anyhow::Result<Command> {
    match name.trim() {
        "list" => Ok(Command::List {
            category: None,
            active: false,
        }),
        "active" => Ok(Command::List {
            category: None,
            active: true,
        }),
        "categories" => Ok(Command::Categories),
        other => Err(anyhow!("unsupported default.command: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn captures_positional_rc_overrides() {
        let pre = preprocess_args(&args(&["tasktab", "rc.color=off", "list", "rc.default.priority:High"]))
            .expect("preprocess");
        assert_eq!(pre.cleaned_args, args(&["tasktab", "list"]));
        assert_eq!(
            pre.rc_overrides,
            vec![
                ("rc.color".to_string(), "off".to_string()),
                ("rc.default.priority".to_string(), "High".to_string()),
            ]
        );
    }

    #[test]
    fn parses_add_with_options() {
        let cli = GlobalCli::parse_from(args(&[
            "tasktab", "add", "-c", "Projects", "-p", "high", "--due", "tomorrow", "Write", "report",
        ]));
        assert_eq!(
            cli.command,
            Some(Command::Add {
                category: Some("Projects".to_string()),
                priority: Some("high".to_string()),
                due: Some("tomorrow".to_string()),
                text: vec!["Write".to_string(), "report".to_string()],
            })
        );
    }

    #[test]
    fn parses_category_rename() {
        let cli = GlobalCli::parse_from(args(&["tasktab", "category", "rename", "1", "Uni", "work"]));
        assert_eq!(
            cli.command,
            Some(Command::Category(CategoryCommand::Rename {
                selector: "1".to_string(),
                name: vec!["Uni".to_string(), "work".to_string()],
            }))
        );
    }

    #[test]
    fn rc_flag_requires_key_value() {
        assert!("color".parse::<KeyVal>().is_err());
        let kv: KeyVal = " color = off ".parse().expect("parse");
        assert_eq!((kv.key.as_str(), kv.value.as_str()), ("color", "off"));
    }

    #[test]
    fn default_command_names() {
        assert_eq!(default_command("categories").expect("categories"), Command::Categories);
        assert!(default_command("report").is_err());
    }
}
