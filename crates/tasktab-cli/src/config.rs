use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow,
  bail
};
use tasktab_core::Priority;
use tracing::{
  debug,
  info,
  trace,
  warn
};

use crate::cli::default_command;

const RC_ENV_VAR: &str = "TASKTABRC";
const RC_FILE_NAME: &str = ".tasktabrc";
const DEFAULT_DATA_DIR: &str =
  ".tasktab";

/// Settings read from `~/.tasktabrc`
/// and `--rc` overrides.
#[derive(Debug, Clone)]
pub struct Config {
  /// `data.location`; the home
  /// default when unset.
  pub data_location:    Option<PathBuf>,
  pub color:            bool,
  pub default_priority: Priority,
  pub default_command:  String,
  pub loaded_files:     Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    Self {
      data_location:    None,
      color:            true,
      default_priority:
        Priority::default(),
      default_command:  "list"
        .to_string(),
      loaded_files:     vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    rc_override
  ))]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Self::default();
    match rc_path(rc_override) {
      | Some(path) => {
        info!(rc = %path.display(), "loading rc file");
        cfg.read_rc(&path)?;
      }
      | None => {
        debug!("no rc file; defaults only")
      }
    }
    Ok(cfg)
  }

  /// Applies `key=value` pairs from
  /// the command line; an `rc.`
  /// prefix is optional.
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (key, value) in overrides {
      let key = key
        .strip_prefix("rc.")
        .unwrap_or(&key);
      self.set(key, &value).with_context(
        || format!("invalid override {key}={value}")
      )?;
    }
    Ok(())
  }

  /// Stores one setting. Unknown keys
  /// are logged and skipped.
  pub fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    trace!(key, value, "config setting");
    match key {
      | "data.location" => {
        self.data_location =
          Some(expand_home(value));
      }
      | "color" => {
        self.color = parse_switch(value)?;
      }
      | "default.priority" => {
        self.default_priority = value
          .parse::<Priority>()
          .context(
            "invalid default.priority"
          )?;
      }
      | "default.command" => {
        default_command(value)?;
        self.default_command =
          value.to_ascii_lowercase();
      }
      | other => {
        warn!(key = other, "ignoring unknown config key")
      }
    }
    Ok(())
  }

  /// Resolves the data directory and
  /// creates it when missing.
  pub fn data_dir(
    &self,
    override_dir: Option<&Path>
  ) -> anyhow::Result<PathBuf> {
    let dir = match (
      override_dir,
      &self.data_location
    ) {
      | (Some(dir), _) => {
        dir.to_path_buf()
      }
      | (None, Some(dir)) => dir.clone(),
      | (None, None) => {
        dirs::home_dir()
          .map(|home| {
            home.join(DEFAULT_DATA_DIR)
          })
          .context(
            "cannot determine home \
             directory"
          )?
      }
    };

    fs::create_dir_all(&dir)
      .with_context(|| {
        format!(
          "failed to create {}",
          dir.display()
        )
      })?;
    debug!(dir = %dir.display(), "data directory ready");
    Ok(dir)
  }

  fn read_rc(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = fs::canonicalize(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    if self.loaded_files.contains(&path)
    {
      warn!(rc = %path.display(), "rc file already loaded; skipping");
      return Ok(());
    }
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;
    self.loaded_files.push(path.clone());

    let dir = path
      .parent()
      .unwrap_or(Path::new("."));
    for (idx, raw) in
      text.lines().enumerate()
    {
      let line = raw
        .split('#')
        .next()
        .unwrap_or_default()
        .trim();
      let at = || {
        format!(
          "{}:{}",
          path.display(),
          idx + 1
        )
      };

      if line.is_empty() {
        continue;
      }
      if let Some(target) =
        line.strip_prefix("include ")
      {
        self.include(dir, target.trim())
          .with_context(at)?;
        continue;
      }

      let Some((key, value)) =
        line.split_once('=')
      else {
        bail!(
          "{}: expected key = value, \
           got {raw:?}",
          at()
        );
      };
      self
        .set(key.trim(), value.trim())
        .with_context(at)?;
    }
    Ok(())
  }

  fn include(
    &mut self,
    dir: &Path,
    target: &str
  ) -> anyhow::Result<()> {
    if target.is_empty() {
      return Err(anyhow!(
        "include needs a path"
      ));
    }
    let path = dir.join(
      expand_home(target)
    );
    if !path.exists() {
      warn!(include = %path.display(), "include not found; skipping");
      return Ok(());
    }
    self.read_rc(&path)
  }
}

fn rc_path(
  rc_override: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = rc_override {
    return Some(path.to_path_buf());
  }
  match std::env::var_os(RC_ENV_VAR) {
    | Some(value)
      if Path::new(&value)
        == Path::new("/dev/null") =>
    {
      None
    }
    | Some(value) => {
      Some(PathBuf::from(value))
    }
    | None => {
      dirs::home_dir()
        .map(|home| {
          home.join(RC_FILE_NAME)
        })
        .filter(|path| path.is_file())
    }
  }
}

fn parse_switch(
  value: &str
) -> anyhow::Result<bool> {
  match value
    .to_ascii_lowercase()
    .as_str()
  {
    | "on" | "yes" | "true" | "1" => {
      Ok(true)
    }
    | "off" | "no" | "false" | "0" => {
      Ok(false)
    }
    | other => {
      Err(anyhow!(
        "expected on/off, got {other}"
      ))
    }
  }
}

/// Expands a leading `~` to the home
/// directory.
fn expand_home(raw: &str) -> PathBuf {
  let Some(home) = dirs::home_dir()
  else {
    return PathBuf::from(raw);
  };
  if raw == "~" {
    return home;
  }
  raw.strip_prefix("~/").map_or_else(
    || PathBuf::from(raw),
    |rest| home.join(rest)
  )
}
