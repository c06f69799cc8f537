use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  trace,
  warn
};

use crate::controller::DEFAULT_NOTIFY_DURATION_MS;
use crate::filter::Filter;

pub const DEFAULT_API_BASE_URL: &str =
  "http://localhost:5000/api";
pub const RC_ENV: &str = "TASKLISTRC";

#[derive(Debug, Clone)]
pub struct Config {
  map: HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    Self::defaults()
  }
}

impl Config {
  pub fn defaults() -> Self {
    let mut cfg = Config {
      map:          HashMap::new(),
      loaded_files: vec![]
    };

    for (key, value) in [
      ("api.base_url", DEFAULT_API_BASE_URL),
      ("notify.duration_ms", "4000"),
      ("default.command", "list"),
      ("default.filter", "all"),
      ("color", "on"),
      ("confirm", "on")
    ] {
      cfg.map.insert(
        key.to_string(),
        value.to_string()
      );
    }

    cfg
  }

  #[tracing::instrument(skip(
    rc_override
  ))]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Self::defaults();

    let rc = resolve_rc_path(rc_override)?;
    if let Some(path) = rc {
      info!(rc = %path.display(), "loading tasklistrc");
      cfg.load_file(&path)?;
    } else {
      warn!(
        "no tasklistrc found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  /// Reads `key = value` lines without
  /// a backing file; `include` lines
  /// are skipped.
  pub fn parse_str(
    &mut self,
    text: &str
  ) -> anyhow::Result<()> {
    self.load_text(text, None)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  pub fn get_bool(
    &self,
    key: &str
  ) -> Option<bool> {
    self
      .map
      .get(key)
      .map(|v| parse_bool(v))
  }

  pub fn get_u64(
    &self,
    key: &str
  ) -> Option<u64> {
    let raw = self.map.get(key)?;
    match raw.trim().parse::<u64>() {
      | Ok(value) => Some(value),
      | Err(err) => {
        warn!(key, value = %raw, error = %err, "ignoring non-numeric config value");
        None
      }
    }
  }

  pub fn api_base_url(&self) -> String {
    self
      .get("api.base_url")
      .map(|url| url.trim().to_string())
      .filter(|url| !url.is_empty())
      .unwrap_or_else(|| {
        DEFAULT_API_BASE_URL.to_string()
      })
  }

  pub fn notify_duration_ms(
    &self
  ) -> u64 {
    self
      .get_u64("notify.duration_ms")
      .unwrap_or(
        DEFAULT_NOTIFY_DURATION_MS
      )
  }

  pub fn default_filter(
    &self
  ) -> anyhow::Result<Filter> {
    let raw = self
      .get("default.filter")
      .unwrap_or_else(|| {
        "all".to_string()
      });
    raw.parse::<Filter>().map_err(
      |err| {
        anyhow!(
          "invalid default.filter: {err}"
        )
      }
    )
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    self
      .loaded_files
      .push(path.clone());

    self.load_text(&text, Some(&path))
  }

  fn load_text(
    &mut self,
    text: &str,
    origin: Option<&Path>
  ) -> anyhow::Result<()> {
    let origin_label = origin
      .map(|p| p.display().to_string())
      .unwrap_or_else(|| {
        "<inline>".to_string()
      });

    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let mut line = raw_line.trim();
      if line.is_empty()
        || line.starts_with('#')
      {
        continue;
      }

      if let Some((before, _)) =
        line.split_once('#')
      {
        line = before.trim();
      }

      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) =
        line.strip_prefix("include ")
      {
        let Some(origin) = origin else {
          warn!(
            line = line_num + 1,
            "include ignored without a \
             backing file"
          );
          continue;
        };
        let base_dir = origin
          .parent()
          .map(|p| p.to_path_buf())
          .unwrap_or_else(|| {
            PathBuf::from(".")
          });
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        debug!(
            file = %origin.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );

        if include_path.exists() {
          self
            .load_file(&include_path)?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            origin_label,
            line_num + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, value = %value, "loaded config key");
      self.map.insert(key, value);
    }

    Ok(())
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_rc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(rc_env) =
    std::env::var(RC_ENV)
  {
    if rc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      rc_env
    )));
  }

  let home = dirs::home_dir()
    .ok_or_else(|| {
      anyhow!(
        "cannot determine home \
         directory"
      )
    })?;
  let candidate =
    home.join(".tasklistrc");
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let raw = PathBuf::from(include);
  let expanded = expand_tilde(&raw);
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

pub fn parse_bool(s: &str) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}

#[cfg(test)]
mod tests {
  use std::fs;
  use std::path::Path;

  use tempfile::tempdir;

  use super::{
    Config,
    DEFAULT_API_BASE_URL,
    parse_bool
  };
  use crate::filter::Filter;

  #[test]
  fn defaults_cover_every_known_key() {
    let cfg = Config::defaults();
    assert_eq!(
      cfg.api_base_url(),
      DEFAULT_API_BASE_URL
    );
    assert_eq!(
      cfg.notify_duration_ms(),
      4000
    );
    assert_eq!(
      cfg.default_filter().ok(),
      Some(Filter::All)
    );
    assert_eq!(
      cfg.get_bool("color"),
      Some(true)
    );
    assert_eq!(
      cfg.get("default.command")
        .as_deref(),
      Some("list")
    );
  }

  #[test]
  fn file_with_comments_and_include() {
    let dir =
      tempdir().expect("tempdir");
    fs::write(
      dir.path().join("extra.rc"),
      "notify.duration_ms = 1500\n"
    )
    .expect("write include");
    let rc = dir.path().join("main.rc");
    fs::write(
      &rc,
      "# tasklist settings\n\
       api.base_url = http://tasks.test/api  # staging\n\
       \n\
       include extra.rc\n\
       include missing.rc\n"
    )
    .expect("write rc");

    let cfg = Config::load(Some(&rc))
      .expect("load config");
    assert_eq!(
      cfg.api_base_url(),
      "http://tasks.test/api"
    );
    assert_eq!(
      cfg.notify_duration_ms(),
      1500
    );
    assert_eq!(cfg.loaded_files.len(), 2);
  }

  #[test]
  fn malformed_line_is_rejected() {
    let dir =
      tempdir().expect("tempdir");
    let rc = dir.path().join("bad.rc");
    fs::write(&rc, "just words\n")
      .expect("write rc");

    let err = Config::load(Some(
      Path::new(&rc)
    ))
    .expect_err("invalid line");
    assert!(
      err
        .to_string()
        .contains("invalid config line")
    );
  }

  #[test]
  fn overrides_strip_rc_prefix() {
    let mut cfg = Config::defaults();
    cfg.apply_overrides(vec![
      (
        "rc.default.filter".to_string(),
        "pending".to_string()
      ),
      (
        "confirm".to_string(),
        "off".to_string()
      ),
    ]);
    assert_eq!(
      cfg.default_filter().ok(),
      Some(Filter::Pending)
    );
    assert_eq!(
      cfg.get_bool("confirm"),
      Some(false)
    );
  }

  #[test]
  fn inline_text_and_bad_numbers() {
    let mut cfg = Config::defaults();
    cfg
      .parse_str(
        "notify.duration_ms = soon\n\
         include other.rc\n\
         api.base_url =\n"
      )
      .expect("parse inline");
    assert_eq!(
      cfg.notify_duration_ms(),
      4000
    );
    assert_eq!(
      cfg.api_base_url(),
      DEFAULT_API_BASE_URL
    );
  }

  #[test]
  fn bool_spellings() {
    for yes in
      ["1", "y", "Yes", " on ", "TRUE"]
    {
      assert!(parse_bool(yes));
    }
    for no in ["0", "off", "no", ""] {
      assert!(!parse_bool(no));
    }
  }
}
