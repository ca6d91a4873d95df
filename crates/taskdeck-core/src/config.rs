use std::collections::HashMap;
#[cfg(feature = "native")]
use std::fs;
use std::path::PathBuf;
#[cfg(feature = "native")]
use std::path::Path;

use anyhow::anyhow;
#[cfg(feature = "native")]
use anyhow::Context;
use chrono::Duration;
use tracing::debug;
#[cfg(feature = "native")]
use tracing::{
  info,
  trace,
  warn
};

use crate::api::DEFAULT_BASE_URL;
use crate::datetime::{
  DEFAULT_DISPLAY_FORMAT,
  ViewerZone
};
use crate::notify::DEFAULT_TOAST_TTL_SECS;

pub const KEY_BASE_URL: &str =
  "api.base_url";
pub const KEY_DATE_FORMAT: &str =
  "date.format";
pub const KEY_TIMEZONE: &str = "timezone";
pub const KEY_TOAST_TTL: &str =
  "toast.ttl";
pub const KEY_COLOR: &str = "color";

#[cfg(feature = "native")]
const RC_ENV_VAR: &str = "TASKDECKRC";
#[cfg(feature = "native")]
const RC_FILE_NAME: &str =
  ".taskdeckrc";

#[derive(Debug, Clone)]
pub struct Config {
  map:              HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    Self::defaults()
  }
}

impl Config {
  /// Built-in values only; nothing is
  /// read from disk.
  pub fn defaults() -> Self {
    let mut cfg = Config {
      map:          HashMap::new(),
      loaded_files: vec![]
    };

    cfg.map.insert(
      KEY_BASE_URL.to_string(),
      DEFAULT_BASE_URL.to_string()
    );
    cfg.map.insert(
      KEY_DATE_FORMAT.to_string(),
      DEFAULT_DISPLAY_FORMAT.to_string()
    );
    cfg.map.insert(
      KEY_TIMEZONE.to_string(),
      "local".to_string()
    );
    cfg.map.insert(
      KEY_TOAST_TTL.to_string(),
      DEFAULT_TOAST_TTL_SECS.to_string()
    );
    cfg.map.insert(
      KEY_COLOR.to_string(),
      "on".to_string()
    );

    cfg
  }

  #[cfg(feature = "native")]
  #[tracing::instrument(skip(
    rc_override
  ))]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Self::defaults();

    let rc = resolve_rc_path(rc_override)?;
    if let Some(path) = rc {
      info!(rc = %path.display(), "loading taskdeckrc");
      cfg.load_file(&path)?;
    } else {
      debug!(
        "no taskdeckrc found; using \
         defaults"
      );
    }

    Ok(cfg)
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

  pub fn iter(
    &self
  ) -> impl Iterator<Item = (&String, &String)>
  {
    self.map.iter()
  }

  pub fn base_url(&self) -> String {
    self
      .get(KEY_BASE_URL)
      .filter(|url| !url.trim().is_empty())
      .unwrap_or_else(|| {
        DEFAULT_BASE_URL.to_string()
      })
  }

  pub fn date_format(&self) -> String {
    self
      .get(KEY_DATE_FORMAT)
      .unwrap_or_else(|| {
        DEFAULT_DISPLAY_FORMAT.to_string()
      })
  }

  pub fn zone(
    &self
  ) -> anyhow::Result<ViewerZone> {
    match self.get(KEY_TIMEZONE) {
      | Some(value) => {
        ViewerZone::parse(&value)
      }
      | None => Ok(ViewerZone::Local)
    }
  }

  pub fn toast_ttl(
    &self
  ) -> anyhow::Result<Duration> {
    let Some(raw) = self.get(KEY_TOAST_TTL)
    else {
      return Ok(Duration::seconds(
        DEFAULT_TOAST_TTL_SECS
      ));
    };

    raw
      .trim()
      .parse::<i64>()
      .ok()
      .filter(|secs| *secs > 0)
      .and_then(Duration::try_seconds)
      .ok_or_else(|| {
        anyhow!(
          "invalid {KEY_TOAST_TTL} \
           setting: {raw}"
        )
      })
  }

  pub fn color(
    &self
  ) -> anyhow::Result<bool> {
    let raw = self
      .get(KEY_COLOR)
      .unwrap_or_else(|| "on".to_string());
    match raw
      .trim()
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
          "invalid color setting: \
           {other}"
        ))
      }
    }
  }

  #[cfg(feature = "native")]
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

    let base_dir = path
      .parent()
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|| {
        PathBuf::from(".")
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
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        if self
          .loaded_files
          .contains(&include_path)
        {
          warn!(include = %include_path.display(), "include already loaded; skipping");
          continue;
        }
        debug!(
            file = %path.display(),
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
            path.display(),
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

#[cfg(feature = "native")]
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
    std::env::var(RC_ENV_VAR)
  {
    if rc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      rc_env
    )));
  }

  let Some(home) = dirs::home_dir() else {
    warn!(
      "cannot determine home \
       directory; skipping \
       taskdeckrc lookup"
    );
    return Ok(None);
  };
  let candidate = home.join(RC_FILE_NAME);
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

#[cfg(feature = "native")]
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

#[cfg(feature = "native")]
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

fn parse_bool(s: &str) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}

#[cfg(all(test, feature = "native"))]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn rc_file_with_include_and_overrides() {
    let dir = tempdir().expect("tempdir");
    let extra = dir.path().join("extra.rc");
    fs::write(
      &extra,
      "timezone = America/Mexico_City\n"
    )
    .expect("write include");

    let main = dir.path().join("main.rc");
    fs::write(
      &main,
      "# taskdeck settings\n\
       api.base_url = http://tasks.local/api  # comment\n\
       include extra.rc\n\
       toast.ttl = 8\n"
    )
    .expect("write rc");

    let mut cfg = Config::load(Some(&main))
      .expect("load config");
    assert_eq!(cfg.loaded_files.len(), 2);
    assert_eq!(
      cfg.base_url(),
      "http://tasks.local/api"
    );
    assert_eq!(
      cfg.zone().expect("zone").to_string(),
      "America/Mexico_City"
    );
    assert_eq!(
      cfg.toast_ttl().expect("ttl"),
      Duration::seconds(8)
    );

    cfg.apply_overrides(vec![(
      "rc.color".to_string(),
      "off".to_string()
    )]);
    assert!(!cfg.color().expect("color"));
    assert_eq!(
      cfg.get_bool(KEY_COLOR),
      Some(false)
    );
  }

  #[test]
  fn malformed_line_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let rc = dir.path().join("bad.rc");
    fs::write(&rc, "just some words\n")
      .expect("write rc");
    let err = Config::load(Some(&rc))
      .expect_err("malformed");
    assert!(
      err
        .to_string()
        .contains("invalid config line")
    );
  }

  #[test]
  fn defaults_and_bad_values() {
    let mut cfg = Config::defaults();
    assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
    assert_eq!(cfg.date_format(), "%Y-%m-%d");
    assert_eq!(
      cfg.zone().expect("zone"),
      ViewerZone::Local
    );

    cfg.apply_overrides(vec![
      ("toast.ttl".to_string(), "0".to_string()),
      ("color".to_string(), "purple".to_string()),
    ]);
    assert!(cfg.toast_ttl().is_err());
    assert!(cfg.color().is_err());

    cfg.apply_overrides(vec![(
      "rc.toast.ttl".to_string(),
      "99999999999999999".to_string()
    )]);
    assert!(cfg.toast_ttl().is_err());
  }
}
