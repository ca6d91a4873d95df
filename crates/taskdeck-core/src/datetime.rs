use std::fmt::{
  self,
  Write as _
};

use anyhow::anyhow;
use chrono::format::{
  Item,
  StrftimeItems
};
use chrono::{
  DateTime,
  Local,
  NaiveDate,
  NaiveDateTime,
  TimeZone,
  Utc
};
use chrono_tz::Tz;
use tracing::{
  trace,
  warn
};

/// Shape of an HTML `datetime-local`
/// input value.
pub const INPUT_FORMAT: &str =
  "%Y-%m-%dT%H:%M";
pub const DEFAULT_DISPLAY_FORMAT: &str =
  "%Y-%m-%d";

const NAIVE_FORMATS: [&str; 4] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%d %H:%M"
];

/// Zone the viewer reads due dates in.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum ViewerZone {
  #[default]
  Local,
  Named(Tz)
}

impl fmt::Display for ViewerZone {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | Self::Local => f.write_str("local"),
      | Self::Named(tz) => {
        f.write_str(tz.name())
      }
    }
  }
}

impl ViewerZone {
  pub fn parse(
    value: &str
  ) -> anyhow::Result<Self> {
    let value = value.trim();
    if value.is_empty()
      || value.eq_ignore_ascii_case(
        "local"
      )
    {
      return Ok(Self::Local);
    }

    value
      .parse::<Tz>()
      .map(Self::Named)
      .map_err(|err| {
        anyhow!(
          "invalid timezone \
           `{value}`: {err}"
        )
      })
  }

  fn localize(
    &self,
    naive: &NaiveDateTime
  ) -> Option<DateTime<Utc>> {
    match self {
      | Self::Local => {
        Local
          .from_local_datetime(naive)
          .earliest()
          .map(|dt| {
            dt.with_timezone(&Utc)
          })
      }
      | Self::Named(tz) => {
        tz.from_local_datetime(naive)
          .earliest()
          .map(|dt| {
            dt.with_timezone(&Utc)
          })
      }
    }
  }

  /// Render `at` in this zone. A pattern
  /// chrono cannot render falls back to
  /// RFC 3339.
  pub fn format(
    &self,
    at: DateTime<Utc>,
    fmt: &str
  ) -> String {
    let mut out = String::new();
    let written = match self {
      | Self::Local => {
        write!(
          out,
          "{}",
          at.with_timezone(&Local)
            .format(fmt)
        )
      }
      | Self::Named(tz) => {
        write!(
          out,
          "{}",
          at.with_timezone(tz).format(fmt)
        )
      }
    };

    if written.is_err() {
      warn!(fmt, "unusable date format; using RFC 3339");
      return at.to_rfc3339();
    }
    out
  }
}

/// Reject strftime patterns chrono cannot
/// render, such as unknown specifiers.
pub fn check_format(
  fmt: &str
) -> anyhow::Result<()> {
  if fmt.trim().is_empty() {
    return Err(anyhow!(
      "date format cannot be empty"
    ));
  }
  if StrftimeItems::new(fmt)
    .any(|item| matches!(item, Item::Error))
  {
    return Err(anyhow!(
      "invalid date format: {fmt}"
    ));
  }
  Ok(())
}

/// Parse a due date as the backend hands
/// it back.
///
/// Offset-carrying timestamps are taken
/// as-is; naive ones are read in `zone`,
/// which is how a `datetime-local` value
/// was meant when it was submitted.
pub fn parse_due(
  raw: &str,
  zone: ViewerZone
) -> Option<DateTime<Utc>> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }

  if let Ok(dt) =
    DateTime::parse_from_rfc3339(raw)
  {
    return Some(dt.with_timezone(&Utc));
  }

  for fmt in NAIVE_FORMATS {
    if let Ok(naive) =
      NaiveDateTime::parse_from_str(
        raw, fmt
      )
    {
      trace!(raw, fmt, "parsed naive due date");
      return zone.localize(&naive);
    }
  }

  if let Ok(date) =
    NaiveDate::parse_from_str(
      raw, "%Y-%m-%d"
    )
  {
    return date
      .and_hms_opt(0, 0, 0)
      .and_then(|naive| {
        zone.localize(&naive)
      });
  }

  None
}

/// Convert a stored due date into the
/// editor's `YYYY-MM-DDTHH:MM` value in
/// the viewer's zone.
///
/// Returns an empty string when the
/// stored value cannot be read.
pub fn to_input_value(
  raw: &str,
  zone: ViewerZone
) -> String {
  match parse_due(raw, zone) {
    | Some(at) => {
      zone.format(at, INPUT_FORMAT)
    }
    | None => {
      warn!(raw, "unreadable due date; leaving editor field empty");
      String::new()
    }
  }
}

/// Human label for a due date; text that
/// does not parse is shown verbatim.
pub fn display_due(
  raw: &str,
  zone: ViewerZone,
  fmt: &str
) -> String {
  match parse_due(raw, zone) {
    | Some(at) => zone.format(at, fmt),
    | None => raw.trim().to_string()
  }
}

/// Normalize free-form user input into
/// the `datetime-local` shape the
/// browser form submits.
pub fn normalize_input(
  raw: &str,
  zone: ViewerZone
) -> Option<String> {
  parse_due(raw, zone).map(|at| {
    zone.format(at, INPUT_FORMAT)
  })
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn mexico() -> ViewerZone {
    ViewerZone::parse(
      "America/Mexico_City"
    )
    .expect("valid zone")
  }

  #[test]
  fn naive_values_are_read_in_viewer_zone()
  {
    let parsed = parse_due(
      "2026-02-16T09:30",
      mexico()
    )
    .expect("parse naive");
    assert_eq!(
      parsed,
      Utc
        .with_ymd_and_hms(
          2026, 2, 16, 15, 30, 0
        )
        .single()
        .expect("valid instant")
    );
  }

  #[test]
  fn rfc3339_keeps_its_offset() {
    let parsed = parse_due(
      "2026-02-16T09:30:00Z",
      mexico()
    )
    .expect("parse rfc3339");
    assert_eq!(
      to_input_value(
        "2026-02-16T09:30:00Z",
        mexico()
      ),
      "2026-02-16T03:30"
    );
    assert_eq!(
      parsed.to_rfc3339(),
      "2026-02-16T09:30:00+00:00"
    );
  }

  #[test]
  fn sqlite_and_date_only_shapes_parse() {
    let utc = ViewerZone::Named(
      chrono_tz::UTC
    );
    assert!(
      parse_due(
        "2026-02-16 05:00:00",
        utc
      )
      .is_some()
    );
    assert_eq!(
      display_due(
        "2026-02-16",
        utc,
        DEFAULT_DISPLAY_FORMAT
      ),
      "2026-02-16"
    );
  }

  #[test]
  fn unreadable_values_fall_back() {
    let utc = ViewerZone::Named(
      chrono_tz::UTC
    );
    assert!(
      parse_due("next tuesday", utc)
        .is_none()
    );
    assert_eq!(
      display_due(
        "next tuesday",
        utc,
        DEFAULT_DISPLAY_FORMAT
      ),
      "next tuesday"
    );
    assert_eq!(
      to_input_value("soon", utc),
      ""
    );
  }

  #[test]
  fn zone_parsing() {
    assert_eq!(
      ViewerZone::parse("local")
        .expect("local"),
      ViewerZone::Local
    );
    assert!(
      ViewerZone::parse("Mars/Olympus")
        .is_err()
    );
    assert_eq!(
      mexico().to_string(),
      "America/Mexico_City"
    );
  }

  #[test]
  fn normalize_input_produces_form_shape()
  {
    let utc = ViewerZone::Named(
      chrono_tz::UTC
    );
    assert_eq!(
      normalize_input(
        "2026-03-01 14:05",
        utc
      )
      .as_deref(),
      Some("2026-03-01T14:05")
    );
    assert_eq!(
      normalize_input("tomorrow", utc),
      None
    );
  }

  #[test]
  fn unknown_format_specifiers_are_rejected()
  {
    assert!(check_format("%d/%m/%Y %H:%M").is_ok());
    assert!(check_format("%Q").is_err());
    assert!(check_format("   ").is_err());

    let at = parse_due(
      "2026-02-16T09:30:00Z",
      mexico()
    )
    .expect("parse rfc3339");
    assert_eq!(
      ViewerZone::Named(chrono_tz::UTC)
        .format(at, "%Q"),
      "2026-02-16T09:30:00+00:00"
    );
  }
}
