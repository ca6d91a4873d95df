use chrono::{
  DateTime,
  Duration,
  Utc
};
use tracing::debug;

pub const DEFAULT_TOAST_TTL_SECS: i64 = 5;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ToastKind {
  Success,
  Error,
  Warning,
  Info
}

impl ToastKind {
  /// Icon-font glyph name.
  pub fn icon(&self) -> &'static str {
    match self {
      | ToastKind::Success => {
        "check-circle"
      }
      | ToastKind::Error => {
        "exclamation-circle"
      }
      | ToastKind::Warning => {
        "exclamation-triangle"
      }
      | ToastKind::Info => "info-circle"
    }
  }

  pub fn css_class(
    &self
  ) -> &'static str {
    match self {
      | ToastKind::Success => {
        "toast toast-success"
      }
      | ToastKind::Error => {
        "toast toast-error"
      }
      | ToastKind::Warning => {
        "toast toast-warning"
      }
      | ToastKind::Info => "toast toast-info"
    }
  }

  pub fn marker(&self) -> &'static str {
    match self {
      | ToastKind::Success => "ok",
      | ToastKind::Error => "error",
      | ToastKind::Warning => "warning",
      | ToastKind::Info => "info"
    }
  }

  pub fn ansi_code(
    &self
  ) -> &'static str {
    match self {
      | ToastKind::Success => "32",
      | ToastKind::Error => "31",
      | ToastKind::Warning => "33",
      | ToastKind::Info => "36"
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
  pub id:        u64,
  pub kind:      ToastKind,
  pub message:   String,
  pub raised_at: DateTime<Utc>
}

/// Transient user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notifier {
  toasts:  Vec<Toast>,
  next_id: u64,
  ttl:     Duration
}

impl Default for Notifier {
  fn default() -> Self {
    Self::new(Duration::seconds(
      DEFAULT_TOAST_TTL_SECS
    ))
  }
}

impl Notifier {
  pub fn new(ttl: Duration) -> Self {
    Self {
      toasts: vec![],
      next_id: 1,
      ttl
    }
  }

  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  pub fn push(
    &mut self,
    kind: ToastKind,
    message: impl Into<String>,
    now: DateTime<Utc>
  ) -> u64 {
    let id = self.next_id;
    self.next_id += 1;
    let message = message.into();
    debug!(id, ?kind, message = %message, "toast raised");
    self.toasts.push(Toast {
      id,
      kind,
      message,
      raised_at: now
    });
    id
  }

  pub fn dismiss(&mut self, id: u64) -> bool {
    let before = self.toasts.len();
    self
      .toasts
      .retain(|toast| toast.id != id);
    before != self.toasts.len()
  }

  /// Toasts still within their lifetime at
  /// `now`.
  pub fn active(
    &self,
    now: DateTime<Utc>
  ) -> impl Iterator<Item = &Toast> {
    let ttl = self.ttl;
    self
      .toasts
      .iter()
      .filter(move |toast| {
        now - toast.raised_at < ttl
      })
  }

  /// Drop expired toasts; returns how many
  /// went.
  pub fn prune(
    &mut self,
    now: DateTime<Utc>
  ) -> usize {
    let before = self.toasts.len();
    let ttl = self.ttl;
    self.toasts.retain(|toast| {
      now - toast.raised_at < ttl
    });
    before - self.toasts.len()
  }

  pub fn all(&self) -> &[Toast] {
    &self.toasts
  }

  pub fn drain(&mut self) -> Vec<Toast> {
    std::mem::take(&mut self.toasts)
  }

  /// Re-raise here the toasts `after`
  /// gained since it was copied from
  /// `before`; returns how many.
  pub fn absorb(
    &mut self,
    before: &Notifier,
    after: Notifier
  ) -> usize {
    let fresh: Vec<Toast> = after
      .toasts
      .into_iter()
      .filter(|toast| {
        toast.id >= before.next_id
      })
      .collect();
    let count = fresh.len();
    for toast in fresh {
      self.push(
        toast.kind,
        toast.message,
        toast.raised_at
      );
    }
    count
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn at(secs: i64) -> DateTime<Utc> {
    Utc
      .with_ymd_and_hms(
        2026, 2, 16, 12, 0, 0
      )
      .single()
      .expect("valid instant")
      + Duration::seconds(secs)
  }

  #[test]
  fn toasts_expire_after_ttl() {
    let mut notifier = Notifier::default();
    notifier.push(
      ToastKind::Success,
      "Task created successfully!",
      at(0)
    );
    notifier.push(
      ToastKind::Error,
      "Request failed",
      at(3)
    );

    assert_eq!(notifier.active(at(4)).count(), 2);
    assert_eq!(notifier.active(at(5)).count(), 1);
    assert_eq!(notifier.prune(at(8)), 2);
    assert!(notifier.all().is_empty());
  }

  #[test]
  fn absorb_takes_only_new_toasts() {
    let mut local = Notifier::default();
    let old = local.push(
      ToastKind::Info,
      "old",
      at(0)
    );
    let before = local.clone();

    let mut after = before.clone();
    after.push(
      ToastKind::Error,
      "Request failed",
      at(1)
    );
    local.dismiss(old);

    assert_eq!(
      local.absorb(&before, after),
      1
    );
    let messages: Vec<&str> = local
      .all()
      .iter()
      .map(|t| t.message.as_str())
      .collect();
    assert_eq!(messages, vec!["Request failed"]);
    assert_eq!(local.all()[0].raised_at, at(1));
  }

  #[test]
  fn dismiss_removes_only_the_target() {
    let mut notifier = Notifier::default();
    let first = notifier.push(
      ToastKind::Info,
      "one",
      at(0)
    );
    let second = notifier.push(
      ToastKind::Warning,
      "two",
      at(0)
    );
    assert!(second > first);

    assert!(notifier.dismiss(first));
    assert!(!notifier.dismiss(first));
    assert_eq!(
      notifier.all().last().map(|t| t.id),
      Some(second)
    );
  }

  #[test]
  fn kinds_map_to_icons() {
    assert_eq!(
      ToastKind::Success.icon(),
      "check-circle"
    );
    assert_eq!(
      ToastKind::Error.icon(),
      "exclamation-circle"
    );
    assert_eq!(
      ToastKind::Warning.icon(),
      "exclamation-triangle"
    );
    assert_eq!(
      ToastKind::Info.icon(),
      "info-circle"
    );
  }
}
