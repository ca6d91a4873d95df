//! The task API seam.
//!
//! [`TaskApi`] is what the session talks to. Every transport funnels its
//! raw `(status, body)` pair through [`decode_data`] / [`decode_empty`],
//! so a failure looks the same whether it came from `reqwest` or the
//! browser's `fetch`.

#[cfg(feature = "native")]
mod http;

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use taskdeck_shared::{
  Envelope,
  Stats,
  Task,
  TaskCreate,
  TaskId,
  TaskPatch
};
use tracing::debug;

#[cfg(feature = "native")]
pub use self::http::HttpTaskApi;
use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str =
  "http://localhost:5000/api";

const GENERIC_FAILURE: &str =
  "Request failed";

/// Operations the client needs from the
/// backend.
///
/// Futures are awaited one at a time on a
/// single thread, so implementations are
/// free to hold `!Send` state.
#[allow(async_fn_in_trait)]
pub trait TaskApi {
  async fn list_tasks(
    &self
  ) -> Result<Vec<Task>, ClientError>;

  async fn get_task(
    &self,
    id: TaskId
  ) -> Result<Task, ClientError>;

  async fn list_categories(
    &self
  ) -> Result<Vec<String>, ClientError>;

  async fn stats(
    &self
  ) -> Result<Stats, ClientError>;

  async fn create_task(
    &self,
    create: &TaskCreate
  ) -> Result<Task, ClientError>;

  async fn update_task(
    &self,
    id: TaskId,
    patch: &TaskPatch
  ) -> Result<Task, ClientError>;

  async fn delete_task(
    &self,
    id: TaskId
  ) -> Result<(), ClientError>;
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Method {
  Get,
  Post,
  Put,
  Delete
}

impl Method {
  pub fn as_str(&self) -> &'static str {
    match self {
      | Method::Get => "GET",
      | Method::Post => "POST",
      | Method::Put => "PUT",
      | Method::Delete => "DELETE"
    }
  }
}

impl fmt::Display for Method {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
  pub method: Method,
  pub path:   String
}

impl Endpoint {
  pub fn list_tasks() -> Self {
    Self::new(Method::Get, "/tasks")
  }

  pub fn get_task(id: TaskId) -> Self {
    Self::new(
      Method::Get,
      format!("/tasks/{id}")
    )
  }

  pub fn create_task() -> Self {
    Self::new(Method::Post, "/tasks")
  }

  pub fn update_task(id: TaskId) -> Self {
    Self::new(
      Method::Put,
      format!("/tasks/{id}")
    )
  }

  pub fn delete_task(id: TaskId) -> Self {
    Self::new(
      Method::Delete,
      format!("/tasks/{id}")
    )
  }

  pub fn categories() -> Self {
    Self::new(Method::Get, "/categories")
  }

  pub fn stats() -> Self {
    Self::new(Method::Get, "/stats")
  }

  fn new(
    method: Method,
    path: impl Into<String>
  ) -> Self {
    Self {
      method,
      path: path.into()
    }
  }

  pub fn url(&self, base: &str) -> String {
    format!(
      "{}{}",
      base.trim_end_matches('/'),
      self.path
    )
  }
}

impl fmt::Display for Endpoint {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(f, "{} {}", self.method, self.path)
  }
}

fn is_success(status: u16) -> bool {
  (200..300).contains(&status)
}

/// Reduce a raw response to its envelope,
/// turning every failure shape into a
/// [`ClientError`].
fn check_envelope(
  status: u16,
  body: &str
) -> Result<Option<Envelope<Value>>, ClientError>
{
  if body.trim().is_empty() {
    return if is_success(status) {
      Ok(None)
    } else {
      Err(ClientError::api(
        Some(status),
        GENERIC_FAILURE
      ))
    };
  }

  let envelope = match serde_json::from_str::<
    Envelope<Value>
  >(body)
  {
    | Ok(envelope) => envelope,
    | Err(err) => {
      debug!(status, error = %err, "response body is not an envelope");
      return Err(if is_success(status) {
        ClientError::Decode(err.to_string())
      } else {
        ClientError::api(
          Some(status),
          GENERIC_FAILURE
        )
      });
    }
  };

  if let Some(message) =
    envelope.error_message()
  {
    return Err(ClientError::api(
      Some(status),
      message
    ));
  }

  if !is_success(status)
    || envelope.success == Some(false)
  {
    return Err(ClientError::api(
      Some(status),
      envelope
        .message
        .clone()
        .unwrap_or_else(|| {
          GENERIC_FAILURE.to_string()
        })
    ));
  }

  Ok(Some(envelope))
}

/// Decode the `data` payload of a
/// response.
pub fn decode_data<T>(
  status: u16,
  body: &str
) -> Result<T, ClientError>
where
  T: DeserializeOwned
{
  let data = check_envelope(status, body)?
    .and_then(|envelope| envelope.data)
    .ok_or_else(|| {
      ClientError::Decode(
        "response carried no data"
          .to_string()
      )
    })?;

  serde_json::from_value(data).map_err(
    |err| ClientError::Decode(err.to_string())
  )
}

/// Accept any successful response,
/// ignoring its payload.
pub fn decode_empty(
  status: u16,
  body: &str
) -> Result<(), ClientError> {
  check_envelope(status, body).map(|_| ())
}

#[cfg(test)]
mod tests {
  use taskdeck_shared::Priority;

  use super::*;

  #[test]
  fn endpoint_urls_join_cleanly() {
    assert_eq!(
      Endpoint::update_task(4)
        .url("http://localhost:5000/api/"),
      "http://localhost:5000/api/tasks/4"
    );
    assert_eq!(
      Endpoint::stats().to_string(),
      "GET /stats"
    );
    assert_eq!(
      Endpoint::delete_task(9).method,
      Method::Delete
    );
  }

  #[test]
  fn decodes_task_list_payload() {
    let body = r#"{"success":true,"count":1,"data":[{"id":1,"title":"A","priority":"High","completed":0,"category":"General"}]}"#;
    let tasks: Vec<Task> =
      decode_data(200, body)
        .expect("decode tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(
      tasks[0].priority,
      Priority::High
    );
    assert!(!tasks[0].completed);
  }

  #[test]
  fn error_field_wins_over_success_status()
  {
    let err = decode_data::<Vec<Task>>(
      200,
      r#"{"error":"database is locked"}"#
    )
    .expect_err("error field");
    assert_eq!(
      err,
      ClientError::api(
        Some(200),
        "database is locked"
      )
    );
  }

  #[test]
  fn failed_status_without_message_is_generic()
  {
    let err = decode_empty(
      500,
      "<html>oops</html>"
    )
    .expect_err("status");
    assert_eq!(
      err.to_string(),
      "Request failed"
    );
    assert_eq!(err.status(), Some(500));

    let err = decode_empty(404, "")
      .expect_err("empty 404");
    assert_eq!(err.status(), Some(404));
  }

  #[test]
  fn delete_tolerates_any_success_body() {
    decode_empty(204, "")
      .expect("no content");
    decode_empty(
      200,
      r#"{"success":true,"message":"Task deleted successfully"}"#
    )
    .expect("message body");
  }

  #[test]
  fn malformed_success_body_is_decode_error()
  {
    let err = decode_data::<Stats>(
      200,
      "not json"
    )
    .expect_err("decode");
    assert_eq!(
      err.as_label(),
      "decode_error"
    );

    let err = decode_data::<Stats>(
      200,
      r#"{"success":true}"#
    )
    .expect_err("missing data");
    assert_eq!(
      err.as_label(),
      "decode_error"
    );
  }

  #[test]
  fn explicit_unsuccessful_envelope_fails()
  {
    let err = decode_empty(
      200,
      r#"{"success":false,"message":"No data provided"}"#
    )
    .expect_err("success false");
    assert_eq!(
      err.to_string(),
      "No data provided"
    );
  }
}
