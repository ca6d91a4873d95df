//! Error types raised by the task client.
//!
//! - [`ClientError`]: one normalized failure for anything a user action
//!   can run into, from a dropped connection to an empty title.
//! - [`LoadError`]: a failed [`TaskStore`](crate::store::TaskStore)
//!   reload. The store keeps its previous contents when this is raised.

use taskdeck_shared::TaskId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
  /// The request never produced a
  /// response (connection refused, DNS,
  /// aborted fetch).
  #[error("Network error: {message}")]
  Network { message: String },

  /// The server answered with an `error`
  /// field or a non-success status.
  #[error("{message}")]
  Api {
    status:  Option<u16>,
    message: String
  },

  /// A client-side precondition failed
  /// before any request was made.
  #[error("{0}")]
  Validation(String),

  /// A success response whose body did
  /// not match the expected shape.
  #[error("Invalid response: {0}")]
  Decode(String)
}

impl ClientError {
  pub fn network(
    message: impl Into<String>
  ) -> Self {
    Self::Network {
      message: message.into()
    }
  }

  pub fn api(
    status: Option<u16>,
    message: impl Into<String>
  ) -> Self {
    Self::Api {
      status,
      message: message.into()
    }
  }

  pub fn validation(
    message: impl Into<String>
  ) -> Self {
    Self::Validation(message.into())
  }

  /// Short snake_case label for log
  /// fields.
  pub fn as_label(
    &self
  ) -> &'static str {
    match self {
      | Self::Network { .. } => {
        "network_error"
      }
      | Self::Api { .. } => "api_error",
      | Self::Validation(_) => {
        "validation_error"
      }
      | Self::Decode(_) => "decode_error"
    }
  }

  /// HTTP status of an [`ClientError::Api`]
  /// failure, when one was received.
  pub fn status(&self) -> Option<u16> {
    match self {
      | Self::Api {
        status, ..
      } => *status,
      | _ => None
    }
  }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
  #[error(transparent)]
  Fetch(#[from] ClientError),

  #[error(
    "task list contains duplicate id \
     {0}"
  )]
  DuplicateId(TaskId)
}

impl LoadError {
  pub fn as_label(
    &self
  ) -> &'static str {
    match self {
      | Self::Fetch(err) => err.as_label(),
      | Self::DuplicateId(_) => {
        "duplicate_task_id"
      }
    }
  }
}
