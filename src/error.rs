use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown metric")]
  UnknownMetric {
    metric: String
  },
  #[error("invalid `{param}` date")]
  InvalidDate {
    param: &'static str,
    value: String
  },
  #[error("`from` date is after `to` date")]
  InvertedRange {
    from: NaiveDate,
    to: NaiveDate
  },
  #[error("date range exceeds {max} days")]
  RangeTooLong {
    days: i64,
    max: u32
  },
  #[error("io error: {error}")]
  Io {
    #[from]
    error: std::io::Error
  },
  #[error("json error: {error}")]
  Json {
    #[from]
    error: serde_json::Error
  },
  #[error("generation task failed: {error}")]
  Task {
    #[from]
    error: tokio::task::JoinError
  }
}

impl Error {
  /// Errors caused by the request itself rather than the process.
  pub fn is_client_error(&self) -> bool {
    match self {
      Error::UnknownMetric { .. }
      | Error::InvalidDate { .. }
      | Error::InvertedRange { .. }
      | Error::RangeTooLong { .. } => true,
      Error::Io { .. } | Error::Json { .. } | Error::Task { .. } => false
    }
  }

  pub fn status(&self) -> StatusCode {
    if self.is_client_error() {
      StatusCode::BAD_REQUEST
    } else {
      StatusCode::INTERNAL_SERVER_ERROR
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    (self.status(), self.to_string()).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_client_messages() {
    let err = Error::UnknownMetric { metric: "nope".to_string() };
    assert_eq!(err.to_string(), "unknown metric");

    let err = Error::InvalidDate { param: "to", value: "2024-13-01".to_string() };
    assert_eq!(err.to_string(), "invalid `to` date");

    let err = Error::RangeTooLong { days: 61, max: 60 };
    assert_eq!(err.to_string(), "date range exceeds 60 days");
  }

  #[test]
  fn test_status_mapping() {
    let err = Error::InvalidDate { param: "from", value: String::new() };
    assert!(err.is_client_error());
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err = Error::from(std::io::Error::new(std::io::ErrorKind::AddrInUse, "taken"));
    assert!(!err.is_client_error());
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
