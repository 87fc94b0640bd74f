// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

/// The application-level error: a human-readable message.
#[derive(Debug)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl Error for ErrorReport {}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(message: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport {
        message: message.into(),
    })
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport::new(&format!("I/O error: {value}"))
    }
}

impl From<rusqlite::Error> for ErrorReport {
    fn from(value: rusqlite::Error) -> Self {
        ErrorReport::new(&format!("database error: {value}"))
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport::new(&format!("JSON error: {value}"))
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(value: toml::de::Error) -> Self {
        ErrorReport::new(&format!("invalid configuration: {value}"))
    }
}

impl From<chrono::ParseError> for ErrorReport {
    fn from(value: chrono::ParseError) -> Self {
        ErrorReport::new(&format!("invalid date: {value}"))
    }
}

impl From<ReviewError> for ErrorReport {
    fn from(value: ReviewError) -> Self {
        ErrorReport::new(&value.to_string())
    }
}

/// Recoverable conditions reported by the scheduler and the session manager.
#[derive(Debug, PartialEq)]
pub enum ReviewError {
    /// The quality score is outside `0..=5`.
    InvalidQuality(u8),
    /// A session was requested, but no items are due.
    EmptyDueSet,
    /// The item id is not part of the session.
    NotFound,
    /// The item was already answered in this session.
    AlreadyCompleted,
    /// The session has reached its terminal state.
    NoCurrentItem,
}

impl Display for ReviewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewError::InvalidQuality(q) => {
                write!(f, "quality must be between 0 and 5, got {q}")
            }
            ReviewError::EmptyDueSet => write!(f, "no items are due for review"),
            ReviewError::NotFound => write!(f, "item is not part of this session"),
            ReviewError::AlreadyCompleted => write!(f, "item was already reviewed in this session"),
            ReviewError::NoCurrentItem => write!(f, "the session is complete"),
        }
    }
}

impl Error for ReviewError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display() {
        let report = ErrorReport::new("directory does not exist.");
        assert_eq!(report.to_string(), "error: directory does not exist.");
    }

    #[test]
    fn test_fail() {
        let result: Fallible<()> = fail(format!("bad {}", 1));
        assert_eq!(result.unwrap_err().to_string(), "error: bad 1");
    }

    #[test]
    fn test_review_error_into_report() {
        let report: ErrorReport = ReviewError::InvalidQuality(7).into();
        assert_eq!(
            report.to_string(),
            "error: quality must be between 0 and 5, got 7"
        );
    }
}
