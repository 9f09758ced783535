//! Print failures and session outcomes.

use strum_macros::{AsRefStr, Display};
use thiserror::Error;

/// A failure that ends a print session.
#[derive(Debug, Error)]
pub enum PrintError {
    /// The embedded document of the print surface could not be accessed.
    #[error("print surface document is not accessible")]
    SurfaceUnavailable,
    /// An external image kept failing after every reload attempt.
    #[error("image {url} failed to load after {attempts} attempts: {reason}")]
    ImageLoad {
        /// The URL of the last attempt.
        url: String,
        /// Total load attempts, the initial one included.
        attempts: u32,
        /// The error reported for the last attempt.
        reason: String,
    },
    /// The host environment failed an operation.
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

/// Why a print request was declined without building a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SkipReason {
    /// A session is already in flight on this handle.
    AlreadyPrinting,
    /// The element reference does not point at an attached element.
    TargetDetached,
}

/// The result of one [`trigger_print`](crate::PrintHandle::trigger_print).
///
/// Failures are already logged when the outcome is returned, so ignoring it
/// is a valid choice.
#[derive(Debug)]
#[must_use = "failures are logged, but the outcome tells whether anything printed"]
pub enum PrintOutcome {
    /// The print action ran and the surface was torn down.
    Printed,
    /// Nothing happened.
    Skipped(SkipReason),
    /// The session failed; the surface (if any) was still torn down.
    Failed(PrintError),
}

impl PrintOutcome {
    /// `true` for [`PrintOutcome::Printed`].
    #[must_use]
    pub const fn is_printed(&self) -> bool {
        matches!(self, Self::Printed)
    }

    /// The failure, if the session failed.
    #[must_use]
    pub const fn error(&self) -> Option<&PrintError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Convert into a `Result`: `Ok(true)` when printed, `Ok(false)` when
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns the session's [`PrintError`] for [`PrintOutcome::Failed`].
    pub fn into_result(self) -> Result<bool, PrintError> {
        match self {
            Self::Printed => Ok(true),
            Self::Skipped(_) => Ok(false),
            Self::Failed(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_converts_to_result() {
        assert!(PrintOutcome::Printed.into_result().unwrap());
        assert!(
            !PrintOutcome::Skipped(SkipReason::TargetDetached)
                .into_result()
                .unwrap()
        );
        let failed = PrintOutcome::Failed(PrintError::SurfaceUnavailable);
        assert!(failed.error().is_some());
        assert!(matches!(
            failed.into_result(),
            Err(PrintError::SurfaceUnavailable)
        ));
    }

    #[test]
    fn image_load_message_names_url_and_attempts() {
        let err = PrintError::ImageLoad {
            url: "https://cdn.example.com/a.png?_retry=2".into(),
            attempts: 3,
            reason: "404 Not Found".into(),
        };
        assert_eq!(
            err.to_string(),
            "image https://cdn.example.com/a.png?_retry=2 failed to load after 3 attempts: 404 Not Found"
        );
        assert_eq!(SkipReason::AlreadyPrinting.to_string(), "already-printing");
    }
}
