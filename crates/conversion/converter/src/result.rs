use std::fmt::{self, Display, Formatter};

use crate::ConversionError;


/// The outcome of a conversion or a batch of conversions.
///
/// A failed result always has a short message, and has details only when a longer
/// diagnostic is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    success: bool,
    message: String,
    details: Option<String>,
}

impl ConversionResult {
    #[inline]
    pub fn succeeded<M: Into<String>>(message: M) -> Self {
        Self {
            success: true,
            message: message.into(),
            details: None,
        }
    }

    #[inline]
    pub fn failed<M: Into<String>>(message: M) -> Self {
        Self {
            success: false,
            message: message.into(),
            details: None,
        }
    }

    #[inline]
    pub fn failed_with_details<M: Into<String>, D: Into<String>>(message: M, details: D) -> Self {
        Self {
            success: false,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.success
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl From<ConversionError> for ConversionResult {
    fn from(err: ConversionError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            details: err.details(),
        }
    }
}

impl Display for ConversionResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(details) = &self.details {
            write!(f, "\n{details}")?;
        }
        Ok(())
    }
}
