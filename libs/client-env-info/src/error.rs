/// Errors a host can report while answering a single probe.
///
/// These never leave a collector: each one is folded into the fallback
/// sentinel of the field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("{capability} is not supported by the host")]
    Unsupported { capability: &'static str },

    #[error("{capability} is not available: {reason}")]
    Unavailable {
        capability: &'static str,
        reason: String,
    },

    #[error("{capability} probe failed: {message}")]
    Failed {
        capability: &'static str,
        message: String,
    },
}

impl ProbeError {
    #[must_use]
    pub fn unsupported(capability: &'static str) -> Self {
        Self::Unsupported { capability }
    }

    #[must_use]
    pub fn unavailable(capability: &'static str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            capability,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn failed(capability: &'static str, message: impl ToString) -> Self {
        Self::Failed {
            capability,
            message: message.to_string(),
        }
    }

    /// Name of the capability the probe was reading.
    #[must_use]
    pub fn capability(&self) -> &'static str {
        match self {
            Self::Unsupported { capability }
            | Self::Unavailable { capability, .. }
            | Self::Failed { capability, .. } => capability,
        }
    }
}
