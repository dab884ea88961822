use std::fmt;

/// Internal faults raised while planning actions for one update. They never
/// reach the webhook caller; the dispatcher logs them and reports `Degraded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A button press that needs its originating message arrived without one.
    MissingCallbackMessage { data: String },
    MissingMessageId,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::MissingCallbackMessage { data } => {
                write!(f, "callback `{data}` has no message attached")
            }
            DispatchError::MissingMessageId => write!(f, "message has no message_id"),
        }
    }
}

impl std::error::Error for DispatchError {}
