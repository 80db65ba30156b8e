use std::fmt;

/// Outcome of any call into a gateway.
///
/// `Canceled` means the user dismissed a picker or dialog and is never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResult<T> {
    Ok(T),
    Canceled,
    Failed(String),
}

impl<T> GatewayResult<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GatewayResult<U> {
        match self {
            Self::Ok(value) => GatewayResult::Ok(f(value)),
            Self::Canceled => GatewayResult::Canceled,
            Self::Failed(reason) => GatewayResult::Failed(reason),
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            _ => None,
        }
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for GatewayResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}
