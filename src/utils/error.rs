use std::{
    error::Error as StdError,
    fmt::{Display, Formatter},
    sync::Arc,
};
use tracing::debug;

/// Cloneable error: iced messages must be `Clone`, `anyhow::Error` is not.
#[derive(Debug, Clone)]
pub struct Error {
    inner: Arc<anyhow::Error>,
}

impl Error {
    pub fn msg(message: impl Display) -> Self {
        Self {
            inner: Arc::new(anyhow::Error::msg(message.to_string())),
        }
    }
}

impl<E> From<E> for Error
where
    E: StdError + Send + Sync + 'static,
{
    #[cold]
    fn from(error: E) -> Self {
        debug!("`{error}`");
        Self {
            inner: Arc::new(error.into()),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

#[macro_export]
macro_rules! errorf {
    ($($tt:tt)*) => {
        $crate::utils::Error::msg(format!($($tt)*))
    };
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
