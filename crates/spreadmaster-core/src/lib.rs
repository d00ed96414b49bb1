pub mod error;
pub mod format;
pub mod forms;
pub mod time_value;
pub mod types;

#[cfg(feature = "margin")]
pub mod margin;

#[cfg(feature = "derivatives")]
pub mod derivatives;

#[cfg(feature = "wealth")]
pub mod wealth;

pub use error::SpreadMasterError;
pub use types::*;

/// Standard result type for all spreadmaster operations
pub type SpreadMasterResult<T> = Result<T, SpreadMasterError>;
