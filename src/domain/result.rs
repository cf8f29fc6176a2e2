//! Result type alias for CareVault

use super::errors::CarevaultError;

/// Result type alias for CareVault operations
///
/// # Examples
///
/// ```
/// use carevault::domain::result::Result;
/// use carevault::domain::errors::CarevaultError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CarevaultError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CarevaultError>;
