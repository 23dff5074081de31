//! Result type alias for Curator
//!
//! This module provides a convenient Result type alias that uses CuratorError
//! as the error type.

use super::errors::CuratorError;

/// Result type alias for Curator operations
///
/// # Examples
///
/// ```
/// use curator::domain::result::Result;
/// use curator::domain::errors::CuratorError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CuratorError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CuratorError>;
