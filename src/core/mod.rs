/*!
 * Core Module
 * Shared constants and unified error handling
 */

pub mod errors;
pub mod limits;

// Re-export for convenience
pub use errors::*;
