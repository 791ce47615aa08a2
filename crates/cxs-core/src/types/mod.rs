//! Type system for CXS
//!
//! Runtime values carried by condition parameters, item fields and the
//! evaluation context.

pub mod value;

pub use value::Value;
