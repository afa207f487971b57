//! CLI command implementations.

pub(crate) mod replay;
pub(crate) mod timeframes;
