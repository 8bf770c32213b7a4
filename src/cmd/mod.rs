/// Signature-typed JSON encode command.
pub mod encode;
/// JSON to value conversion.
pub mod json;
/// Signature inspection command.
pub mod signature;
/// Shared output helpers.
pub mod util;
