/// The command ran without any error.
pub const NO_ERROR: i32 = 0;
/// The command failed.
pub const FATAL_ERROR: i32 = 1;
/// The command finished but some results are missing.
pub const NON_FATAL_ERROR: i32 = 2;
