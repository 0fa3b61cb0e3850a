//! Process exit codes of the `wasm_bench` binary.

pub const SUCCESS: i32 = 0;
pub const EXECUTION_FAILED: i32 = 1; // Shell could not be launched or exited non-zero
pub const CONFIG_ERROR: i32 = 2; // Bad arguments or shell environment
pub const EXTRACTION_MISMATCH: i32 = 3; // Expected output or metric line missing
