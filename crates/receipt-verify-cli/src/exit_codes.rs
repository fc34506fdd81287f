//! Exit codes for `receipt-verify`.
//! These are part of the CLI contract; scripts branch on them.

pub const SUCCESS: i32 = 0;
pub const NOT_TRUSTED: i32 = 1; // Receipt rejected (missing, malformed or tampered)
pub const CONFIG_ERROR: i32 = 2; // Bad arguments, unreadable files, unusable key
