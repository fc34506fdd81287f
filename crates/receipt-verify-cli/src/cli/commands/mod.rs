pub mod dispatch;
pub mod fingerprint;
pub mod verify;

pub use dispatch::dispatch;
