// crayxc-log library entry point
// Record codec for the Cray XC (Aries) router telemetry log module

pub mod aggregate;
pub mod codec;
pub mod internal;
pub mod module;
pub mod present;

pub use internal::error::{Error, Result};
pub use module::{get_logutil, ApxcLogUtil, LogUtil, ModuleId, ModuleRegistry};
