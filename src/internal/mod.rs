// Internal plumbing shared by the codec: error type and container interface.

pub mod container;
pub mod error;
