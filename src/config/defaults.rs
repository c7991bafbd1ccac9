//! Default values for sbom-catalog configuration.

/// Default number of locations buffered between an enumeration producer and its consumer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
