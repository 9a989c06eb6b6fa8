//! Hash collections used across swaypane.
//!
//! Keys are small ids and nav strings owned by the engine, so the default is
//! the Fx hasher. The `std-hash` feature switches to SipHash for hosts that
//! feed untrusted keys.

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
}

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::{HashMap, HashSet};
}
