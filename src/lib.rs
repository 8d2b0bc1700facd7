//! # Primitive Collections
//!
//! Hash maps specialised for `i64` keys and `i32` values. Keys and values are stored in
//! flat primitive arrays, so there is no per-entry allocation and no boxing, and bulk
//! traversal goes through reusable visitor callbacks instead of materialising entries.
//!
//! ## Key Features
//!
//! * **Open Addressing:** Linear probing over power-of-two tables with a Fibonacci-hashed
//!   home slot, which keeps sequential keys (`0..N`) collision-free.
//! * **Tombstone-Free Removal:** Backward-shift deletion repairs the probe chain in place,
//!   so heavy churn never degrades lookups.
//! * **Whole Key Domain:** Every `i64` is a valid key, including the internal empty marker.
//! * **Visitors:** [`LongVisitor`] and [`LongIntVisitor`] walk live entries with early
//!   termination via [`ControlFlow`](core::ops::ControlFlow).
//! * **Small Maps:** [`SmallLongIntMap`] keeps the first `N` entries inline and spills into
//!   a [`PrimitiveLongIntMap`] when it grows.
//!
//! ## Threading
//!
//! Nothing in this crate synchronises. Each map expects exclusive access; wrap it in a
//! lock or keep one map per thread.
//!
//! ## Examples
//!
//! ### PrimitiveLongIntMap
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use primitive_collections::Primitive;
//!
//! let mut map = Primitive::long_int_map();
//! for k in 0..1_000 {
//!     map.put(k, (k * 2) as i32);
//! }
//! for k in (0..1_000).step_by(2) {
//!     map.remove(k);
//! }
//!
//! assert_eq!(map.len(), 500);
//! assert_eq!(map.get(1), Some(2));
//! assert_eq!(map.get(0), None);
//!
//! let mut sum = 0i64;
//! let _ = map.visit_entries(&mut |_key: i64, value: i32| -> ControlFlow<()> {
//!     sum += i64::from(value);
//!     ControlFlow::Continue(())
//! });
//! assert_eq!(sum, 500_000);
//! ```
//!
//! ### Early termination
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use primitive_collections::PrimitiveLongIntMap;
//!
//! let map: PrimitiveLongIntMap = (0..100).map(|k| (k, 1)).collect();
//! let found = map.visit_keys(&mut |key: i64| {
//!     if key > 90 { ControlFlow::Break(key) } else { ControlFlow::Continue(()) }
//! });
//! assert!(matches!(found, ControlFlow::Break(k) if k > 90));
//! ```

// --- Module Declarations ---

pub mod compat;
pub mod config;
pub mod error;
mod hash;
pub mod long_int_map;
pub mod small_map;
pub mod visitor;

// --- Re-exports ---

pub use compat::ZeroDefaultIntMap;
pub use config::LongIntMapBuilder;
pub use error::MapError;
pub use long_int_map::PrimitiveLongIntMap;
pub use small_map::SmallLongIntMap;
pub use visitor::{LongIntVisitor, LongVisitor};

/// Factory for the primitive collections.
///
/// ```rust
/// use primitive_collections::Primitive;
///
/// let map = Primitive::long_int_map_with_capacity(10_000);
/// assert!(map.is_empty());
/// ```
pub struct Primitive;

impl Primitive {
    /// A fresh, empty map with default sizing.
    pub fn long_int_map() -> PrimitiveLongIntMap {
        PrimitiveLongIntMap::new()
    }

    /// A fresh, empty map that holds `entries` without resizing.
    pub fn long_int_map_with_capacity(entries: usize) -> PrimitiveLongIntMap {
        PrimitiveLongIntMap::with_capacity(entries)
    }
}
