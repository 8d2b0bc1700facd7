//! Errors reported by the fallible construction and reservation paths.

use std::collections::TryReserveError;

/// Error returned by [`LongIntMapBuilder::build`](crate::LongIntMapBuilder::build),
/// [`PrimitiveLongIntMap::try_with_capacity`](crate::PrimitiveLongIntMap::try_with_capacity)
/// and [`PrimitiveLongIntMap::try_reserve`](crate::PrimitiveLongIntMap::try_reserve).
///
/// Missing keys are never errors; lookups and removals report them as `None`.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The maximum load factor must be finite and within `[0.1, 0.95]`.
    #[error("max load factor must be within [0.1, 0.95], got {0}")]
    InvalidLoadFactor(f32),

    /// The table needed to hold the requested entries does not fit in `usize`.
    #[error("capacity overflow while sizing a table for {requested} entries")]
    CapacityOverflow { requested: usize },

    /// The allocator refused the backing arrays.
    #[error("failed to allocate {slots} slots")]
    AllocFailed {
        slots: usize,
        #[source]
        source: TryReserveError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_messages() {
        let err = MapError::InvalidLoadFactor(1.5);
        assert_eq!(err.to_string(), "max load factor must be within [0.1, 0.95], got 1.5");

        let err = MapError::CapacityOverflow { requested: usize::MAX };
        assert!(err.to_string().contains("capacity overflow"));
    }

    #[test]
    fn test_alloc_failure_keeps_source() {
        let source = Vec::<i64>::new().try_reserve_exact(usize::MAX).unwrap_err();
        let err = MapError::AllocFailed { slots: usize::MAX, source };
        assert!(err.source().is_some());
    }
}
