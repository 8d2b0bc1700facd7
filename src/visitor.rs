//! Callback traits for allocation-free traversal.
//!
//! A visitor is handed every live entry in physical slot order and decides after
//! each one whether to keep going. Returning [`ControlFlow::Break`] stops the
//! traversal immediately and the break value is handed back to the caller, so a
//! visitor doubles as a search ("find the first key above X") or as a fallible
//! walk (`ControlFlow<io::Error>`).
//!
//! Closures implement both traits directly. Stateful visitors that outlive a
//! single call (a running sum reused across iterations, say) implement the trait
//! on a struct:
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use primitive_collections::{LongIntVisitor, PrimitiveLongIntMap};
//!
//! struct SumValues(i64);
//!
//! impl LongIntVisitor for SumValues {
//!     type Break = ();
//!     fn visited(&mut self, _key: i64, value: i32) -> ControlFlow<()> {
//!         self.0 += i64::from(value);
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let map: PrimitiveLongIntMap = [(1, 10), (2, 20)].into_iter().collect();
//! let mut sum = SumValues(0);
//! let _ = map.visit_entries(&mut sum);
//! assert_eq!(sum.0, 30);
//! ```

use core::ops::ControlFlow;

/// Visits keys only.
pub trait LongVisitor {
    /// Value carried out of the traversal when the visitor stops early.
    type Break;

    fn visited(&mut self, key: i64) -> ControlFlow<Self::Break>;
}

/// Visits key/value pairs.
pub trait LongIntVisitor {
    /// Value carried out of the traversal when the visitor stops early.
    type Break;

    fn visited(&mut self, key: i64, value: i32) -> ControlFlow<Self::Break>;
}

impl<F, B> LongVisitor for F
where
    F: FnMut(i64) -> ControlFlow<B>,
{
    type Break = B;

    #[inline(always)]
    fn visited(&mut self, key: i64) -> ControlFlow<B> {
        self(key)
    }
}

impl<F, B> LongIntVisitor for F
where
    F: FnMut(i64, i32) -> ControlFlow<B>,
{
    type Break = B;

    #[inline(always)]
    fn visited(&mut self, key: i64, value: i32) -> ControlFlow<B> {
        self(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountUntil {
        seen: usize,
        limit: usize,
    }

    impl LongVisitor for CountUntil {
        type Break = i64;

        fn visited(&mut self, key: i64) -> ControlFlow<i64> {
            self.seen += 1;
            if self.seen == self.limit {
                ControlFlow::Break(key)
            } else {
                ControlFlow::Continue(())
            }
        }
    }

    fn drive_keys<V: LongVisitor + ?Sized>(keys: &[i64], visitor: &mut V) -> ControlFlow<V::Break> {
        for &k in keys {
            visitor.visited(k)?;
        }
        ControlFlow::Continue(())
    }

    #[test]
    fn test_struct_visitor_breaks_with_value() {
        let mut v = CountUntil { seen: 0, limit: 2 };
        assert_eq!(drive_keys(&[7, 8, 9], &mut v), ControlFlow::Break(8));
        assert_eq!(v.seen, 2);
    }

    #[test]
    fn test_closure_is_a_visitor() {
        let mut total = 0;
        let mut add = |k: i64| -> ControlFlow<()> {
            total += k;
            ControlFlow::Continue(())
        };
        assert_eq!(drive_keys(&[1, 2, 3], &mut add), ControlFlow::Continue(()));
        assert_eq!(total, 6);
    }

    #[test]
    fn test_entry_closure_is_a_visitor() {
        let mut visitor = |k: i64, v: i32| {
            if i64::from(v) == k * 2 {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(k)
            }
        };
        assert_eq!(visitor.visited(3, 6), ControlFlow::Continue(()));
        assert_eq!(visitor.visited(3, 7), ControlFlow::Break(3));
    }
}
