//! Deterministic ordering for heterogeneous catalog records.
//!
//! Same-type values order through [`Ord`]. Values whose concrete type is only
//! known at runtime (the open `Other` payload of a relationship) participate
//! through [`TryComparable`]: a same-type comparison when the other value has
//! the same concrete type, otherwise a fallback on type names.
//!
//! Every sort over artifacts, relationships, or metadata goes through
//! [`sort_stable`] / [`sort_stable_by`] so equal-ranked elements keep their
//! input order and output does not churn between runs.
//!
//! ```
//! use sbom_catalog::ordering::{compare_dyn, TryComparable};
//! use std::cmp::Ordering;
//!
//! let a: &dyn TryComparable = &1u32;
//! let b: &dyn TryComparable = &2u32;
//! let s: &dyn TryComparable = &"text";
//!
//! assert_eq!(compare_dyn(a, b), Ordering::Less);
//! // u32 vs &str: not mutually comparable, ordered by type name
//! assert_eq!(compare_dyn(s, a), "&str".cmp("u32"));
//! ```

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;

/// A value that can attempt a three-way comparison against an arbitrary other value.
///
/// Implemented for every `Ord` type; there is no need to implement it by hand.
pub trait TryComparable: Any + fmt::Debug + Send + Sync {
    /// Compare against `other` when it has the same concrete type.
    ///
    /// Returns `None` when the two values are not mutually comparable.
    fn try_compare(&self, other: &dyn TryComparable) -> Option<Ordering>;

    /// Stable name of the concrete type, used by the fallback rule.
    fn type_name(&self) -> &'static str;

    /// Upcast for downcasting in [`TryComparable::try_compare`].
    fn as_any(&self) -> &dyn Any;
}

impl<T> TryComparable for T
where
    T: Ord + Any + fmt::Debug + Send + Sync,
{
    fn try_compare(&self, other: &dyn TryComparable) -> Option<Ordering> {
        other
            .as_any()
            .downcast_ref::<T>()
            .map(|other| self.cmp(other))
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Total order over type-erased values.
///
/// Mutually comparable values use their own ordering; anything else orders by
/// type name. The cross-type order carries no meaning beyond determinism and
/// holds only as long as the type names themselves are stable.
pub fn compare_dyn(a: &dyn TryComparable, b: &dyn TryComparable) -> Ordering {
    a.try_compare(b)
        .unwrap_or_else(|| compare_type_names(a.type_name(), b.type_name()))
}

/// Fallback ordering between values of unrelated types.
pub fn compare_type_names(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Map an [`Ordering`] onto the `{-1, 0, 1}` convention used by wire encoders.
#[must_use]
pub const fn ordering_to_int(ordering: Ordering) -> i32 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Stable sort by natural order.
pub fn sort_stable<T: Ord>(items: &mut [T]) {
    // slice::sort is a stable merge sort
    items.sort();
}

/// Stable sort with a custom comparator.
pub fn sort_stable_by<T, F>(items: &mut [T], compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    items.sort_by(compare);
}

/// Stable sort by a projected key.
pub fn sort_stable_by_key<T, K, F>(items: &mut [T], key: F)
where
    F: FnMut(&T) -> K,
    K: Ord,
{
    items.sort_by_key(key);
}
