//! Small helpers shared by the converter and its tests.

pub(crate) mod buffer;

// -------------------------------------------------------------------------------------------------

const MINUS_INF_IN_DB: f64 = -200.0;

// -------------------------------------------------------------------------------------------------

/// Convert a linear gain or peak ratio to decibels. Values below -200 dB map to -200 dB.
pub fn linear_to_db(value: f64) -> f64 {
    if value == 1.0 {
        0.0 // avoid rounding errors at exactly 0 dB
    } else if value > 1e-10 {
        20.0 * value.log10()
    } else {
        MINUS_INF_IN_DB
    }
}

// -------------------------------------------------------------------------------------------------

/// Run the given function with allocations disallowed, when the `assert-allocs` feature is on.
#[inline]
pub(crate) fn assert_no_alloc<T, F: FnOnce() -> T>(func: F) -> T {
    #[cfg(feature = "assert-allocs")]
    return assert_no_alloc::assert_no_alloc::<T, F>(func);

    #[cfg(not(feature = "assert-allocs"))]
    return func();
}

/// Temporarily allow allocations within an `assert_no_alloc` scope.
#[inline]
pub(crate) fn permit_alloc<T, F: FnOnce() -> T>(func: F) -> T {
    #[cfg(feature = "assert-allocs")]
    return assert_no_alloc::permit_alloc::<T, F>(func);

    #[cfg(not(feature = "assert-allocs"))]
    return func();
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lin_to_db_conversion() {
        assert_eq!(linear_to_db(1.0), 0.0);
        assert_eq!(linear_to_db(0.0), MINUS_INF_IN_DB);
        assert!((linear_to_db(0.5) + 6.020_599_913).abs() < 1e-6);
        assert!((linear_to_db(2.0) - 6.020_599_913).abs() < 1e-6);
    }
}
