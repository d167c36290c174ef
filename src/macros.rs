/// Assert that two floating point numbers are equal within the given
/// epsilon.
#[cfg(test)]
macro_rules! assert_f64_eq {
    ($a:expr, $b:expr, $eps:expr) => {{
        // Make variables to avoid evaluating expressions multiple times.
        let a = $a;
        let b = $b;
        let eps = $eps;
        let error = (a - b).abs();
        assert!(
            error <= eps,
            "Assertion failed: |({}) - ({})| = {:e} <= {:e}",
            a,
            b,
            error,
            eps
        );
    }};
    ($a:expr, $b:expr) => {
        $crate::macros::assert_f64_eq!($a, $b, f64::EPSILON)
    };
}

#[cfg(test)]
pub(crate) use assert_f64_eq;
