// Helpers shared by the unit tests.

#[cfg(test)]
pub mod test_tools {
    pub fn approx_equal(val1: f64, val2: f64, eps: f64) -> bool {
        assert!(eps > 0.0);

        (val1 - val2).abs() < eps
    }

    pub fn approx_equal_slices(vals1: &[f64], vals2: &[f64], eps: f64) -> bool {
        vals1.len() == vals2.len()
            && vals1
                .iter()
                .zip(vals2)
                .all(|(&a, &b)| approx_equal(a, b, eps))
    }
}

#[cfg(test)]
mod test {
    use super::test_tools::*;

    #[test]
    fn test_approx_equal() {
        assert!(approx_equal(1.0, 1.0 + 1.0e-12, 1.0e-10));
        assert!(!approx_equal(1.0, 1.1, 1.0e-10));
        assert!(approx_equal_slices(&[1.0, 2.0], &[1.0, 2.0], 1.0e-10));
        assert!(!approx_equal_slices(&[1.0, 2.0], &[1.0], 1.0e-10));
    }
}
