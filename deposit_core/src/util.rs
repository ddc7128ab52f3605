//! Physical constants and small numeric helpers.

/// Avogadro's number (1/mol).
pub const AVOGADRO: f64 = 6.022e23;
/// Grams per nanogram.
pub const GRAMS_PER_NG: f64 = 1e-9;

/// Convert a particle count to picomoles.
#[inline]
pub fn to_pmol(number: f64) -> f64 {
    number * 1e12 / AVOGADRO
}

/// Mean and population standard deviation. Empty input gives `(NaN, NaN)`.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pmol_of_one_mole_per_trillion() {
        assert!((to_pmol(AVOGADRO) - 1e12).abs() < 1.0);
    }

    #[test]
    fn population_std() {
        let (m, s) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(m, 5.0);
        assert_eq!(s, 2.0);
    }

    #[test]
    fn single_value_has_zero_spread() {
        assert_eq!(mean_std(&[0.7]), (0.7, 0.0));
    }
}
