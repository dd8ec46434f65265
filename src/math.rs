//! Integer helpers for modular pitch and step arithmetic.

/// Returns the integer division and remainder with `numer` being an `i32` and `denom` being an `u16`.
///
/// The resulting remainder is a *positive* number between 0 and `denom-1` with `result.0 * denom + result.1 = numer`.
///
/// # Panics
///
/// Panics if `denom == 0`.
///
/// # Examples
///
/// ```
/// # use tune_theory::math;
/// // numer is positive
/// assert_eq!(math::div_mod(1, 7), (0, 1));
/// assert_eq!(math::div_mod(7, 7), (1, 0));
/// assert_eq!(math::div_mod(15, 7), (2, 1));
///
/// // numer is negative
/// assert_eq!(math::div_mod(-1, 7), (-1, 6));
/// assert_eq!(math::div_mod(-7, 7), (-1, 0));
/// assert_eq!(math::div_mod(-8, 7), (-2, 6));
///
/// // numer is zero
/// assert_eq!(math::div_mod(0, 12), (0, 0));
/// ```
pub fn div_mod(numer: i32, denom: u16) -> (i32, u16) {
    let denom = i32::from(denom);
    (numer.div_euclid(denom), numer.rem_euclid(denom) as u16)
}

/// Greatest common divisor.
///
/// ```
/// # use tune_theory::math;
/// assert_eq!(math::gcd_u16(12, 7), 1);
/// assert_eq!(math::gcd_u16(12, 8), 4);
/// assert_eq!(math::gcd_u16(0, 5), 5);
/// ```
pub fn gcd_u16(a: u16, b: u16) -> u16 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Returns the multiplicative inverse of `value` modulo `modulus`, i.e. the unique `x` in `0..modulus` with `value * x ≡ 1`.
///
/// [`None`] is returned if `value` and `modulus` are not coprime.
///
/// # Examples
///
/// ```
/// # use tune_theory::math;
/// assert_eq!(math::mod_inverse(7, 12), Some(7));
/// assert_eq!(math::mod_inverse(11, 19), Some(7));
/// assert_eq!(math::mod_inverse(10, 17), Some(12));
/// assert_eq!(math::mod_inverse(8, 12), None);
/// ```
pub fn mod_inverse(value: u16, modulus: u16) -> Option<u16> {
    if modulus == 0 {
        return None;
    }
    let (gcd, inverse) = extended_gcd(i32::from(value % modulus), i32::from(modulus));
    (gcd == 1).then(|| div_mod(inverse, modulus).1)
}

#[allow(clippy::many_single_char_names)]
fn extended_gcd(a: i32, b: i32) -> (i32, i32) {
    let mut r = (a, b);
    let mut s = (1, 0);

    while r.1 != 0 {
        let q = r.0 / r.1;
        r = (r.1, r.0 - q * r.1);
        s = (s.1, s.0 - q * s.1);
    }

    (r.0, s.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_is_consistent_with_multiplication() {
        for modulus in 2u16..40 {
            for value in 1..modulus {
                match mod_inverse(value, modulus) {
                    Some(inverse) => assert_eq!(
                        u32::from(value) * u32::from(inverse) % u32::from(modulus),
                        1
                    ),
                    None => assert_ne!(gcd_u16(value, modulus), 1),
                }
            }
        }
    }

    #[test]
    fn trivial_modulus_has_no_inverse() {
        assert_eq!(mod_inverse(3, 0), None);
        assert_eq!(mod_inverse(0, 12), None);
    }
}
