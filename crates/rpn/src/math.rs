//! Arithmetic kernels.
//!
//! Every kernel returns `Err` instead of a non-finite value, so nothing the
//! register bank stores is ever Inf or NaN.

use core::f64::consts::PI;

use crate::error::MathFault;
use crate::settings::AngleUnit;

/// Largest argument whose factorial is finite in `f64`.
pub const FACTORIAL_MAX: f64 = 170.0;

/// Two-operand operations, applied as `y op x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// y raised to x
    Power,
    /// x-th root of y
    Root,
}

impl BinaryOp {
    pub fn apply(self, y: f64, x: f64) -> Result<f64, MathFault> {
        let result = match self {
            Self::Add => y + x,
            Self::Subtract => y - x,
            Self::Multiply => y * x,
            Self::Divide => {
                if x == 0.0 {
                    return Err(MathFault::DivideByZero);
                }
                y / x
            }
            Self::Power => libm::pow(y, x),
            Self::Root => root(y, x)?,
        };
        finite(result)
    }
}

/// One-operand operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnaryOp {
    Sqrt,
    Square,
    Reciprocal,
    Ln,
    Log10,
    Exp,
    Exp10,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Factorial,
    Abs,
    IntPart,
}

impl UnaryOp {
    pub fn apply(self, x: f64, unit: AngleUnit) -> Result<f64, MathFault> {
        let result = match self {
            Self::Sqrt => libm::sqrt(x),
            Self::Square => x * x,
            Self::Reciprocal => {
                if x == 0.0 {
                    return Err(MathFault::DivideByZero);
                }
                1.0 / x
            }
            Self::Ln => libm::log(x),
            Self::Log10 => libm::log10(x),
            Self::Exp => libm::exp(x),
            Self::Exp10 => libm::pow(10.0, x),
            Self::Sin => sin(x, unit),
            Self::Cos => cos(x, unit),
            Self::Tan => tan(x, unit)?,
            Self::Asin => from_radians(libm::asin(x), unit),
            Self::Acos => from_radians(libm::acos(x), unit),
            Self::Atan => from_radians(libm::atan(x), unit),
            Self::Factorial => factorial(x)?,
            Self::Abs => libm::fabs(x),
            Self::IntPart => libm::trunc(x),
        };
        finite(result)
    }
}

fn finite(v: f64) -> Result<f64, MathFault> {
    if v.is_nan() {
        Err(MathFault::Domain)
    } else if v.is_infinite() {
        Err(MathFault::Overflow)
    } else {
        Ok(v)
    }
}

fn root(y: f64, x: f64) -> Result<f64, MathFault> {
    if x == 0.0 {
        return Err(MathFault::DivideByZero);
    }
    // Odd integer roots of negatives are real.
    if y < 0.0 && libm::trunc(x) == x && libm::fmod(x, 2.0) != 0.0 {
        return Ok(-libm::pow(-y, 1.0 / x));
    }
    Ok(libm::pow(y, 1.0 / x))
}

/// `n!` for integer `0 <= n <= 170`.
///
/// # Errors
///
/// [`MathFault::Factorial`] for negative or non-integer `n`,
/// [`MathFault::Overflow`] above [`FACTORIAL_MAX`].
pub fn factorial(n: f64) -> Result<f64, MathFault> {
    if n < 0.0 || libm::trunc(n) != n {
        return Err(MathFault::Factorial);
    }
    if n > FACTORIAL_MAX {
        return Err(MathFault::Overflow);
    }
    let mut acc = 1.0_f64;
    let mut k = 2.0_f64;
    while k <= n {
        acc *= k;
        k += 1.0;
    }
    finite(acc)
}

fn to_degrees(x: f64, unit: AngleUnit) -> f64 {
    match unit {
        AngleUnit::Degrees => x,
        AngleUnit::Radians => x * 180.0 / PI,
    }
}

fn to_radians(x: f64, unit: AngleUnit) -> f64 {
    match unit {
        AngleUnit::Degrees => x * PI / 180.0,
        AngleUnit::Radians => x,
    }
}

fn from_radians(r: f64, unit: AngleUnit) -> f64 {
    match unit {
        AngleUnit::Degrees => r * 180.0 / PI,
        AngleUnit::Radians => r,
    }
}

/// Quarter turn index 0..=3 if `x`, rounded to the nearest whole degree, is a
/// multiple of 90.
#[allow(clippy::cast_possible_truncation)] // |deg / 90| fits i64 for any finite angle we snap
fn quadrant(x: f64, unit: AngleUnit) -> Option<u8> {
    let deg = to_degrees(x, unit);
    let nearest = libm::round(deg);
    if libm::fmod(nearest, 90.0) != 0.0 {
        return None;
    }
    let turns = libm::fmod(nearest / 90.0, 4.0) as i64;
    u8::try_from(turns.rem_euclid(4)).ok()
}

fn sin(x: f64, unit: AngleUnit) -> f64 {
    match quadrant(x, unit) {
        Some(0 | 2) => 0.0,
        Some(1) => 1.0,
        Some(_) => -1.0,
        None => libm::sin(to_radians(x, unit)),
    }
}

fn cos(x: f64, unit: AngleUnit) -> f64 {
    match quadrant(x, unit) {
        Some(1 | 3) => 0.0,
        Some(0) => 1.0,
        Some(_) => -1.0,
        None => libm::cos(to_radians(x, unit)),
    }
}

fn tan(x: f64, unit: AngleUnit) -> Result<f64, MathFault> {
    match quadrant(x, unit) {
        Some(0 | 2) => Ok(0.0),
        Some(_) => Err(MathFault::Tangent),
        None => Ok(libm::tan(to_radians(x, unit))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divide_by_exact_zero() {
        assert_eq!(BinaryOp::Divide.apply(1.0, 0.0), Err(MathFault::DivideByZero));
        assert_eq!(BinaryOp::Divide.apply(1.0, -0.0), Err(MathFault::DivideByZero));
        assert!(BinaryOp::Divide.apply(1.0, 1e-300).is_ok());
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0.0), Ok(1.0));
        assert_eq!(factorial(5.0), Ok(120.0));
        assert_eq!(factorial(-1.0), Err(MathFault::Factorial));
        assert_eq!(factorial(2.5), Err(MathFault::Factorial));
        assert_eq!(factorial(171.0), Err(MathFault::Overflow));
        assert!(factorial(170.0).is_ok());
    }

    #[test]
    fn test_trig_quadrants_are_exact() {
        let deg = AngleUnit::Degrees;
        assert_eq!(UnaryOp::Sin.apply(180.0, deg), Ok(0.0));
        assert_eq!(UnaryOp::Cos.apply(90.0, deg), Ok(0.0));
        assert_eq!(UnaryOp::Sin.apply(-90.0, deg), Ok(-1.0));
        assert_eq!(UnaryOp::Cos.apply(720.0, deg), Ok(1.0));
        assert_eq!(UnaryOp::Tan.apply(180.0, deg), Ok(0.0));
        assert_eq!(UnaryOp::Tan.apply(90.0, deg), Err(MathFault::Tangent));
        assert_eq!(UnaryOp::Tan.apply(-270.0, deg), Err(MathFault::Tangent));
    }

    #[test]
    fn test_trig_radians_snap() {
        let rad = AngleUnit::Radians;
        assert_eq!(UnaryOp::Sin.apply(PI, rad), Ok(0.0));
        assert_eq!(UnaryOp::Cos.apply(PI / 2.0, rad), Ok(0.0));
        let half = UnaryOp::Sin.apply(PI / 6.0, rad).unwrap_or(0.0);
        assert!((half - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_trig_snaps_after_rounding_to_whole_degrees() {
        let rad = AngleUnit::Radians;
        assert_eq!(UnaryOp::Sin.apply(3.14159, rad), Ok(0.0));
        assert_eq!(UnaryOp::Cos.apply(1.5708, rad), Ok(0.0));
        assert_eq!(UnaryOp::Tan.apply(1.5708, rad), Err(MathFault::Tangent));
        let deg = AngleUnit::Degrees;
        assert_eq!(UnaryOp::Sin.apply(180.4, deg), Ok(0.0));
        assert_eq!(UnaryOp::Cos.apply(89.6, deg), Ok(0.0));
        // 1.5 degrees off a quadrant is an ordinary angle.
        let near = UnaryOp::Sin.apply(181.5, deg).unwrap_or(0.0);
        assert!(near < -0.02);
    }

    #[test]
    fn test_inverse_trig_uses_unit() {
        let v = UnaryOp::Asin.apply(1.0, AngleUnit::Degrees).unwrap_or(0.0);
        assert!((v - 90.0).abs() < 1e-9);
        assert_eq!(UnaryOp::Asin.apply(2.0, AngleUnit::Degrees), Err(MathFault::Domain));
    }

    #[test]
    fn test_non_finite_results_are_errors() {
        assert_eq!(UnaryOp::Sqrt.apply(-1.0, AngleUnit::Degrees), Err(MathFault::Domain));
        assert_eq!(UnaryOp::Ln.apply(0.0, AngleUnit::Degrees), Err(MathFault::Overflow));
        assert_eq!(UnaryOp::Reciprocal.apply(0.0, AngleUnit::Degrees), Err(MathFault::DivideByZero));
        assert_eq!(BinaryOp::Multiply.apply(1e200, 1e200), Err(MathFault::Overflow));
    }

    #[test]
    fn test_odd_root_of_negative() {
        let v = BinaryOp::Root.apply(-27.0, 3.0).unwrap_or(0.0);
        assert!((v + 3.0).abs() < 1e-12);
        assert_eq!(BinaryOp::Root.apply(-4.0, 2.0), Err(MathFault::Domain));
    }
}
