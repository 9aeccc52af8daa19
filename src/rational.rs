//! Rational numbers are used for note durations, e.g. `1/8` of a time unit.

use std::{cmp::Ordering, fmt};

/// Underlying integral type for the rational numbers.
type Int = i64;

/// A rational number, always fully normalized.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Rational {
    /// The numerator of the fraction.
    /// If the fraction is negative, the numerator will be made negative.
    num: Int,
    /// The denominator of the fraction, always positive.
    denom: Int,
}

impl Rational {
    // ==================== Constructors ====================

    /// Create a new rational from a potentially unnormalized fraction.
    ///
    /// Returns `None` if the denominator is zero or if the fraction cannot be normalized
    /// without overflowing (only possible when `Int::MIN` is involved).
    ///
    /// # Examples
    ///
    /// ```
    /// use tone_txt::rational::*;
    ///
    /// assert_eq!(Rational::try_new(10, 5), Some(Rational::from_int(2)));
    /// assert_eq!(Rational::try_new(-10, -5), Rational::try_new(6, 3));
    /// assert_eq!(Rational::try_new(-6, 8), Rational::try_new(3, -4));
    /// assert_eq!(Rational::try_new(1, 0), None);
    /// ```
    pub fn try_new(num: Int, denom: Int) -> Option<Rational> {
        if denom == 0 {
            return None;
        }
        let sign = num.signum() * denom.signum();
        let num = num.checked_abs()?;
        let denom = denom.checked_abs()?;
        let div = gcd(num, denom);
        Some(Rational {
            num: sign * num / div,
            denom: denom / div,
        })
    }

    /// Create a new rational from a potentially unnormalized fraction.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    pub fn new(num: Int, denom: Int) -> Rational {
        Rational::try_new(num, denom).expect("Denominator must not be zero")
    }

    pub fn from_int(int: Int) -> Rational {
        Rational { num: int, denom: 1 }
    }

    pub fn one() -> Rational {
        Rational::from_int(1)
    }

    // ==================== Queries ====================

    pub fn is_positive(self) -> bool {
        self.num > 0
    }

    /// Multiply by an integer and round towards negative infinity.
    /// The computation is exact, there is no intermediate overflow.
    ///
    /// # Examples
    ///
    /// ```
    /// use tone_txt::rational::*;
    ///
    /// assert_eq!(Rational::new(1, 8).mul_floor(44100), 5512);
    /// assert_eq!(Rational::new(3, 2).mul_floor(3), 4);
    /// assert_eq!(Rational::new(-1, 2).mul_floor(3), -2);
    /// ```
    pub fn mul_floor(self, factor: Int) -> i128 {
        (self.num as i128 * factor as i128).div_euclid(self.denom as i128)
    }

    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.denom as f64
    }

    // ==================== Destructors ====================

    pub fn numerator(self) -> Int {
        self.num
    }

    pub fn denominator(self) -> Int {
        self.denom
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Rational) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// ```
/// use tone_txt::rational::*;
///
/// assert!(Rational::new(3,4) < Rational::new(3,2));
/// ```
impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // a / b < c / d  <=>  a * d < c * b, widened so that it cannot overflow
        let l = self.num as i128 * other.denom as i128;
        let r = other.num as i128 * self.denom as i128;
        l.cmp(&r)
    }
}

/// Whole numbers are printed without a denominator.
///
/// ```
/// use tone_txt::rational::*;
///
/// assert_eq!(Rational::new(2, 16).to_string(), "1/8");
/// assert_eq!(Rational::new(8, 2).to_string(), "4");
/// ```
impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.denom)
        }
    }
}

/// An error which can be returned when parsing a rational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRationalError(RationalErrorKind);

impl ParseRationalError {
    pub fn kind(&self) -> RationalErrorKind {
        self.0
    }
}

impl fmt::Display for ParseRationalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self.0 {
            RationalErrorKind::InvalidInt => "numerator or denominator is not an integer",
            RationalErrorKind::Zero => "denominator is zero",
            RationalErrorKind::Malformed => "expected <int> or <int>/<int>",
            RationalErrorKind::Overflow => "fraction is out of range",
        };
        f.write_str(message)
    }
}

impl std::error::Error for ParseRationalError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RationalErrorKind {
    /// The numerator or denominator could not be parsed as integer.
    InvalidInt,
    /// The denominator was zero
    Zero,
    /// The rational was not of the form `<int>` or `<int>/<int>
    Malformed,
    /// The fraction could not be normalized within the range of the underlying integer.
    Overflow,
}

/// # Examples
///
/// ```
/// use tone_txt::rational::*;
///
/// assert_eq!("1/8".parse(), Ok(Rational::new(1, 8)));
/// assert_eq!("-3".parse(), Ok(Rational::from_int(-3)));
/// assert_eq!("1/0".parse::<Rational>().unwrap_err().kind(), RationalErrorKind::Zero);
/// assert_eq!("1/2/3".parse::<Rational>().unwrap_err().kind(), RationalErrorKind::Malformed);
/// ```
impl std::str::FromStr for Rational {
    type Err = ParseRationalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        // `split` always yields at least one part
        let numerator_str = parts.next().unwrap_or("");
        let numerator = numerator_str
            .parse()
            .map_err(|_| ParseRationalError(RationalErrorKind::InvalidInt))?;

        let denominator = match parts.next() {
            Some(denominator_str) => denominator_str
                .parse()
                .map_err(|_| ParseRationalError(RationalErrorKind::InvalidInt))?,
            None => 1,
        };
        if parts.next().is_some() {
            return Err(ParseRationalError(RationalErrorKind::Malformed));
        }
        if denominator == 0 {
            return Err(ParseRationalError(RationalErrorKind::Zero));
        }
        Rational::try_new(numerator, denominator)
            .ok_or(ParseRationalError(RationalErrorKind::Overflow))
    }
}

/// Computes the greates common divisor of two numbers using euclids algorithm.
///
/// # Example
///
/// ```
/// use tone_txt::rational::*;
///
/// assert_eq!(gcd(20, 15), 5);
/// assert_eq!(gcd(20, 19), 1);
/// assert_eq!(gcd(10, 0), 10);
/// assert_eq!(gcd(0, 10), 10);
/// assert_eq!(gcd(10, -10), 10);
/// ```
pub fn gcd(a: Int, b: Int) -> Int {
    // work on magnitudes to guarantee termination; zero only when both inputs are
    let mut a = a.unsigned_abs();
    let mut b = b.unsigned_abs();
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a as Int
}
