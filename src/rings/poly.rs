use super::{Coefficient, RingError, RingResult};
use num_bigint::BigInt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Polynomial with signed integer coefficients, lowest degree first.
///
/// Arithmetic is exact over the integers. Reduction modulo a polynomial
/// (`mult_mod`) and modulo a coefficient modulus (`take_coef_mod`) only
/// happens when asked for.
#[derive(Debug, Clone)]
pub struct Poly<C: Coefficient = BigInt> {
    coeffs: Vec<C>,
}

impl<C: Coefficient> Poly<C> {
    pub fn new(coeffs: Vec<C>) -> Self {
        Self { coeffs }
    }

    /// Polynomial made of `len` zero coefficients.
    pub fn zero(len: usize) -> Self {
        Self {
            coeffs: vec![C::zero(); len],
        }
    }

    pub fn from_i64(coeffs: &[i64]) -> Self {
        Self::new(coeffs.iter().map(|&c| C::from(c)).collect())
    }

    /// `coefficient * X^degree`
    pub fn monomial(coefficient: C, degree: usize) -> Self {
        let mut coeffs = vec![C::zero(); degree + 1];
        coeffs[degree] = coefficient;
        Self { coeffs }
    }

    /// `X^n + 1`
    pub fn cyclotomic(n: usize) -> Self {
        let mut poly = Self::monomial(C::one(), n);
        poly.coeffs[0] += C::one();
        poly
    }

    pub fn coefficients(&self) -> &[C] {
        &self.coeffs
    }

    pub fn into_coefficients(self) -> Vec<C> {
        self.coeffs
    }

    /// Highest index holding a nonzero coefficient; 0 for the zero polynomial.
    pub fn degree(&self) -> usize {
        self.coeffs
            .iter()
            .rposition(|c| !c.is_zero())
            .unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }

    /// Drops the zero tail, keeping the constant coefficient.
    pub fn deflate(&mut self) -> &mut Self {
        if !self.coeffs.is_empty() {
            let keep = self.degree() + 1;
            self.coeffs.truncate(keep);
        }
        self
    }

    /// Multiplies every coefficient by `factor`.
    pub fn scale(&self, factor: &C) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|c| c.clone() * factor).collect(),
        }
    }

    pub fn scale_assign(&mut self, factor: &C) {
        for c in &mut self.coeffs {
            *c *= factor;
        }
    }

    /// Divides every coefficient by `divisor`, rounding to the nearest
    /// integer with ties away from zero.
    pub fn scale_div(&self, divisor: &C) -> RingResult<Self> {
        if divisor.is_zero() {
            return Err(RingError::ZeroDivisor);
        }
        Ok(Self {
            coeffs: self.coeffs.iter().map(|c| c.div_round(divisor)).collect(),
        })
    }

    /// Full product, degree `deg(self) + deg(other)`.
    pub fn mult(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::new(vec![C::zero()]);
        }
        let (du, dv) = (self.degree(), other.degree());
        let mut coeffs = vec![C::zero(); du + dv + 1];
        for (i, a) in self.coeffs[..=du].iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs[..=dv].iter().enumerate() {
                if !b.is_zero() {
                    coeffs[i + j] += a.clone() * b;
                }
            }
        }
        Self { coeffs }
    }

    /// Schoolbook long division, returning `(quotient, remainder)`.
    ///
    /// Each step divides the running leading coefficient by the leading
    /// coefficient of `divisor` with truncating integer division, so the
    /// remainder is exact for monic divisors such as `X^N + 1`. In every case
    /// `self == quotient * divisor + remainder`.
    pub fn poly_div(&self, divisor: &Self) -> RingResult<(Self, Self)> {
        if divisor.is_zero() {
            return Err(RingError::DivisionByZeroPolynomial);
        }
        let du = self.degree();
        let dv = divisor.degree();
        let mut remainder: Vec<C> = self.coeffs.iter().take(du + 1).cloned().collect();
        if remainder.is_empty() {
            remainder.push(C::zero());
        }
        if du < dv {
            return Ok((Self::new(vec![C::zero()]), Self::new(remainder)));
        }

        let lead = &divisor.coeffs[dv];
        let mut quotient = vec![C::zero(); du - dv + 1];
        for k in (0..=du - dv).rev() {
            if remainder[k + dv].is_zero() {
                continue;
            }
            let q = remainder[k + dv].clone() / lead;
            if q.is_zero() {
                continue;
            }
            for (j, d) in divisor.coeffs[..=dv].iter().enumerate() {
                if !d.is_zero() {
                    remainder[k + j] -= q.clone() * d;
                }
            }
            quotient[k] = q;
        }

        let mut quotient = Self::new(quotient);
        quotient.deflate();
        let mut remainder = Self::new(remainder);
        remainder.deflate();
        Ok((quotient, remainder))
    }

    /// `self * other` reduced modulo `modulus`.
    pub fn mult_mod(&self, other: &Self, modulus: &Self) -> RingResult<Self> {
        let (_, remainder) = self.mult(other).poly_div(modulus)?;
        Ok(remainder)
    }

    /// Reduces every coefficient into `(-modulus/2, modulus/2]`.
    pub fn take_coef_mod(&mut self, modulus: &C) -> RingResult<&mut Self> {
        if !modulus.is_positive() {
            return Err(RingError::InvalidModulus {
                modulus: modulus.to_string(),
            });
        }
        for c in &mut self.coeffs {
            *c = c.centered_mod(modulus);
        }
        Ok(self)
    }

    /// Coefficients as floats, zero-padded or truncated to `len`.
    pub fn to_f64_vec(&self, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| self.coeffs.get(i).map_or(0.0, C::to_f64_lossy))
            .collect()
    }
}

impl<C: Coefficient> From<Vec<C>> for Poly<C> {
    fn from(coeffs: Vec<C>) -> Self {
        Self::new(coeffs)
    }
}

/// Equality ignores trailing zero coefficients.
impl<C: Coefficient> PartialEq for Poly<C> {
    fn eq(&self, other: &Self) -> bool {
        let len = self.coeffs.len().max(other.coeffs.len());
        (0..len).all(|i| match (self.coeffs.get(i), other.coeffs.get(i)) {
            (Some(a), Some(b)) => a == b,
            (Some(c), None) | (None, Some(c)) => c.is_zero(),
            (None, None) => true,
        })
    }
}

impl<C: Coefficient> Eq for Poly<C> {}

impl<C: Coefficient> AddAssign<&Poly<C>> for Poly<C> {
    fn add_assign(&mut self, rhs: &Poly<C>) {
        if self.coeffs.len() < rhs.coeffs.len() {
            self.coeffs.resize(rhs.coeffs.len(), C::zero());
        }
        for (a, b) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *a += b;
        }
    }
}

impl<C: Coefficient> SubAssign<&Poly<C>> for Poly<C> {
    fn sub_assign(&mut self, rhs: &Poly<C>) {
        if self.coeffs.len() < rhs.coeffs.len() {
            self.coeffs.resize(rhs.coeffs.len(), C::zero());
        }
        for (a, b) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *a -= b;
        }
    }
}

impl<C: Coefficient> Add<&Poly<C>> for &Poly<C> {
    type Output = Poly<C>;

    fn add(self, rhs: &Poly<C>) -> Poly<C> {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl<C: Coefficient> Add for Poly<C> {
    type Output = Poly<C>;

    fn add(mut self, rhs: Poly<C>) -> Poly<C> {
        self += &rhs;
        self
    }
}

impl<C: Coefficient> Sub<&Poly<C>> for &Poly<C> {
    type Output = Poly<C>;

    fn sub(self, rhs: &Poly<C>) -> Poly<C> {
        let mut out = self.clone();
        out -= rhs;
        out
    }
}

impl<C: Coefficient> Sub for Poly<C> {
    type Output = Poly<C>;

    fn sub(mut self, rhs: Poly<C>) -> Poly<C> {
        self -= &rhs;
        self
    }
}

impl<C: Coefficient> Neg for &Poly<C> {
    type Output = Poly<C>;

    fn neg(self) -> Poly<C> {
        Poly {
            coeffs: self.coeffs.iter().map(|c| -c.clone()).collect(),
        }
    }
}

impl<C: Coefficient> Neg for Poly<C> {
    type Output = Poly<C>;

    fn neg(self) -> Poly<C> {
        -&self
    }
}

impl<C: Coefficient> Mul<&Poly<C>> for &Poly<C> {
    type Output = Poly<C>;

    fn mul(self, rhs: &Poly<C>) -> Poly<C> {
        self.mult(rhs)
    }
}

impl<C: Coefficient> Mul for Poly<C> {
    type Output = Poly<C>;

    fn mul(self, rhs: Poly<C>) -> Poly<C> {
        self.mult(&rhs)
    }
}
