//! secp256k1 affine point arithmetic over the prime field.
//!
//! Public keys are derived here rather than through an opaque library call:
//! field inversion uses the extended Euclidean algorithm, and scalar
//! multiplication is left-to-right double-and-add over affine points.
//! The curve is `y^2 = x^3 + 7 (mod p)`.

use std::sync::LazyLock;

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use crate::PrimitivesError;

/// The field prime p = 2^256 - 2^32 - 977.
const FIELD_PRIME_BYTES: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF,
    0xFC, 0x2F,
];

/// The group order n.
const GROUP_ORDER_BYTES: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
    0x41, 0x41,
];

const GENERATOR_X_BYTES: [u8; 32] = [
    0x79, 0xBE, 0x66, 0x7E, 0xF9, 0xDC, 0xBB, 0xAC, 0x55, 0xA0, 0x62, 0x95, 0xCE, 0x87, 0x0B,
    0x07, 0x02, 0x9B, 0xFC, 0xDB, 0x2D, 0xCE, 0x28, 0xD9, 0x59, 0xF2, 0x81, 0x5B, 0x16, 0xF8,
    0x17, 0x98,
];

const GENERATOR_Y_BYTES: [u8; 32] = [
    0x48, 0x3A, 0xDA, 0x77, 0x26, 0xA3, 0xC4, 0x65, 0x5D, 0xA4, 0xFB, 0xFC, 0x0E, 0x11, 0x08,
    0xA8, 0xFD, 0x17, 0xB4, 0x48, 0xA6, 0x85, 0x54, 0x19, 0x9C, 0x47, 0xD0, 0x8F, 0xFB, 0x10,
    0xD4, 0xB8,
];

static FIELD_PRIME: LazyLock<BigUint> =
    LazyLock::new(|| BigUint::from_bytes_be(&FIELD_PRIME_BYTES));

static GROUP_ORDER: LazyLock<BigUint> =
    LazyLock::new(|| BigUint::from_bytes_be(&GROUP_ORDER_BYTES));

static GENERATOR: LazyLock<CurvePoint> = LazyLock::new(|| CurvePoint::Affine {
    x: BigUint::from_bytes_be(&GENERATOR_X_BYTES),
    y: BigUint::from_bytes_be(&GENERATOR_Y_BYTES),
});

/// A point on secp256k1 in affine coordinates, or the identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CurvePoint {
    /// The point at infinity (group identity).
    Infinity,
    /// A finite point with coordinates reduced modulo p.
    Affine { x: BigUint, y: BigUint },
}

impl CurvePoint {
    /// The standard generator G.
    pub fn generator() -> CurvePoint {
        GENERATOR.clone()
    }

    /// Check that the point satisfies the curve equation.
    pub fn is_on_curve(&self) -> bool {
        match self {
            CurvePoint::Infinity => true,
            CurvePoint::Affine { x, y } => {
                let p = &*FIELD_PRIME;
                let lhs = (y * y) % p;
                let rhs = (x * x * x + BigUint::from(7u8)) % p;
                lhs == rhs
            }
        }
    }

    /// Serialize in compressed SEC1 form: parity prefix then 32-byte x.
    ///
    /// # Returns
    /// 33 bytes starting with 0x02 (even y) or 0x03 (odd y), or
    /// `PointAtInfinity` for the identity.
    pub fn to_compressed(&self) -> Result<[u8; 33], PrimitivesError> {
        match self {
            CurvePoint::Infinity => Err(PrimitivesError::PointAtInfinity),
            CurvePoint::Affine { x, y } => {
                let mut out = [0u8; 33];
                out[0] = if y.bit(0) { 0x03 } else { 0x02 };
                out[1..].copy_from_slice(&to_fixed_32(x));
                Ok(out)
            }
        }
    }

    /// Parse a compressed SEC1 point, recovering y from the curve equation.
    ///
    /// # Arguments
    /// * `bytes` - 33 bytes: 0x02/0x03 prefix followed by x.
    ///
    /// # Returns
    /// The affine point, or an error if the encoding is malformed or x is
    /// not the abscissa of a curve point.
    pub fn from_compressed(bytes: &[u8]) -> Result<CurvePoint, PrimitivesError> {
        if bytes.len() != 33 || (bytes[0] != 0x02 && bytes[0] != 0x03) {
            return Err(PrimitivesError::InvalidPublicKey(
                "expected 33-byte compressed point".to_string(),
            ));
        }
        let p = &*FIELD_PRIME;
        let x = BigUint::from_bytes_be(&bytes[1..]);
        if &x >= p {
            return Err(PrimitivesError::PointNotOnCurve);
        }
        let rhs = (&x * &x * &x + BigUint::from(7u8)) % p;
        // p = 3 mod 4, so a square root is rhs^((p+1)/4).
        let exp = (p + BigUint::one()) >> 2;
        let mut y = rhs.modpow(&exp, p);
        if (&y * &y) % p != rhs {
            return Err(PrimitivesError::PointNotOnCurve);
        }
        let want_odd = bytes[0] == 0x03;
        if y.bit(0) != want_odd {
            y = p - y;
        }
        Ok(CurvePoint::Affine { x, y })
    }
}

/// Compute the multiplicative inverse of `a` modulo `m` with the extended
/// Euclidean algorithm.
///
/// # Arguments
/// * `a` - The value to invert.
/// * `m` - The modulus.
///
/// # Returns
/// `a^-1 mod m`, or `NotInvertible` when `gcd(a, m) != 1`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint, PrimitivesError> {
    let modulus = BigInt::from(m.clone());
    let mut old_r = BigInt::from(a % m);
    let mut r = modulus.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return Err(PrimitivesError::NotInvertible);
    }
    let normalized = ((old_s % &modulus) + &modulus) % &modulus;
    normalized.to_biguint().ok_or(PrimitivesError::NotInvertible)
}

fn field_sub(a: &BigUint, b: &BigUint) -> BigUint {
    let p = &*FIELD_PRIME;
    ((a % p) + p - (b % p)) % p
}

/// Double a point: the tangent-line rule.
pub fn point_double(point: &CurvePoint) -> Result<CurvePoint, PrimitivesError> {
    let (x, y) = match point {
        CurvePoint::Infinity => return Ok(CurvePoint::Infinity),
        CurvePoint::Affine { x, y } => (x, y),
    };
    if y.is_zero() {
        return Ok(CurvePoint::Infinity);
    }
    let p = &*FIELD_PRIME;
    let numerator = (BigUint::from(3u8) * x * x) % p;
    let denominator = (BigUint::from(2u8) * y) % p;
    let lambda = (numerator * mod_inverse(&denominator, p)?) % p;

    let x3 = field_sub(&(&lambda * &lambda), &(BigUint::from(2u8) * x));
    let y3 = field_sub(&(&lambda * field_sub(x, &x3)), y);
    Ok(CurvePoint::Affine { x: x3, y: y3 })
}

/// Add two points: the chord rule, falling back to doubling for equal points.
pub fn point_add(a: &CurvePoint, b: &CurvePoint) -> Result<CurvePoint, PrimitivesError> {
    let ((x1, y1), (x2, y2)) = match (a, b) {
        (CurvePoint::Infinity, _) => return Ok(b.clone()),
        (_, CurvePoint::Infinity) => return Ok(a.clone()),
        (CurvePoint::Affine { x: x1, y: y1 }, CurvePoint::Affine { x: x2, y: y2 }) => {
            ((x1, y1), (x2, y2))
        }
    };
    if x1 == x2 {
        if y1 == y2 {
            return point_double(a);
        }
        // P + (-P)
        return Ok(CurvePoint::Infinity);
    }
    let p = &*FIELD_PRIME;
    let lambda = (field_sub(y2, y1) * mod_inverse(&field_sub(x2, x1), p)?) % p;
    let x3 = field_sub(&field_sub(&(&lambda * &lambda), x1), x2);
    let y3 = field_sub(&(&lambda * field_sub(x1, &x3)), y1);
    Ok(CurvePoint::Affine { x: x3, y: y3 })
}

/// Multiply a point by a scalar using double-and-add, most significant bit first.
///
/// # Arguments
/// * `scalar` - The multiplier; reduced modulo the group order.
/// * `point` - The base point.
///
/// # Returns
/// `scalar * point`.
pub fn scalar_multiply(scalar: &BigUint, point: &CurvePoint) -> Result<CurvePoint, PrimitivesError> {
    let k = scalar % &*GROUP_ORDER;
    let mut result = CurvePoint::Infinity;
    for i in (0..k.bits()).rev() {
        result = point_double(&result)?;
        if k.bit(i) {
            result = point_add(&result, point)?;
        }
    }
    Ok(result)
}

/// Derive the compressed public key for a 32-byte private scalar.
///
/// # Arguments
/// * `secret` - Big-endian private scalar; must be in `[1, n)`.
///
/// # Returns
/// The 33-byte compressed encoding of `secret * G`.
pub fn public_key_from_secret(secret: &[u8; 32]) -> Result<[u8; 33], PrimitivesError> {
    let k = BigUint::from_bytes_be(secret);
    if k.is_zero() || k >= *GROUP_ORDER {
        return Err(PrimitivesError::InvalidPrivateKey(
            "scalar must be in [1, n)".to_string(),
        ));
    }
    scalar_multiply(&k, &GENERATOR)?.to_compressed()
}

/// The group order n as a big integer.
pub fn group_order() -> &'static BigUint {
    &GROUP_ORDER
}

/// Left-pad a field element to 32 big-endian bytes.
pub(crate) fn to_fixed_32(value: &BigUint) -> [u8; 32] {
    let bytes = value.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}
