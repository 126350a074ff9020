//! Low-S normalization for ECDSA signatures.
//!
//! `(r, s)` and `(r, n - s)` both verify for the same digest. Verifiers on the
//! CA side accept only the canonical form with `s <= n / 2`, so every signature
//! leaving this crate is folded into the lower half of the group order.

use std::collections::HashMap;

use p256::elliptic_curve::bigint::{ArrayEncoding, U384};

use super::KeyAlgorithm;

/// Width of the shared integer type; wide enough for every supported curve.
const WIDE_LEN: usize = 48;

/// Group order and its half for one curve.
#[derive(Debug)]
pub struct CurveOrder {
    pub order: U384,
    pub half_order: U384,
    /// Width of a serialized scalar, in bytes.
    pub scalar_len: usize,
}

impl CurveOrder {
    fn new(order: U384, scalar_len: usize) -> Self {
        Self {
            half_order: order.shr_vartime(1),
            order,
            scalar_len,
        }
    }

    /// Big-endian encoding of `value` at this curve's scalar width.
    pub fn to_scalar_bytes(&self, value: &U384) -> Vec<u8> {
        value.to_be_byte_array()[WIDE_LEN - self.scalar_len..].to_vec()
    }
}

// ============================================================================
// Curve half-order table
// ============================================================================

lazy_static::lazy_static! {
    /// Read-only per-curve group orders, built once.
    static ref CURVE_ORDERS: HashMap<KeyAlgorithm, CurveOrder> = {
        let mut m = HashMap::new();
        m.insert(
            KeyAlgorithm::EcdsaP256,
            CurveOrder::new(
                U384::from_be_hex(concat!(
                    "00000000000000000000000000000000",
                    "ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551",
                )),
                32,
            ),
        );
        m.insert(
            KeyAlgorithm::EcdsaP384,
            CurveOrder::new(
                U384::from_be_hex(
                    "ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf581a0db248b0a77aecec196accc52973",
                ),
                48,
            ),
        );
        m
    };
}

/// Look up the order table entry for a curve.
pub fn curve_order(algorithm: KeyAlgorithm) -> &'static CurveOrder {
    // Every KeyAlgorithm variant is inserted above.
    &CURVE_ORDERS[&algorithm]
}

/// Widen a big-endian scalar, or `None` if it cannot fit any supported curve.
fn widen(s: &[u8]) -> Option<U384> {
    let start = s.iter().position(|b| *b != 0).unwrap_or(s.len());
    let s = &s[start..];
    if s.len() > WIDE_LEN {
        return None;
    }
    let mut buf = [0u8; WIDE_LEN];
    buf[WIDE_LEN - s.len()..].copy_from_slice(s);
    Some(U384::from_be_slice(&buf))
}

/// Whether big-endian scalar `s` is already in the lower half of the group.
pub fn is_low_s(algorithm: KeyAlgorithm, s: &[u8]) -> bool {
    widen(s).is_some_and(|v| v <= curve_order(algorithm).half_order)
}

/// Return `s` folded into the lower half: `n - s` when `s > n / 2`, otherwise
/// `s` unchanged. Output is left-padded to the curve's scalar width.
pub fn normalize_s(algorithm: KeyAlgorithm, s: &[u8]) -> Vec<u8> {
    let curve = curve_order(algorithm);
    let Some(value) = widen(s) else {
        return s.to_vec();
    };
    let low = if value > curve.half_order {
        curve.order.wrapping_sub(&value)
    } else {
        value
    };
    curve.to_scalar_bytes(&low)
}
