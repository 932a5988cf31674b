//! Fixed-point arithmetic over the ray (10^27) and wad (10^18) scales
//! (spec §4.1).
//!
//! Every multiplication or division widens its operands into a 256-bit
//! intermediate before rounding, per the design note in spec §9: "use a
//! fixed 4x64-bit limb library; do not rely on arbitrary-precision
//! libraries, because round-to-nearest semantics must be identical across
//! implementations." `uint::construct_uint!` gives exactly that: a fixed
//! 256-bit (4-limb) integer, not a growable bignum.

use common_constants::{BPS, RAY, RAY_WAD_RATIO, WAD};
use common_errors::{CoreError, CoreResult};

uint::construct_uint! {
    /// Fixed 4x64-bit limb unsigned integer, wide enough to hold the
    /// product of two 128-bit operands without truncation.
    pub struct U256(4);
}

fn u256(x: u128) -> U256 {
    U256::from(x)
}

/// Narrows a `U256` back to `u128`, failing if that would lose information.
fn narrow(x: U256) -> CoreResult<u128> {
    if x > u256(u128::MAX) {
        return Err(CoreError::Overflow);
    }
    Ok(x.as_u128())
}

/// Widens a `u128` into the crate's 256-bit intermediate type. Exposed so
/// callers that need to chain more than two wide multiplications (the
/// compounded-interest binomial terms, spec §4.2) aren't forced back
/// through 128-bit arithmetic between steps.
pub fn widen(x: u128) -> U256 {
    u256(x)
}

/// Narrows a 256-bit intermediate back to `u128`, failing with
/// [`CoreError::Overflow`] if that would lose information.
pub fn narrow_u256(x: U256) -> CoreResult<u128> {
    narrow(x)
}

/// `(a*b + R/2) / R`, rounded half-up, for two ray-scaled operands.
pub fn ray_mul(a: u128, b: u128) -> CoreResult<u128> {
    mul_half_up(a, b, RAY)
}

/// `(a*R + b/2) / b`, rounded half-up, for two ray-scaled operands.
pub fn ray_div(a: u128, b: u128) -> CoreResult<u128> {
    div_half_up(a, b, RAY)
}

/// `(a*b + W/2) / W`, rounded half-up, for two wad-scaled operands.
pub fn wad_mul(a: u128, b: u128) -> CoreResult<u128> {
    mul_half_up(a, b, WAD)
}

/// `(a*W + b/2) / b`, rounded half-up, for two wad-scaled operands.
pub fn wad_div(a: u128, b: u128) -> CoreResult<u128> {
    div_half_up(a, b, WAD)
}

fn mul_half_up(a: u128, b: u128, scale: u128) -> CoreResult<u128> {
    let product = u256(a) * u256(b);
    let half_scale = u256(scale) / u256(2);
    narrow((product + half_scale) / u256(scale))
}

fn div_half_up(a: u128, b: u128, scale: u128) -> CoreResult<u128> {
    if b == 0 {
        return Err(CoreError::DivisionByZero);
    }
    let numerator = u256(a) * u256(scale);
    let half_b = u256(b) / u256(2);
    narrow((numerator + half_b) / u256(b))
}

/// Converts a wad-scaled value to ray scale: `x * (RAY / WAD)`.
///
/// Exact (no rounding needed): `RAY / WAD` is an integer power of ten.
pub fn wad_to_ray(x: u128) -> CoreResult<u128> {
    narrow(u256(x) * u256(RAY_WAD_RATIO))
}

/// Converts a ray-scaled value back to wad scale, rounded half-up.
pub fn ray_to_wad(x: u128) -> u128 {
    let half = RAY_WAD_RATIO / 2;
    (x + half) / RAY_WAD_RATIO
}

/// `(x*bps + 5000) / 10000`, rounded half-up. `bps` must be in `[0, 10000]`;
/// callers are expected to have validated that range (see
/// `RateParameters::new` and `ReserveData::reserve_factor_bps`).
pub fn percent_mul(x: u128, bps: u32) -> CoreResult<u128> {
    let product = u256(x) * u256(bps as u128);
    let half = u256(BPS as u128) / u256(2);
    narrow((product + half) / u256(BPS as u128))
}
