//! Scale and timing constants shared by the fixed-point, rate, and reserve
//! crates. Kept dependency-free so every other `common-*` crate can pull it
//! in without dragging along arithmetic or error types.

/// Ray scale: 27 fractional decimal digits. Used for rates and indexes.
pub const RAY: u128 = 1_000_000_000_000_000_000_000_000_000;
/// Number of decimal digits backing [`RAY`].
pub const RAY_DECIMALS: u32 = 27;

/// Wad scale: 18 fractional decimal digits. Used for token amounts.
pub const WAD: u128 = 1_000_000_000_000_000_000;
/// Number of decimal digits backing [`WAD`].
pub const WAD_DECIMALS: u32 = 18;

/// Basis-point scale: 1 bps = 1 / 10_000.
pub const BPS: u32 = 10_000;

/// `RAY / WAD`, the conversion factor between the two scales.
pub const RAY_WAD_RATIO: u128 = RAY / WAD;

/// Seconds in a 365-day year. Used to annualize per-second rates.
pub const SECONDS_PER_YEAR: u64 = 365 * 86_400;

/// Upper bound on `lastUpdateTimestamp`: the persistent layout reserves 40
/// bits for it (spec §3, §6).
pub const MAX_TIMESTAMP: u64 = (1u64 << 40) - 1;