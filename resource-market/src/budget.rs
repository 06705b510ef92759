//! Converting a spend rate into a per-block resource-credit allowance.
//!
//! The engine itself never calls this. Block producers and wallets use it to
//! decide how aggressively to spend against the quoted costs.

use crate::{
    config::ProtocolParams,
    constants::BPS_DENOMINATOR,
    error::MarketError,
    markets::{ResourceKind, ResourceLimits},
};

/// Per-block credit allowance for spending `percent_bps` of the total token
/// supply per day:
///
/// ```text
/// rc_per_block = floor(token_supply * percent_bps / 10_000 / blocks_per_day)
/// ```
pub fn rc_per_block(protocol: &ProtocolParams, percent_bps: u64) -> Result<u64, MarketError> {
    let per_day = u128::from(protocol.token_supply)
        .checked_mul(u128::from(percent_bps))
        .ok_or(MarketError::Overflow)?;
    let window = u128::from(BPS_DENOMINATOR)
        .checked_mul(u128::from(protocol.blocks_per_day))
        .ok_or(MarketError::Overflow)?;
    let per_block = per_day.checked_div(window).ok_or(MarketError::Overflow)?;
    u64::try_from(per_block).map_err(|_| MarketError::Overflow)
}

/// Units of each resource an allowance buys when split evenly across the
/// three markets. Each amount is capped at that market's limit, so the
/// result can always be passed to
/// [`crate::markets::Markets::consume_block_resources`].
pub fn split_evenly(limits: &ResourceLimits, rc: u64) -> [u64; 3] {
    let share = rc.saturating_div(ResourceKind::ALL.len() as u64);
    ResourceKind::ALL.map(|kind| limits.quote(kind).affordable_units(share))
}
