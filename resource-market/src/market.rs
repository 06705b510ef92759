use {
    crate::{
        config::{ProtocolParams, ResourceParams},
        error::MarketError,
        fixed_point::{ceil_div, floor_div, mul_shift_64, shl_64_div},
    },
    borsh::{BorshDeserialize, BorshSerialize},
    log::warn,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Consumable amount and per-unit price of one resource for the current block.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct ResourceQuote {
    /// Maximum units the block may consume.
    pub limit: u64,
    /// Resource credits charged per unit consumed. Bounded by the curve
    /// constant, so it always fits in `u128`.
    pub cost: u128,
}

impl ResourceQuote {
    /// Units a credit allowance buys at this quote, capped at the limit.
    #[inline]
    pub fn affordable_units(&self, rc: u64) -> u64 {
        match u128::from(rc).checked_div(self.cost) {
            Some(units) => u64::try_from(units).map_or(self.limit, |units| units.min(self.limit)),
            // A zero cost only comes from a zero-width quote.
            None => self.limit,
        }
    }
}

/// Pricing state machine for a single resource.
///
/// The market holds a decaying *virtual supply*. Each block the supply decays
/// by `d`, grows by the print rate and shrinks by whatever was consumed. The
/// price of consuming `n` units is the area under the curve `k / x` between
/// the current supply and the supply left afterwards, so cost climbs steeply
/// as the supply drains.
///
/// All parameters except `resource_supply` are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMarket {
    block_budget: u64,
    block_print_rate: u64,
    block_limit: u64,
    resource_supply: u64,
    decay_constant: u64,
    one_minus_decay_constant: u64,
    decay_window_blocks: u64,
    /// Virtual liquidity `p`, Q64.64 scaled by `1 / (1 - d)`.
    virtual_liquidity: u128,
    /// Cost curve numerator.
    k: u128,
}

impl ResourceMarket {
    /// Build a market at its steady-state supply:
    ///
    /// ```text
    /// resource_supply = (block_print_rate << 64) / ONE_MINUS_DECAY_CONSTANT
    /// ```
    ///
    /// This is the level where per-block decay exactly offsets the print
    /// rate when nothing is consumed.
    pub fn new(params: &ResourceParams, protocol: &ProtocolParams) -> Result<Self, MarketError> {
        let mut market = Self::with_supply(params, protocol, 0)?;
        market.resource_supply = market.steady_state_supply()?;
        Ok(market)
    }

    /// Rebuild a market from a persisted `resource_supply`.
    ///
    /// The supply is taken as-is; a restored value must be bit-exact with
    /// what [`ResourceMarket::update`] would have produced.
    pub fn with_supply(
        params: &ResourceParams,
        protocol: &ProtocolParams,
        resource_supply: u64,
    ) -> Result<Self, MarketError> {
        protocol.validate()?;
        params.validate(protocol)?;

        let block_print_rate = params.block_print_rate(protocol)?;
        let virtual_liquidity = virtual_liquidity(
            block_print_rate,
            params.block_budget,
            protocol.one_minus_decay_constant,
        )?;
        if virtual_liquidity <= u128::from(params.block_budget) {
            return Err(MarketError::InvalidConfig {
                reason: format!(
                    "virtual liquidity ({virtual_liquidity}) must exceed block_budget ({})",
                    params.block_budget
                ),
            });
        }
        let k = curve_constant(
            protocol.token_supply_per_block()?,
            virtual_liquidity,
            params.block_budget,
        )
        .ok_or_else(|| MarketError::InvalidConfig {
            reason: format!(
                "cost curve constant overflows u128 (budget {}, liquidity {virtual_liquidity})",
                params.block_budget
            ),
        })?;

        let market = Self {
            block_budget: params.block_budget,
            block_print_rate,
            block_limit: params.block_limit,
            resource_supply,
            decay_constant: protocol.decay_constant,
            one_minus_decay_constant: protocol.one_minus_decay_constant,
            decay_window_blocks: protocol.decay_window_blocks,
            virtual_liquidity,
            k,
        };
        market.steady_state_supply().map_err(|_| MarketError::InvalidConfig {
            reason: format!(
                "steady-state supply for print rate {block_print_rate} does not fit in u64"
            ),
        })?;
        Ok(market)
    }

    pub fn block_budget(&self) -> u64 {
        self.block_budget
    }

    pub fn block_print_rate(&self) -> u64 {
        self.block_print_rate
    }

    pub fn block_limit(&self) -> u64 {
        self.block_limit
    }

    pub fn resource_supply(&self) -> u64 {
        self.resource_supply
    }

    /// Virtual liquidity `p = ((print_rate - budget) << 64) / (1 - d)`.
    pub fn virtual_liquidity(&self) -> u128 {
        self.virtual_liquidity
    }

    /// Cost curve constant:
    ///
    /// ```text
    /// K = TOKEN_SUPPLY_PER_BLOCK * p / block_budget * (p - block_budget)
    /// ```
    ///
    /// Depends only on constants, so it is computed once at construction.
    pub fn k(&self) -> u128 {
        self.k
    }

    /// Supply at which decay offsets the print rate under zero consumption.
    pub fn steady_state_supply(&self) -> Result<u64, MarketError> {
        let supply = shl_64_div(self.block_print_rate, u128::from(self.one_minus_decay_constant))
            .ok_or(MarketError::Overflow)?;
        u64::try_from(supply).map_err(|_| MarketError::Overflow)
    }

    /// Quote the consumable limit and unit cost for the current block.
    ///
    /// ```text
    /// limit       = min(supply - 1, block_limit)
    /// new_supply  = supply - limit
    /// consumed_rc = ceil(k / new_supply) - floor(k / supply)
    /// cost        = ceil(consumed_rc / limit)
    /// ```
    ///
    /// Rounding is asymmetric so the quote never undercharges. The cost is
    /// at most `consumed_rc <= k`, so a thin supply prices high but never
    /// fails to quote.
    pub fn calculate_limit(&self) -> Result<ResourceQuote, MarketError> {
        if self.resource_supply <= 1 {
            warn!(
                "resource market degenerate: supply={} budget={}",
                self.resource_supply, self.block_budget
            );
            return Err(MarketError::DegenerateSupply {
                resource_supply: self.resource_supply,
            });
        }

        // supply >= 2 and block_limit >= block_budget > 0, so limit >= 1.
        let limit = self
            .resource_supply
            .checked_sub(1)
            .ok_or(MarketError::Overflow)?
            .min(self.block_limit);
        let new_supply = self
            .resource_supply
            .checked_sub(limit)
            .ok_or(MarketError::Overflow)?;

        let upper = ceil_div(self.k, u128::from(new_supply)).ok_or(MarketError::Overflow)?;
        let lower = floor_div(self.k, u128::from(self.resource_supply)).ok_or(MarketError::Overflow)?;
        let consumed_rc = upper.checked_sub(lower).ok_or(MarketError::Overflow)?;

        let cost = ceil_div(consumed_rc, u128::from(limit)).ok_or(MarketError::Overflow)?;

        Ok(ResourceQuote { limit, cost })
    }

    /// Supply after one block that consumed `consumed` units, without
    /// applying it.
    ///
    /// ```text
    /// next = floor(supply * DECAY_CONSTANT / 2^64) + block_print_rate - consumed
    /// ```
    pub fn next_supply(&self, consumed: u64) -> Result<u64, MarketError> {
        let decayed = mul_shift_64(u128::from(self.resource_supply), self.decay_constant)
            .ok_or(MarketError::Overflow)?;
        let available = decayed
            .checked_add(u128::from(self.block_print_rate))
            .ok_or(MarketError::Overflow)?;
        let next = available
            .checked_sub(u128::from(consumed))
            .ok_or_else(|| MarketError::SupplyUnderflow {
                resource_supply: self.resource_supply,
                consumed,
                available: u64::try_from(available).unwrap_or(u64::MAX),
            })?;
        u64::try_from(next).map_err(|_| MarketError::Overflow)
    }

    /// Apply decay, replenishment and consumption for one block.
    ///
    /// `consumed` is not checked against the last quote; that is the caller's
    /// obligation. On error the supply is left untouched.
    pub fn update(&mut self, consumed: u64) -> Result<(), MarketError> {
        self.resource_supply = self.next_supply(consumed)?;
        Ok(())
    }

    /// Largest cumulative token throughput, over one decay window, that the
    /// `u128` cost arithmetic can represent:
    ///
    /// ```text
    /// floor((2^128 - 1) / p) * decay_window_blocks
    /// ```
    ///
    /// A configuration sanity bound, not a per-block check.
    pub fn overflow_token_limit(&self) -> Result<u128, MarketError> {
        u128::MAX
            .checked_div(self.virtual_liquidity)
            .and_then(|limit| limit.checked_mul(u128::from(self.decay_window_blocks)))
            .ok_or(MarketError::Overflow)
    }

    pub(crate) fn set_resource_supply(&mut self, resource_supply: u64) {
        self.resource_supply = resource_supply;
    }
}

impl fmt::Display for ResourceMarket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "resource_supply: {}, block_budget: {}, block_print_rate: {}, block_limit: {}, k: {}",
            self.resource_supply, self.block_budget, self.block_print_rate, self.block_limit, self.k
        )
    }
}

fn virtual_liquidity(
    block_print_rate: u64,
    block_budget: u64,
    one_minus_decay_constant: u64,
) -> Result<u128, MarketError> {
    let surplus = block_print_rate
        .checked_sub(block_budget)
        .ok_or(MarketError::Overflow)?;
    shl_64_div(surplus, u128::from(one_minus_decay_constant)).ok_or(MarketError::Overflow)
}

fn curve_constant(token_supply_per_block: u64, p: u128, block_budget: u64) -> Option<u128> {
    u128::from(token_supply_per_block)
        .checked_mul(p)?
        .checked_div(u128::from(block_budget))?
        .checked_mul(p.checked_sub(u128::from(block_budget))?)
}
