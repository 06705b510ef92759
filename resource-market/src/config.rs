use {
    crate::{constants::*, error::MarketError, markets::ResourceKind},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
};

/// Chain-wide parameters shared by every resource market.
///
/// These are consensus constants: every node validating the same chain must
/// use identical values for the lifetime of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[serde(default)]
pub struct ProtocolParams {
    /// Total token units ever in existence.
    pub token_supply: u64,

    /// Blocks in the reference decay window (one half-life).
    /// `token_supply / decay_window_blocks` is the per-block token supply
    /// that scales every cost curve.
    pub decay_window_blocks: u64,

    /// Blocks per day, the window used when converting a spend rate into a
    /// per-block allowance.
    pub blocks_per_day: u64,

    /// Q64.64 per-block decay factor `d = 2^(-1/decay_window_blocks)`.
    pub decay_constant: u64,

    /// Q64.64 `1 - d`. Supplied alongside `decay_constant` rather than
    /// derived from it, so rounding matches the chain's genesis exactly.
    pub one_minus_decay_constant: u64,

    /// Numerator of the print-rate premium applied to each block budget.
    pub print_rate_premium: u64,

    /// Denominator of the print-rate premium.
    pub print_rate_precision: u64,
}

impl ProtocolParams {
    /// Token supply attributed to one block of the decay window (floor).
    #[inline]
    pub fn token_supply_per_block(&self) -> Result<u64, MarketError> {
        self.token_supply
            .checked_div(self.decay_window_blocks)
            .ok_or(MarketError::Overflow)
    }

    /// Validate the chain-wide parameters.
    pub fn validate(&self) -> Result<(), MarketError> {
        if self.decay_window_blocks == 0 {
            return Err(invalid("decay_window_blocks must be > 0"));
        }
        if self.blocks_per_day == 0 {
            return Err(invalid("blocks_per_day must be > 0"));
        }
        if self.token_supply_per_block()? == 0 {
            return Err(invalid(format!(
                "token_supply ({}) must be at least decay_window_blocks ({})",
                self.token_supply, self.decay_window_blocks
            )));
        }
        if self.decay_constant == 0 || self.one_minus_decay_constant == 0 {
            return Err(invalid("decay constants must both be > 0"));
        }
        let sum = u128::from(self.decay_constant)
            .checked_add(u128::from(self.one_minus_decay_constant))
            .ok_or(MarketError::Overflow)?;
        if sum > 1u128 << 64 {
            return Err(invalid(format!(
                "decay_constant ({}) + one_minus_decay_constant ({}) exceeds 1.0",
                self.decay_constant, self.one_minus_decay_constant
            )));
        }
        if self.print_rate_precision == 0 {
            return Err(invalid("print_rate_precision must be > 0"));
        }
        if self.print_rate_premium <= self.print_rate_precision {
            return Err(invalid(format!(
                "print rate premium {}/{} must be greater than 1",
                self.print_rate_premium, self.print_rate_precision
            )));
        }
        Ok(())
    }
}

impl Default for ProtocolParams {
    /// Reference chain parameters.
    fn default() -> Self {
        Self {
            token_supply: TOKEN_SUPPLY,
            decay_window_blocks: DECAY_WINDOW_BLOCKS,
            blocks_per_day: BLOCKS_PER_DAY,
            decay_constant: DECAY_CONSTANT,
            one_minus_decay_constant: ONE_MINUS_DECAY_CONSTANT,
            print_rate_premium: PRINT_RATE_PREMIUM,
            print_rate_precision: PRINT_RATE_PRECISION,
        }
    }
}

/// Per-resource throughput parameters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct ResourceParams {
    /// Target steady-state consumption per block.
    pub block_budget: u64,

    /// Hard cap on consumption per block. Must be >= `block_budget`.
    pub block_limit: u64,
}

impl ResourceParams {
    pub const fn new(block_budget: u64, block_limit: u64) -> Self {
        Self {
            block_budget,
            block_limit,
        }
    }

    /// Supply added back every block:
    ///
    /// ```text
    /// block_print_rate = block_budget * print_rate_premium / print_rate_precision
    /// ```
    pub fn block_print_rate(&self, protocol: &ProtocolParams) -> Result<u64, MarketError> {
        let scaled = u128::from(self.block_budget)
            .checked_mul(u128::from(protocol.print_rate_premium))
            .ok_or(MarketError::Overflow)?
            .checked_div(u128::from(protocol.print_rate_precision))
            .ok_or(MarketError::Overflow)?;
        u64::try_from(scaled).map_err(|_| MarketError::Overflow)
    }

    /// Validate against the protocol parameters. The cost-curve checks that
    /// need the derived constants live in [`crate::market::ResourceMarket::new`].
    pub fn validate(&self, protocol: &ProtocolParams) -> Result<(), MarketError> {
        if self.block_budget == 0 {
            return Err(invalid("block_budget must be > 0"));
        }
        if self.block_limit < self.block_budget {
            return Err(invalid(format!(
                "block_limit ({}) < block_budget ({})",
                self.block_limit, self.block_budget
            )));
        }
        let print_rate = self.block_print_rate(protocol)?;
        if print_rate <= self.block_budget {
            return Err(invalid(format!(
                "block_print_rate ({print_rate}) must exceed block_budget ({})",
                self.block_budget
            )));
        }
        Ok(())
    }
}

/// Full configuration of the three resource markets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[serde(default)]
pub struct MarketsConfig {
    pub protocol: ProtocolParams,
    pub disk_storage: ResourceParams,
    pub network_bandwidth: ResourceParams,
    pub compute_bandwidth: ResourceParams,
}

impl MarketsConfig {
    /// Parameters for one resource kind.
    pub fn resource(&self, kind: ResourceKind) -> &ResourceParams {
        match kind {
            ResourceKind::DiskStorage => &self.disk_storage,
            ResourceKind::NetworkBandwidth => &self.network_bandwidth,
            ResourceKind::ComputeBandwidth => &self.compute_bandwidth,
        }
    }

    /// Validate the protocol parameters and every resource.
    pub fn validate(&self) -> Result<(), MarketError> {
        self.protocol.validate()?;
        for kind in ResourceKind::ALL {
            self.resource(kind)
                .validate(&self.protocol)
                .map_err(|err| match err {
                    MarketError::InvalidConfig { reason } => invalid(format!("{kind}: {reason}")),
                    other => other,
                })?;
        }
        Ok(())
    }

    /// Parse a TOML document. Missing tables and keys fall back to the
    /// reference values.
    ///
    /// ```toml
    /// [protocol]
    /// token_supply = 5000000000000000
    ///
    /// [disk_storage]
    /// block_budget = 39600
    /// block_limit = 524288
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, MarketError> {
        let config: Self = toml::from_str(text).map_err(|err| MarketError::ConfigParse {
            reason: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for MarketsConfig {
    /// Reference chain markets.
    fn default() -> Self {
        Self {
            protocol: ProtocolParams::default(),
            disk_storage: ResourceParams::new(DISK_BUDGET_PER_BLOCK, MAX_DISK_PER_BLOCK),
            network_bandwidth: ResourceParams::new(NETWORK_BUDGET_PER_BLOCK, MAX_NETWORK_PER_BLOCK),
            compute_bandwidth: ResourceParams::new(COMPUTE_BUDGET_PER_BLOCK, MAX_COMPUTE_PER_BLOCK),
        }
    }
}

fn invalid(reason: impl Into<String>) -> MarketError {
    MarketError::InvalidConfig {
        reason: reason.into(),
    }
}
