//! The three resource markets, advanced in lockstep one block at a time.

use {
    crate::{
        config::MarketsConfig,
        error::MarketError,
        market::{ResourceMarket, ResourceQuote},
    },
    borsh::{BorshDeserialize, BorshSerialize},
    log::{debug, trace},
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// An independently priced, independently budgeted resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    DiskStorage,
    NetworkBandwidth,
    ComputeBandwidth,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::DiskStorage,
        ResourceKind::NetworkBandwidth,
        ResourceKind::ComputeBandwidth,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::DiskStorage => "disk_storage",
            ResourceKind::NetworkBandwidth => "network_bandwidth",
            ResourceKind::ComputeBandwidth => "compute_bandwidth",
        })
    }
}

/// Quotes for all three resources, taken at the same block.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct ResourceLimits {
    pub disk_storage: ResourceQuote,
    pub network_bandwidth: ResourceQuote,
    pub compute_bandwidth: ResourceQuote,
}

impl ResourceLimits {
    pub fn quote(&self, kind: ResourceKind) -> &ResourceQuote {
        match kind {
            ResourceKind::DiskStorage => &self.disk_storage,
            ResourceKind::NetworkBandwidth => &self.network_bandwidth,
            ResourceKind::ComputeBandwidth => &self.compute_bandwidth,
        }
    }
}

/// Persistable view of a single market.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct ResourceMarketSnapshot {
    pub resource_supply: u64,
    pub block_budget: u64,
    pub block_limit: u64,
}

impl From<&ResourceMarket> for ResourceMarketSnapshot {
    fn from(market: &ResourceMarket) -> Self {
        Self {
            resource_supply: market.resource_supply(),
            block_budget: market.block_budget(),
            block_limit: market.block_limit(),
        }
    }
}

/// Persistable view of all three markets.
///
/// The embedding system stores this after each block. Restoring it with
/// [`Markets::restore`] continues exactly where the saved engine left off.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct ResourceMarketsSnapshot {
    /// Blocks applied since genesis.
    pub height: u64,
    pub disk_storage: ResourceMarketSnapshot,
    pub network_bandwidth: ResourceMarketSnapshot,
    pub compute_bandwidth: ResourceMarketSnapshot,
}

impl ResourceMarketsSnapshot {
    pub fn market(&self, kind: ResourceKind) -> &ResourceMarketSnapshot {
        match kind {
            ResourceKind::DiskStorage => &self.disk_storage,
            ResourceKind::NetworkBandwidth => &self.network_bandwidth,
            ResourceKind::ComputeBandwidth => &self.compute_bandwidth,
        }
    }
}

/// Disk storage, network bandwidth and compute bandwidth markets.
///
/// Each block the caller:
/// 1. calls [`Markets::resource_limits`] to learn what may be consumed and at
///    what price,
/// 2. admits work within those limits,
/// 3. calls [`Markets::consume_block_resources`] with the actual amounts.
///
/// Blocks must be applied strictly in order, exactly once each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markets {
    height: u64,
    disk_storage: ResourceMarket,
    network_bandwidth: ResourceMarket,
    compute_bandwidth: ResourceMarket,
}

impl Markets {
    /// Genesis markets, each at its steady-state supply.
    pub fn new(config: &MarketsConfig) -> Result<Self, MarketError> {
        config.validate()?;
        Ok(Self {
            height: 0,
            disk_storage: ResourceMarket::new(&config.disk_storage, &config.protocol)?,
            network_bandwidth: ResourceMarket::new(&config.network_bandwidth, &config.protocol)?,
            compute_bandwidth: ResourceMarket::new(&config.compute_bandwidth, &config.protocol)?,
        })
    }

    /// Rebuild markets from a snapshot taken under the same configuration.
    pub fn restore(
        config: &MarketsConfig,
        snapshot: &ResourceMarketsSnapshot,
    ) -> Result<Self, MarketError> {
        config.validate()?;
        let restore_one = |kind: ResourceKind| -> Result<ResourceMarket, MarketError> {
            let params = config.resource(kind);
            let saved = snapshot.market(kind);
            if saved.block_budget != params.block_budget || saved.block_limit != params.block_limit {
                return Err(MarketError::SnapshotMismatch {
                    kind,
                    reason: format!(
                        "snapshot budget/limit {}/{} != config {}/{}",
                        saved.block_budget, saved.block_limit, params.block_budget, params.block_limit
                    ),
                });
            }
            ResourceMarket::with_supply(params, &config.protocol, saved.resource_supply)
        };

        let markets = Self {
            height: snapshot.height,
            disk_storage: restore_one(ResourceKind::DiskStorage)?,
            network_bandwidth: restore_one(ResourceKind::NetworkBandwidth)?,
            compute_bandwidth: restore_one(ResourceKind::ComputeBandwidth)?,
        };
        debug!(
            "restored resource markets at height {}: disk={} network={} compute={}",
            markets.height,
            markets.disk_storage.resource_supply(),
            markets.network_bandwidth.resource_supply(),
            markets.compute_bandwidth.resource_supply(),
        );
        Ok(markets)
    }

    /// Blocks applied since genesis.
    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn market(&self, kind: ResourceKind) -> &ResourceMarket {
        match kind {
            ResourceKind::DiskStorage => &self.disk_storage,
            ResourceKind::NetworkBandwidth => &self.network_bandwidth,
            ResourceKind::ComputeBandwidth => &self.compute_bandwidth,
        }
    }

    /// Quote limit and cost for every resource. Pure read.
    pub fn resource_limits(&self) -> Result<ResourceLimits, MarketError> {
        let limits = ResourceLimits {
            disk_storage: self.disk_storage.calculate_limit()?,
            network_bandwidth: self.network_bandwidth.calculate_limit()?,
            compute_bandwidth: self.compute_bandwidth.calculate_limit()?,
        };
        trace!("resource limits at height {}: {:?}", self.height, limits);
        Ok(limits)
    }

    /// Advance all three markets by one block.
    ///
    /// Either every market advances or none does.
    pub fn consume_block_resources(
        &mut self,
        disk_storage_used: u64,
        network_bandwidth_used: u64,
        compute_bandwidth_used: u64,
    ) -> Result<(), MarketError> {
        let disk = self.disk_storage.next_supply(disk_storage_used)?;
        let network = self.network_bandwidth.next_supply(network_bandwidth_used)?;
        let compute = self.compute_bandwidth.next_supply(compute_bandwidth_used)?;
        let height = self.height.checked_add(1).ok_or(MarketError::Overflow)?;

        self.disk_storage.set_resource_supply(disk);
        self.network_bandwidth.set_resource_supply(network);
        self.compute_bandwidth.set_resource_supply(compute);
        self.height = height;

        debug!(
            "resource markets h={height}: consumed disk={disk_storage_used} network={network_bandwidth_used} \
             compute={compute_bandwidth_used}; supply disk={disk} network={network} compute={compute}"
        );
        Ok(())
    }

    pub fn snapshot(&self) -> ResourceMarketsSnapshot {
        ResourceMarketsSnapshot {
            height: self.height,
            disk_storage: (&self.disk_storage).into(),
            network_bandwidth: (&self.network_bandwidth).into(),
            compute_bandwidth: (&self.compute_bandwidth).into(),
        }
    }

    /// Smallest [`ResourceMarket::overflow_token_limit`] across the markets.
    pub fn overflow_token_limit(&self) -> Result<u128, MarketError> {
        let disk = self.disk_storage.overflow_token_limit()?;
        let network = self.network_bandwidth.overflow_token_limit()?;
        let compute = self.compute_bandwidth.overflow_token_limit()?;
        Ok(disk.min(network).min(compute))
    }
}
