//! # Resource Market
//!
//! Deterministic **congestion pricing** for three block resources: disk
//! storage, network bandwidth and compute bandwidth.
//!
//! Each resource has a [`ResourceMarket`] holding a decaying *virtual supply*.
//! Every block the market quotes how many units may be consumed and what one
//! unit costs in resource credits (RC); afterwards the block's actual
//! consumption is applied. Consumption above the budget drains the supply and
//! raises the price, idle blocks let it recover. All arithmetic is exact
//! integer arithmetic, so every node computes identical quotes.
//!
//! ## Quick start
//!
//! ```rust
//! use resource_market::{budget, Markets, MarketsConfig};
//!
//! let config = MarketsConfig::default();
//! let mut markets = Markets::new(&config).unwrap();
//!
//! // Quote the current block.
//! let limits = markets.resource_limits().unwrap();
//! assert_eq!(limits.disk_storage.cost, 48_555);
//!
//! // Spend 25% of supply per day, split across the three resources.
//! let rc = budget::rc_per_block(&config.protocol, 2_500).unwrap();
//! let [disk, network, compute] = budget::split_evenly(&limits, rc);
//!
//! // Apply the block.
//! markets.consume_block_resources(disk, network, compute).unwrap();
//! assert_eq!(markets.height(), 1);
//! ```
//!
//! See [`market`] for the pricing formulas and [`config`] for parameters.

#![cfg_attr(test, allow(clippy::arithmetic_side_effects, clippy::default_trait_access))]

pub mod budget;
pub mod config;
pub mod constants;
pub mod error;
pub mod fixed_point;
pub mod market;
pub mod markets;


// Re-exports for convenience.
pub use {
    config::{MarketsConfig, ProtocolParams, ResourceParams},
    error::MarketError,
    market::{ResourceMarket, ResourceQuote},
    markets::{Markets, ResourceKind, ResourceLimits, ResourceMarketSnapshot, ResourceMarketsSnapshot},
};
