use {crate::markets::ResourceKind, thiserror::Error};

/// Errors produced by the resource-market subsystem.
///
/// None of these are transient. Any of them invalidates the block being
/// processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    /// The configuration cannot produce a meaningful cost curve
    /// (e.g. print rate not above budget, limit below budget).
    #[error("Invalid resource market configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The virtual supply has fallen to the point where no unit can be
    /// quoted. The per-unit cost is undefined here, not zero or infinite.
    #[error("Degenerate resource supply ({resource_supply}): no consumable limit can be quoted")]
    DegenerateSupply { resource_supply: u64 },

    /// A block reported more consumption than the decayed supply plus the
    /// print rate can cover. Only possible when the caller ignored the
    /// quoted limit.
    #[error(
        "Resource supply underflow: consumed {consumed} but only {available} available \
         (supply before block {resource_supply})"
    )]
    SupplyUnderflow {
        resource_supply: u64,
        consumed: u64,
        available: u64,
    },

    /// A persisted snapshot does not belong to the configuration it is being
    /// restored against.
    #[error("Snapshot mismatch for {kind} market: {reason}")]
    SnapshotMismatch { kind: ResourceKind, reason: String },

    /// The configuration text could not be parsed.
    #[error("Failed to parse resource market configuration: {reason}")]
    ConfigParse { reason: String },

    /// A checked operation exceeded its integer width.
    #[error("Resource market arithmetic overflow")]
    Overflow,
}
