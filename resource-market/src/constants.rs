//! Reference protocol parameters.
//!
//! These are the values every node of the reference chain agrees on. They
//! feed [`crate::config::MarketsConfig::default`]; a chain with different
//! parameters supplies its own config instead of editing these.

/// Total token units ever in existence.
pub const TOKEN_SUPPLY: u64 = 5_000_000_000_000_000;

/// Blocks produced per day. This is the window for spend-rate budgeting.
pub const BLOCKS_PER_DAY: u64 = 86_400 * 5 / 3;

/// Half-life of the virtual supply, in days.
pub const DECAY_HALF_LIFE_DAYS: u64 = 3;

/// Blocks in one decay half-life, the reference window for per-block supply.
pub const DECAY_WINDOW_BLOCKS: u64 = BLOCKS_PER_DAY * DECAY_HALF_LIFE_DAYS;

/// Token supply attributed to a single block of the reference window.
pub const TOKEN_SUPPLY_PER_BLOCK: u64 = TOKEN_SUPPLY / DECAY_WINDOW_BLOCKS;

// ---------------------------------------------------------------------------
// Decay, Q64.64
//
//   d     = 2^(-1 / DECAY_WINDOW_BLOCKS)
//   DECAY = d * 2^64
//   ONE_MINUS_DECAY = (1 - d) * 2^64
//
// Precomputed; never derived at runtime.
// ---------------------------------------------------------------------------

/// Per-block multiplicative decay factor for a 3 day half-life.
pub const DECAY_CONSTANT: u64 = 18_446_596_084_619_782_819;

/// `1 - DECAY_CONSTANT` in Q64.64.
pub const ONE_MINUS_DECAY_CONSTANT: u64 = 147_989_089_768_795;

// ---------------------------------------------------------------------------
// Print rate premium: print_rate = budget * 1688 / 1000
// ---------------------------------------------------------------------------

pub const PRINT_RATE_PREMIUM: u64 = 1_688;
pub const PRINT_RATE_PRECISION: u64 = 1_000;

// ---------------------------------------------------------------------------
// Per-resource budgets and hard caps
// ---------------------------------------------------------------------------

pub const DISK_BUDGET_PER_BLOCK: u64 = 39_600;
pub const MAX_DISK_PER_BLOCK: u64 = 1 << 19;

pub const NETWORK_BUDGET_PER_BLOCK: u64 = 1 << 18;
pub const MAX_NETWORK_PER_BLOCK: u64 = 1 << 20;

pub const COMPUTE_BUDGET_PER_BLOCK: u64 = 57_500_000;
pub const MAX_COMPUTE_PER_BLOCK: u64 = 287_500_000;

/// Basis points denominator (10_000 bps = 100%).
pub const BPS_DENOMINATOR: u64 = 10_000;
