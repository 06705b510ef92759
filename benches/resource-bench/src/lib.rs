//! Resource Market Benchmark Suite
//!
//! Run all benchmarks:
//! ```bash
//! cargo bench -p resource-bench
//! ```
