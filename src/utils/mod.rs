pub mod benchmark;

pub use benchmark::{BenchmarkHarness, BenchmarkReport, Verdict};
