use anyhow::Context;
use swarmtick_core::{setup_logging, BenchmarkConfig, BenchmarkHarness};

fn main() -> anyhow::Result<()> {
    setup_logging(None);

    let harness = BenchmarkHarness::new(BenchmarkConfig::default())
        .context("invalid benchmark configuration")?;
    let report = harness.run().context("benchmark run failed")?;

    print!("{}", report);
    Ok(())
}
