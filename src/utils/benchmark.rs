use crate::core::config::{BenchmarkConfig, ScenarioConfig};
use crate::core::entity::{create_population, Entity};
use crate::core::error::{ConfigError, UpdateResult};
use crate::swarm::{KernelKind, ParallelUpdater, SequentialUpdater, Updater};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::info;

const RULE_WIDTH: usize = 70;
const LABEL_WIDTH: usize = 50;

const SUMMARY: [&str; 4] = [
    "• Small workloads: Parallel SLOWER (overhead > benefit)",
    "• Simple operations: Parallel slightly better with many entities",
    "• Complex CPU-bound work: Parallel 2-4x faster!",
    "• Batch size matters: Too small = overhead, too large = less parallelism",
];

/// Qualitative reading of a speedup ratio. Advisory only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// ratio < 0.8
    Slower,
    /// 0.8 <= ratio < 1.2
    Similar,
    /// 1.2 <= ratio < 2.0
    Faster,
    /// ratio >= 2.0
    MuchFaster,
}

impl Verdict {
    pub fn classify(speedup: f64) -> Self {
        if speedup.is_nan() {
            Verdict::Similar
        } else if speedup < 0.8 {
            Verdict::Slower
        } else if speedup < 1.2 {
            Verdict::Similar
        } else if speedup < 2.0 {
            Verdict::Faster
        } else {
            Verdict::MuchFaster
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Verdict::Slower => "SLOWER (overhead too high)",
            Verdict::Similar => "SIMILAR (marginal difference)",
            Verdict::Faster => "FASTER (good speedup)",
            Verdict::MuchFaster => "MUCH FASTER (excellent speedup)",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// `sequential / parallel`. A zero parallel time reads as infinitely fast,
/// unless both are zero.
///
/// Divides whole nanoseconds so ratios landing on a band edge stay exact.
pub fn speedup(sequential: Duration, parallel: Duration) -> f64 {
    let par = parallel.as_nanos();
    if par > 0 {
        sequential.as_nanos() as f64 / par as f64
    } else if sequential.is_zero() {
        1.0
    } else {
        f64::INFINITY
    }
}

/// Wall-clock time of `ticks` consecutive update passes.
pub fn time_ticks(
    updater: &dyn Updater,
    entities: &mut [Entity],
    dt: f64,
    kernel: KernelKind,
    ticks: usize,
) -> UpdateResult<Duration> {
    let start = Instant::now();
    for _ in 0..ticks {
        updater.update(entities, dt, kernel)?;
    }
    Ok(start.elapsed())
}

#[derive(Clone, Debug, Serialize)]
pub struct Measurement {
    pub label: String,
    pub elapsed: Duration,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParallelRun {
    pub batch_size: usize,
    pub measurement: Measurement,
    pub speedup: f64,
    pub verdict: Verdict,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub population: usize,
    pub kernel: KernelKind,
    pub ticks: usize,
    pub expectation: String,
    pub sequential: Measurement,
    pub parallel: Vec<ParallelRun>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchmarkReport {
    pub generated_at: DateTime<Utc>,
    pub dt: f64,
    pub scenarios: Vec<ScenarioReport>,
}

impl BenchmarkReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== SWARM UPDATE PARALLELISM BENCHMARK ===")?;
        writeln!(f)?;

        for (i, scenario) in self.scenarios.iter().enumerate() {
            writeln!(f, "TEST {}: {}", i + 1, scenario.name)?;
            writeln!(f, "Expected: {}", scenario.expectation)?;
            writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;

            let seq = &scenario.sequential;
            writeln!(f, "{:<width$} {:?}", seq.label, seq.elapsed, width = LABEL_WIDTH)?;
            for run in &scenario.parallel {
                let m = &run.measurement;
                writeln!(f, "{:<width$} {:?}", m.label, m.elapsed, width = LABEL_WIDTH)?;
            }

            if let [run] = scenario.parallel.as_slice() {
                writeln!(f, "Speedup: {:.2}x {}", run.speedup, run.verdict)?;
            } else {
                for run in &scenario.parallel {
                    let tag = format!("(batch={}):", run.batch_size);
                    writeln!(f, "Speedup {:<13} {:.2}x {}", tag, run.speedup, run.verdict)?;
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "SUMMARY:")?;
        for line in SUMMARY {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))
    }
}

/// Runs every configured scenario: sequential first, then each batch size
/// on the same population.
pub struct BenchmarkHarness {
    config: BenchmarkConfig,
    sequential: SequentialUpdater,
}

impl BenchmarkHarness {
    pub fn new(config: BenchmarkConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(BenchmarkHarness {
            config,
            sequential: SequentialUpdater::new(),
        })
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn run(&self) -> UpdateResult<BenchmarkReport> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            "📊 Running {} benchmark scenarios (dt={})...",
            self.config.scenarios.len(),
            self.config.dt
        );

        let scenarios = self
            .config
            .scenarios
            .iter()
            .map(|scenario| self.run_scenario(scenario, &mut rng))
            .collect::<UpdateResult<Vec<_>>>()?;

        info!("📈 Benchmark complete.");

        Ok(BenchmarkReport {
            generated_at: Utc::now(),
            dt: self.config.dt,
            scenarios,
        })
    }

    pub fn run_scenario(&self, scenario: &ScenarioConfig, rng: &mut StdRng) -> UpdateResult<ScenarioReport> {
        info!("🧪 [{}] {}", scenario.name, scenario.expectation);

        let dt = self.config.dt;
        let workload = format!("{} {}", compact_count(scenario.population), scenario.kernel.label());
        let mut entities = create_population(scenario.population, rng);

        let elapsed = time_ticks(&self.sequential, &mut entities, dt, scenario.kernel, scenario.ticks)?;
        let sequential = Measurement {
            label: format!("{} ({})", self.sequential.label(), workload),
            elapsed,
        };
        info!("  {}: {:?}", sequential.label, elapsed);

        let mut parallel = Vec::with_capacity(scenario.batch_sizes.len());
        for &batch_size in &scenario.batch_sizes {
            let updater = self.parallel_updater(batch_size)?;
            let elapsed = time_ticks(&updater, &mut entities, dt, scenario.kernel, scenario.ticks)?;
            let ratio = speedup(sequential.elapsed, elapsed);
            let verdict = Verdict::classify(ratio);
            let measurement = Measurement {
                label: format!("{} ({})", updater.label(), workload),
                elapsed,
            };
            info!("  {}: {:?} -> {:.2}x {}", measurement.label, elapsed, ratio, verdict);

            parallel.push(ParallelRun {
                batch_size: updater.batch_size(),
                measurement,
                speedup: ratio,
                verdict,
            });
        }

        Ok(ScenarioReport {
            name: scenario.name.clone(),
            population: scenario.population,
            kernel: scenario.kernel,
            ticks: scenario.ticks,
            expectation: scenario.expectation.clone(),
            sequential,
            parallel,
        })
    }

    fn parallel_updater(&self, batch_size: usize) -> UpdateResult<ParallelUpdater> {
        match self.config.threads {
            Some(threads) => ParallelUpdater::with_threads(batch_size, threads),
            None => Ok(ParallelUpdater::new(batch_size)),
        }
    }
}

/// 10000 -> "10k", 1500 -> "1500"
fn compact_count(n: usize) -> String {
    if n >= 1000 && n % 1000 == 0 {
        format!("{}k", n / 1000)
    } else {
        n.to_string()
    }
}
