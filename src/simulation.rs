use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::config::SimConfig;
use crate::error::DiningError;
use crate::fork::ForkSet;
use crate::philosopher::dine;
use crate::stats::{MealSummary, Stats};
use crate::strategy::{Strategy, StrategyKind};
use crate::table::DiningTable;

// 設定とテーブルだけを持つ。フォーク・戦略・統計は run のたびに作り直す
pub struct Simulation {
    config: SimConfig,
    table: DiningTable,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, DiningError> {
        config.validate()?;
        let table = DiningTable::new(config.philosophers);
        Ok(Simulation { config, table })
    }

    pub fn table(&self) -> &DiningTable {
        &self.table
    }

    pub fn run(&self, kind: StrategyKind) -> Result<RunReport, DiningError> {
        let forks = Arc::new(ForkSet::new(self.table.len()));
        let strategy = kind.build(forks.clone());
        self.run_strategy(kind, strategy.as_ref(), &forks)
    }

    fn run_strategy(
        &self,
        kind: StrategyKind,
        strategy: &dyn Strategy,
        forks: &ForkSet,
    ) -> Result<RunReport, DiningError> {
        let stats = Stats::new(self.table.len());

        info!(
            strategy = kind.name(),
            philosophers = self.table.len(),
            rounds = self.config.rounds,
            "simulation started"
        );

        let start = Instant::now();
        let panicked = self.spawn_all(strategy, &stats);
        let elapsed = start.elapsed();

        // 巻き込まれて panic した哲学者ではなく、最初に panic した哲学者を報告する
        if let Some(id) = forks.aborted_by().or_else(|| panicked.first().copied()) {
            error!(strategy = kind.name(), philosopher = id, "philosopher panicked");
            return Err(DiningError::PhilosopherPanicked(id));
        }
        if !strategy.is_idle() || !forks.is_all_free() {
            return Err(DiningError::ResourceLeak(kind.name()));
        }

        info!(
            strategy = kind.name(),
            elapsed_ms = elapsed.as_millis() as u64,
            "simulation finished"
        );

        Ok(RunReport {
            kind,
            philosophers: stats.into_summary(self.table.philosophers()),
            elapsed,
            peak_diners: forks.peak_diners(),
        })
    }

    // 哲学者 1 人につき 1 スレッド。panic した哲学者の id を返す
    fn spawn_all(&self, strategy: &dyn Strategy, stats: &Stats) -> Vec<usize> {
        let config = &self.config;
        thread::scope(|s| {
            let v: Vec<_> = self
                .table
                .philosophers()
                .iter()
                .map(|p| (p.id(), s.spawn(move || dine(p, strategy, stats, config))))
                .collect();

            v.into_iter()
                .filter_map(|(id, t)| t.join().err().map(|_| id))
                .collect()
        })
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub kind: StrategyKind,
    pub philosophers: Vec<MealSummary>,
    pub elapsed: Duration,
    pub peak_diners: usize, // 同時に食事していた最大人数
}

impl RunReport {
    pub fn total_meals(&self) -> usize {
        self.philosophers.iter().map(|p| p.meals).sum()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== RESULTS: {} ===", self.kind.label())?;
        for p in &self.philosophers {
            writeln!(
                f,
                "{} -> meals: {}, mean wait: {:.2} ms, max wait: {} ms",
                p.name,
                p.meals,
                p.mean_wait_ms,
                p.max_wait.as_millis()
            )?;
        }
        writeln!(f, "Total simulation time: {} ms", self.elapsed.as_millis())?;
        writeln!(f, "Peak simultaneous diners: {}", self.peak_diners)?;
        write!(f, "==============================")
    }
}
