use std::sync::Mutex;
use std::time::Duration;

use crate::table::Philosopher;

#[derive(Debug, Default, Clone)]
pub struct PhilosopherStats {
    pub meals: usize,
    pub wait_times: Vec<Duration>, // 待ち時間 (時系列順)
}

/// 哲学者ごとの食事回数と待ち時間を集める
///
/// 哲学者ごとに別のロックを持つので、違う哲学者同士が記録で待つことはない。
/// 戦略側のロックとは共有しない。
pub struct Stats {
    per_philosopher: Vec<Mutex<PhilosopherStats>>,
}

impl Stats {
    pub fn new(n: usize) -> Self {
        Stats {
            per_philosopher: (0..n).map(|_| Mutex::new(PhilosopherStats::default())).collect(),
        }
    }

    pub fn record(&self, id: usize, wait: Duration) {
        let mut s = self.per_philosopher[id].lock().unwrap();
        s.meals += 1;
        s.wait_times.push(wait);
    }

    // 所有権ごと受け取るので、記録中のスレッドが残っていれば呼べない
    pub fn into_summary(self, philosophers: &[Philosopher]) -> Vec<MealSummary> {
        self.per_philosopher
            .into_iter()
            .zip(philosophers)
            .map(|(s, p)| {
                let s = s.into_inner().unwrap();
                MealSummary::new(p, &s)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealSummary {
    pub id: usize,
    pub name: String,
    pub meals: usize,
    pub mean_wait_ms: f64,
    pub max_wait: Duration,
}

impl MealSummary {
    fn new(p: &Philosopher, s: &PhilosopherStats) -> Self {
        let total: Duration = s.wait_times.iter().sum();
        let mean_wait_ms = if s.wait_times.is_empty() {
            0.0
        } else {
            total.as_secs_f64() * 1000.0 / s.wait_times.len() as f64
        };
        MealSummary {
            id: p.id(),
            name: p.name().to_string(),
            meals: s.meals,
            mean_wait_ms,
            max_wait: s.wait_times.iter().max().copied().unwrap_or_default(),
        }
    }
}
