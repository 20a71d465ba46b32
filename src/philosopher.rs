use std::ops::RangeInclusive;
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error};

use crate::config::SimConfig;
use crate::stats::Stats;
use crate::strategy::Strategy;
use crate::table::Philosopher;

// 哲学者 1 人分の一生
// 待つ -> 食べる -> フォークを返す -> 考える を rounds 回繰り返す
pub fn dine(who: &Philosopher, strategy: &dyn Strategy, stats: &Stats, config: &SimConfig) {
    let id = who.id();
    let _guard = AbortOnPanic { id, strategy };
    let mut rng = match config.seed {
        // 哲学者ごとに別の乱数列にする
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id as u64)),
        None => StdRng::from_entropy(),
    };

    for round in 0..config.rounds {
        let start = Instant::now();
        strategy.request(id);
        let waited = start.elapsed();

        stats.record(id, waited);
        debug!(
            philosopher = id,
            round,
            waited_ms = waited.as_secs_f64() * 1000.0,
            "eating"
        );

        pause(&mut rng, &config.eat_ms);
        strategy.release(id);

        pause(&mut rng, &config.think_ms);
    }
}

// panic で抜けるときに戦略を止め、フォーク待ちで眠っている哲学者を全員起こす
// これがないと panic した哲学者が持っていたフォークを隣人が永遠に待つ
struct AbortOnPanic<'a> {
    id: usize,
    strategy: &'a dyn Strategy,
}

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            error!(philosopher = self.id, "philosopher panicked, aborting the run");
            self.strategy.abort(self.id);
        }
    }
}

fn pause(rng: &mut StdRng, range_ms: &RangeInclusive<u64>) {
    let ms = rng.gen_range(range_ms.clone());
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}
