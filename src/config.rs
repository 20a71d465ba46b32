use std::ops::RangeInclusive;
use std::time::Duration;

use crate::error::DiningError;

// 哲学者の数
pub const DEFAULT_PHILOSOPHERS: usize = 5;
// 1 人あたりの食事回数
pub const DEFAULT_ROUNDS: usize = 200;

/// 1 回のシミュレーションのパラメータ
///
/// 食事時間・思考時間はミリ秒の閉区間で、毎回その中から乱数で選ぶ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub philosophers: usize,
    pub rounds: usize,
    pub eat_ms: RangeInclusive<u64>,
    pub think_ms: RangeInclusive<u64>,
    // None ならエントロピーから初期化
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            philosophers: DEFAULT_PHILOSOPHERS,
            rounds: DEFAULT_ROUNDS,
            eat_ms: 10..=29,
            think_ms: 10..=29,
            seed: None,
        }
    }
}

impl SimConfig {
    // スレッドを起動する前に呼ぶ
    pub fn validate(&self) -> Result<(), DiningError> {
        // 1 人だと左右のフォークが同じものになってしまう
        if self.philosophers < 2 {
            return Err(DiningError::InvalidPhilosopherCount(self.philosophers));
        }
        check_interval("eat", &self.eat_ms)?;
        check_interval("think", &self.think_ms)?;
        Ok(())
    }

    // 食事・思考なしで回す設定。テスト用
    pub fn instant(philosophers: usize, rounds: usize) -> Self {
        SimConfig {
            philosophers,
            rounds,
            eat_ms: 0..=0,
            think_ms: 0..=0,
            seed: Some(0),
        }
    }

    // 競合が一切ない場合の所要時間の下限
    pub fn minimum_duration(&self) -> Duration {
        let per_round = self.eat_ms.start() + self.think_ms.start();
        Duration::from_millis(per_round * self.rounds as u64)
    }
}

fn check_interval(what: &'static str, range: &RangeInclusive<u64>) -> Result<(), DiningError> {
    if range.start() > range.end() {
        return Err(DiningError::InvalidInterval {
            what,
            min: *range.start(),
            max: *range.end(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_reject_too_few_philosophers() {
        for n in [0, 1] {
            let config = SimConfig {
                philosophers: n,
                ..SimConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(DiningError::InvalidPhilosopherCount(m)) if m == n
            ));
        }
    }

    #[test]
    fn test_reject_inverted_interval() {
        #[allow(clippy::reversed_empty_ranges)]
        let config = SimConfig {
            think_ms: 30..=5,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DiningError::InvalidInterval { what: "think", min: 30, max: 5 })
        ));
    }

    #[test]
    fn test_minimum_duration() {
        let config = SimConfig {
            rounds: 10,
            eat_ms: 5..=9,
            think_ms: 3..=3,
            ..SimConfig::default()
        };
        assert_eq!(config.minimum_duration(), Duration::from_millis(80));
    }
}
