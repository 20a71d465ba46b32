use std::fmt;
use std::sync::Arc;

use crate::fork::ForkSet;
use crate::monitor::Monitor;
use crate::mutex_fork::MutexForks;
use crate::room::SemaphoreRoom;
use crate::waiter::Waiter;

/// フォークの割り当て方
///
/// `request(id)` から戻った時点で哲学者 id は左右のフォークを両方持っている。
/// `release(id)` は同じ哲学者のスレッドから、対応する `request(id)` の後に 1 回だけ呼ぶ。
pub trait Strategy: Send + Sync {
    fn request(&self, id: usize);
    fn release(&self, id: usize);

    // 誰もフォーク・ゲート・状態を保持していないか (終了後の漏れ検査用)
    fn is_idle(&self) -> bool;

    // 哲学者 id が panic したときに呼ぶ。待っている全員を起こし、以降の request は panic する
    fn abort(&self, id: usize);
}

// メニューの番号と対応する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Monitor = 1,
    Semaphore = 2,
    OrderedLock = 3,
    Arbiter = 4,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Monitor,
        StrategyKind::Semaphore,
        StrategyKind::OrderedLock,
        StrategyKind::Arbiter,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Monitor => "monitor",
            StrategyKind::Semaphore => "semaphore",
            StrategyKind::OrderedLock => "mutex-fork",
            StrategyKind::Arbiter => "waiter",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrategyKind::Monitor => "Monitor",
            StrategyKind::Semaphore => "Semaphores",
            StrategyKind::OrderedLock => "Mutex per fork",
            StrategyKind::Arbiter => "Waiter / arbiter",
        }
    }

    // 毎回新しい状態で作る。forks は実行後の検査のために呼び出し側も持つ
    pub fn build(self, forks: Arc<ForkSet>) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Monitor => Box::new(Monitor::new(forks)),
            StrategyKind::Semaphore => Box::new(SemaphoreRoom::new(forks)),
            StrategyKind::OrderedLock => Box::new(MutexForks::new(forks)),
            StrategyKind::Arbiter => Box::new(Waiter::new(forks)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_codes() {
        assert_eq!(StrategyKind::from_code(1), Some(StrategyKind::Monitor));
        assert_eq!(StrategyKind::from_code(2), Some(StrategyKind::Semaphore));
        assert_eq!(StrategyKind::from_code(3), Some(StrategyKind::OrderedLock));
        assert_eq!(StrategyKind::from_code(4), Some(StrategyKind::Arbiter));
        assert_eq!(StrategyKind::from_code(0), None);
        assert_eq!(StrategyKind::from_code(9), None);
    }

    #[test]
    fn test_build_is_idle() {
        for kind in StrategyKind::ALL {
            let forks = Arc::new(ForkSet::new(5));
            let strategy = kind.build(forks.clone());
            assert!(strategy.is_idle(), "{kind}");

            strategy.request(2);
            assert_eq!(forks.holder(2), Some(2), "{kind}");
            assert_eq!(forks.holder(3), Some(2), "{kind}");
            assert!(!strategy.is_idle(), "{kind}");

            strategy.release(2);
            assert!(strategy.is_idle(), "{kind}");
            assert!(forks.is_all_free(), "{kind}");
        }
    }

    #[test]
    fn test_abort_wakes_blocked_neighbor() {
        for kind in StrategyKind::ALL {
            let forks = Arc::new(ForkSet::new(3));
            let strategy = kind.build(forks.clone());
            // 1 がフォークを持ったまま戻ってこない
            strategy.request(1);

            thread::scope(|s| {
                let t = s.spawn(|| strategy.request(0));
                thread::sleep(Duration::from_millis(50));
                strategy.abort(1);
                assert!(t.join().is_err(), "{kind}");
            });
            assert_eq!(forks.aborted_by(), Some(1), "{kind}");

            // abort 後は新しく来た哲学者もすぐ失敗する
            thread::scope(|s| {
                let t = s.spawn(|| strategy.request(2));
                assert!(t.join().is_err(), "{kind}");
            });
        }
    }
}
