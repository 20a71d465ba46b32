use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::lock_api::{RawMutex as RawMutexApi, RawMutexTimed};
use parking_lot::RawMutex;

use crate::fork::ForkSet;
use crate::strategy::Strategy;

// 中断されていないかを確かめる間隔
const ABORT_POLL: Duration = Duration::from_millis(10);

// フォーク 1 本につき 1 つのミューテックス
// request と release が別の呼び出しになるのでガードではなく生のロックを使う
pub struct MutexForks {
    locks: Vec<RawMutex>,
    forks: Arc<ForkSet>,
}

// 2 つのロックを一度に獲得する (C++ の std::lock と同じやり方)
// 片方を握ったままもう片方を待つことはしない。取れなければ手放し、順番を入れ替えてやり直す
// aborted が true になったら何も持たずに false を返す
fn lock_both(a: &RawMutex, b: &RawMutex, aborted: impl Fn() -> bool) -> bool {
    let (mut first, mut second) = (a, b);
    loop {
        if !first.try_lock_for(ABORT_POLL) {
            if aborted() {
                return false;
            }
            continue;
        }
        if second.try_lock() {
            return true;
        }
        // SAFETY: 直前にこのスレッドで lock している
        unsafe { first.unlock() };
        if aborted() {
            return false;
        }
        thread::yield_now();
        std::mem::swap(&mut first, &mut second);
    }
}

impl MutexForks {
    pub fn new(forks: Arc<ForkSet>) -> Self {
        MutexForks {
            locks: (0..forks.len())
                .map(|_| <RawMutex as RawMutexApi>::INIT)
                .collect(),
            forks,
        }
    }
}

impl Strategy for MutexForks {
    fn request(&self, id: usize) {
        let (left, right) = self.forks.forks_of(id);
        if !lock_both(&self.locks[left], &self.locks[right], || {
            self.forks.is_aborted()
        }) {
            panic!("run aborted while philosopher {id} was waiting for forks");
        }
        self.forks.take_pair(id);
    }

    fn release(&self, id: usize) {
        let (left, right) = self.forks.forks_of(id);
        // 持っていないフォークを返そうとしたらここで panic する
        self.forks.put_pair(id);
        // SAFETY: put_pair が通ったので、request(id) で lock したまま
        // 同じスレッドから呼ばれている (Strategy の約束)
        unsafe {
            self.locks[right].unlock();
            self.locks[left].unlock();
        }
    }

    fn is_idle(&self) -> bool {
        self.locks.iter().all(|lock| !lock.is_locked())
    }

    // panic した哲学者のロックは外せないので、待っている側が ABORT_POLL ごとに気づく
    fn abort(&self, id: usize) {
        self.forks.abort(id);
    }
}
