use std::sync::{Arc, Condvar, Mutex, PoisonError};

use crate::fork::ForkSet;
use crate::strategy::Strategy;

// ウェイター (調停者)
// フォークの空き状況をウェイターが一括で管理し、両方空いているときだけ渡す
// 隣り合う 2 人が同時に食べることはない (人数の上限ではなくフォーク単位で判断する)
pub struct Waiter {
    table: Mutex<Vec<bool>>, // true ならフォークは空き
    cond: Condvar,
    forks: Arc<ForkSet>,
}

impl Waiter {
    pub fn new(forks: Arc<ForkSet>) -> Self {
        Waiter {
            table: Mutex::new(vec![true; forks.len()]),
            cond: Condvar::new(),
            forks,
        }
    }
}

impl Strategy for Waiter {
    fn request(&self, id: usize) {
        let (left, right) = self.forks.forks_of(id);
        let mut table = self.table.lock().unwrap();
        // notify_all で起こされるので、自分のフォークが空いたとは限らない
        while !(table[left] && table[right]) {
            if self.forks.is_aborted() {
                drop(table);
                panic!("run aborted while philosopher {id} was waiting for forks");
            }
            table = self.cond.wait(table).unwrap();
        }
        table[left] = false;
        table[right] = false;
        self.forks.take_pair(id);
    }

    fn release(&self, id: usize) {
        let (left, right) = self.forks.forks_of(id);
        let mut table = self.table.lock().unwrap();
        assert!(
            !table[left] && !table[right],
            "philosopher {id} returned forks the waiter never handed out"
        );
        self.forks.put_pair(id);
        table[left] = true;
        table[right] = true;
        // 誰の条件が満たされたかは分からないので全員起こす
        self.cond.notify_all();
    }

    fn is_idle(&self) -> bool {
        self.table.lock().unwrap().iter().all(|free| *free)
    }

    fn abort(&self, id: usize) {
        self.forks.abort(id);
        let _table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        self.cond.notify_all();
    }
}
