use std::sync::Arc;

use crate::fork::ForkSet;
use crate::semaphore::Semaphore;
use crate::strategy::Strategy;

// セマフォ版
// 部屋に入れるのは N - 1 人まで。N 人全員が左のフォークを握って止まることはない
// 部屋に入った後は左、右の順にフォークを取る
pub struct SemaphoreRoom {
    room: Semaphore,
    sems: Vec<Semaphore>, // フォークごとのバイナリセマフォ
    forks: Arc<ForkSet>,
}

impl SemaphoreRoom {
    pub fn new(forks: Arc<ForkSet>) -> Self {
        let n = forks.len();
        SemaphoreRoom {
            room: Semaphore::new(n - 1),
            sems: (0..n).map(|_| Semaphore::new(1)).collect(),
            forks,
        }
    }

    pub fn room_capacity(&self) -> usize {
        self.room.max()
    }
}

impl Strategy for SemaphoreRoom {
    fn request(&self, id: usize) {
        let (left, right) = self.forks.forks_of(id);
        self.room.wait();

        self.sems[left].wait();
        self.forks.take(left, id);

        self.sems[right].wait();
        self.forks.take(right, id);

        self.forks.sit();
    }

    fn release(&self, id: usize) {
        let (left, right) = self.forks.forks_of(id);
        self.forks.leave();

        // 台帳を先に戻してからセマフォを返す
        self.forks.put(left, id);
        self.sems[left].post();

        self.forks.put(right, id);
        self.sems[right].post();

        self.room.post();
    }

    fn is_idle(&self) -> bool {
        self.room.in_use() == 0 && self.sems.iter().all(|sem| sem.in_use() == 0)
    }

    // panic した哲学者はセマフォを返さないので、全部閉じて待ちを解く
    fn abort(&self, id: usize) {
        self.forks.abort(id);
        self.room.close();
        for sem in &self.sems {
            sem.close();
        }
    }
}
