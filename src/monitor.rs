use std::sync::{Arc, Condvar, Mutex, PoisonError};

use crate::fork::ForkSet;
use crate::strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Thinking,
    Hungry, // フォーク待ち
    Eating,
}

// モニタ
// 状態は 1 つのロックで守り、食べてよいかの判断は必ずロックの中で行う
// フォークは 2 本まとめて渡すので、1 本だけ持って待つ哲学者はいない
// 両隣が交互に食べ続けると飢餓は起こりうる
pub struct Monitor {
    state: Mutex<Vec<State>>,
    conds: Vec<Condvar>, // 哲学者ごとの待ち行列
    forks: Arc<ForkSet>,
}

impl Monitor {
    pub fn new(forks: Arc<ForkSet>) -> Self {
        let n = forks.len();
        Monitor {
            state: Mutex::new(vec![State::Thinking; n]),
            conds: (0..n).map(|_| Condvar::new()).collect(),
            forks,
        }
    }

    pub fn state(&self, id: usize) -> State {
        self.state.lock().unwrap()[id]
    }

    // 空腹で両隣が食事中でなければ食べさせる
    fn test(&self, state: &mut [State], id: usize) {
        let (left, right) = self.forks.neighbors_of(id);
        if state[id] == State::Hungry && state[left] != State::Eating && state[right] != State::Eating
        {
            state[id] = State::Eating;
            self.forks.take_pair(id);
            self.conds[id].notify_one();
        }
    }
}

impl Strategy for Monitor {
    fn request(&self, id: usize) {
        let mut state = self.state.lock().unwrap();
        state[id] = State::Hungry;
        self.test(&mut state, id);

        // 隣人の release で Eating にしてもらうまで待つ
        // spurious wakeup があるので起きるたびに確認する
        while state[id] != State::Eating {
            if self.forks.is_aborted() {
                drop(state);
                panic!("run aborted while philosopher {id} was hungry");
            }
            state = self.conds[id].wait(state).unwrap();
        }
    }

    fn release(&self, id: usize) {
        let mut state = self.state.lock().unwrap();
        assert_eq!(
            state[id],
            State::Eating,
            "philosopher {id} released forks without eating"
        );
        self.forks.put_pair(id);
        state[id] = State::Thinking;

        let (left, right) = self.forks.neighbors_of(id);
        self.test(&mut state, left);
        self.test(&mut state, right);
    }

    fn is_idle(&self) -> bool {
        self.state
            .lock()
            .unwrap()
            .iter()
            .all(|s| *s == State::Thinking)
    }

    fn abort(&self, id: usize) {
        self.forks.abort(id);
        // ロックを取ってから起こす。待ちに入る直前の哲学者を取りこぼさない
        let _state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        for cond in &self.conds {
            cond.notify_all();
        }
    }
}
