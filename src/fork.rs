use std::sync::atomic::{AtomicUsize, Ordering};

// 誰も持っていないフォーク
const FREE: usize = usize::MAX;

// フォークの持ち主を記録するだけの台帳
// 排他の方針は各戦略が持ち、ここは「同じフォークを 2 人が持っていないか」だけを検査する
// 違反を見つけたら panic し、その回のシミュレーションは失敗になる
pub struct ForkSet {
    holders: Vec<AtomicUsize>, // フォークごとの持ち主 (FREE なら空き)
    diners: AtomicUsize,       // 両方のフォークを持って食事中の人数
    peak_diners: AtomicUsize,  // diners の最大値
    aborted_by: AtomicUsize,   // 最初に panic した哲学者 (FREE なら正常)
}

impl ForkSet {
    pub fn new(n: usize) -> Self {
        ForkSet {
            holders: (0..n).map(|_| AtomicUsize::new(FREE)).collect(),
            diners: AtomicUsize::new(0),
            peak_diners: AtomicUsize::new(0),
            aborted_by: AtomicUsize::new(FREE),
        }
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    // 哲学者 id が使うフォークは id と (id + 1) mod N
    pub fn forks_of(&self, id: usize) -> (usize, usize) {
        (id, (id + 1) % self.len())
    }

    // 左右の隣人。N = 2 のときは両方とも同じ相手になる
    pub fn neighbors_of(&self, id: usize) -> (usize, usize) {
        let n = self.len();
        ((id + n - 1) % n, (id + 1) % n)
    }

    pub fn take(&self, fork: usize, id: usize) {
        if let Err(holder) =
            self.holders[fork].compare_exchange(FREE, id, Ordering::AcqRel, Ordering::Acquire)
        {
            panic!("fork {fork} taken by philosopher {id} while held by philosopher {holder}");
        }
    }

    pub fn put(&self, fork: usize, id: usize) {
        match self.holders[fork].compare_exchange(id, FREE, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => {}
            Err(FREE) => panic!("fork {fork} released by philosopher {id} without being taken"),
            Err(holder) => {
                panic!("fork {fork} released by philosopher {id} but held by philosopher {holder}")
            }
        }
    }

    // 両方のフォークを取り終えた時点で呼ぶ
    pub fn sit(&self) {
        let now = self.diners.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_diners.fetch_max(now, Ordering::AcqRel);
    }

    pub fn leave(&self) {
        let before = self.diners.fetch_sub(1, Ordering::AcqRel);
        assert!(before > 0, "philosopher left the table while nobody was eating");
    }

    pub fn take_pair(&self, id: usize) {
        let (left, right) = self.forks_of(id);
        self.take(left, id);
        self.take(right, id);
        self.sit();
    }

    pub fn put_pair(&self, id: usize) {
        let (left, right) = self.forks_of(id);
        self.leave();
        self.put(right, id);
        self.put(left, id);
    }

    pub fn holder(&self, fork: usize) -> Option<usize> {
        match self.holders[fork].load(Ordering::Acquire) {
            FREE => None,
            id => Some(id),
        }
    }

    pub fn is_all_free(&self) -> bool {
        self.diners.load(Ordering::Acquire) == 0
            && (0..self.len()).all(|fork| self.holder(fork).is_none())
    }

    pub fn peak_diners(&self) -> usize {
        self.peak_diners.load(Ordering::Acquire)
    }

    // 何度呼ばれても最初の 1 人だけを記録する
    pub fn abort(&self, id: usize) {
        let _ = self
            .aborted_by
            .compare_exchange(FREE, id, Ordering::AcqRel, Ordering::Acquire);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted_by().is_some()
    }

    pub fn aborted_by(&self) -> Option<usize> {
        match self.aborted_by.load(Ordering::Acquire) {
            FREE => None,
            id => Some(id),
        }
    }
}
