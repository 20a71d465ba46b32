use std::sync::{Condvar, Mutex, PoisonError};

struct Count {
    used: usize,  // wait を抜けて post していないスレッドの数
    closed: bool, // close 後は誰も wait を抜けられない
}

// 計数セマフォ
// max 個までのスレッドが同時に wait を抜けられる。max = 1 ならバイナリセマフォ
pub struct Semaphore {
    mutex: Mutex<Count>,
    cond: Condvar,
    max: usize,
}

impl Semaphore {
    pub fn new(max: usize) -> Self {
        Semaphore {
            mutex: Mutex::new(Count {
                used: 0,
                closed: false,
            }),
            cond: Condvar::new(),
            max,
        }
    }

    // close されていたら panic する
    pub fn wait(&self) {
        let mut cnt = self.mutex.lock().unwrap();
        // 起こされても空きがあるとは限らないので毎回確認する
        loop {
            if cnt.closed {
                drop(cnt);
                panic!("semaphore closed while waiting");
            }
            if cnt.used < self.max {
                break;
            }
            cnt = self.cond.wait(cnt).unwrap();
        }
        cnt.used += 1;
    }

    pub fn post(&self) {
        let mut cnt = self.mutex.lock().unwrap();
        // wait していないのに post するのは排他がすでに壊れている
        assert!(cnt.used > 0, "semaphore posted more times than waited");
        cnt.used -= 1;
        self.cond.notify_one();
    }

    // 待っているスレッドを全員起こして失敗させる
    // panic の巻き戻し中に呼ばれるので、poison されていても止まらない
    pub fn close(&self) {
        let mut cnt = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);
        cnt.closed = true;
        self.cond.notify_all();
    }

    pub fn in_use(&self) -> usize {
        self.mutex.lock().unwrap().used
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_bound() {
        const NUM_THREADS: usize = 8;
        const NUM_LOOP: usize = 1000;

        let sem = Arc::new(Semaphore::new(3));
        let inside = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut v = Vec::new();
        for _ in 0..NUM_THREADS {
            let sem0 = sem.clone();
            let inside0 = inside.clone();
            let peak0 = peak.clone();
            let t = thread::spawn(move || {
                for _ in 0..NUM_LOOP {
                    sem0.wait();
                    let now = inside0.fetch_add(1, Ordering::SeqCst) + 1;
                    peak0.fetch_max(now, Ordering::SeqCst);
                    inside0.fetch_sub(1, Ordering::SeqCst);
                    sem0.post();
                }
            });
            v.push(t);
        }

        for t in v {
            t.join().unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(sem.in_use(), 0);
    }

    #[test]
    fn test_close_wakes_waiter() {
        let sem = Semaphore::new(1);
        sem.wait();

        thread::scope(|s| {
            let t = s.spawn(|| sem.wait());
            thread::sleep(std::time::Duration::from_millis(50));
            sem.close();
            // 待っていたスレッドは panic で抜ける
            assert!(t.join().is_err());
        });
        assert_eq!(sem.in_use(), 1);
    }

    #[test]
    #[should_panic(expected = "posted more times than waited")]
    fn test_post_without_wait() {
        Semaphore::new(1).post();
    }
}
