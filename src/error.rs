use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiningError {
    // 輪になるには最低 2 人必要
    #[error("invalid philosopher count: {0} (need at least 2)")]
    InvalidPhilosopherCount(usize),

    #[error("invalid {what} interval: {min}..={max} ms")]
    InvalidInterval {
        what: &'static str,
        min: u64,
        max: u64,
    },

    #[error("invalid option: {0}")]
    InvalidOption(String),

    // 哲学者スレッドが panic した (フォークの二重取得・二重返却など)
    #[error("philosopher {0} panicked")]
    PhilosopherPanicked(usize),

    #[error("{0} left forks or gates held after the run")]
    ResourceLeak(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
