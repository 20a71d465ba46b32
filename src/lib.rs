pub mod config;
pub mod error;
pub mod fork;
pub mod menu;
pub mod monitor;
pub mod mutex_fork;
pub mod philosopher;
pub mod room;
pub mod semaphore;
pub mod simulation;
pub mod stats;
pub mod strategy;
pub mod table;
pub mod waiter;

pub use config::SimConfig;
pub use error::DiningError;
pub use simulation::{RunReport, Simulation};
pub use strategy::{Strategy, StrategyKind};
