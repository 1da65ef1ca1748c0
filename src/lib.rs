#![deny(missing_docs)]
//! 一个固定大小的工作线程池库。

pub use error::{PoolError, Result};
pub use pool::{Builder, FixedThreadPool, Priority, ThreadPool};

#[macro_use]
extern crate slog;

mod error;
pub mod pool;
