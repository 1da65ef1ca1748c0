use failure::Fail;
use std::io;

/// workpool 错误类型.
#[derive(Debug, Fail)]
pub enum PoolError {
    /// 无效的线程数量.
    #[fail(display = "Thread count must be positive, got {}", _0)]
    InvalidThreadCount(u32),
    /// 线程池已请求关闭.
    #[fail(display = "The thread pool is shutting down")]
    ShuttingDown,
    /// IO 错误.
    #[fail(display = "{}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for PoolError {
    fn from(err: io::Error) -> PoolError {
        PoolError::Io(err)
    }
}

/// workpool中的Result类型
pub type Result<T> = std::result::Result<T, PoolError>;
