//! 该模块提供固定大小的线程池

use crate::Result;

/// 线程池抽象接口
///
/// 该trait定义了线程池的基本行为规范，
/// 具体实现决定线程的调度与回收策略
pub trait ThreadPool {
    /// 创建新的线程池实例
    ///
    /// # 参数
    /// * `threads`: 线程池中工作线程数量
    ///
    /// # 返回
    /// * `Result<Self>`: 成功时返回线程池实例，失败时返回错误
    ///
    /// # 注意
    /// 1. 实现应立即创建指定数量的工作线程
    /// 2. `threads`为0时应返回`PoolError::InvalidThreadCount`
    /// 3. 任一线程创建失败时应终止所有已创建线程
    fn new(threads: u32) -> Result<Self>
    where
        Self: Sized;

    /// 向线程池提交任务
    ///
    /// # 参数
    /// * `job`: 要执行的任务闭包
    ///
    /// # 保证
    /// 1. 任务按提交顺序进入队列
    /// 2. 即使任务执行时panic也不会影响线程池运行
    /// 3. 线程池会维持固定的线程数量
    ///
    /// # Errors
    /// 若线程池已请求关闭，则返回`PoolError::ShuttingDown`，任务不会入队
    fn spawn<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static;

    /// 向线程池提交带参数的任务
    ///
    /// 参数在提交时转移所有权，由执行该任务的工作线程消费
    fn spawn_with<T, F>(&self, parameter: T, job: F) -> Result<()>
    where
        T: Send + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        self.spawn(move || job(parameter))
    }
}

mod fixed;
mod worker;

pub use fixed::{Builder, FixedThreadPool, Priority};
