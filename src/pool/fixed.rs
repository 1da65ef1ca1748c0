use std::mem;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use slog::{Discard, Logger};

use super::worker::{run_worker, WorkerContext, WorkerMessage};
use super::ThreadPool;
use crate::{PoolError, Result};

/// 关闭时等待单个工作线程结束的默认时长
const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_millis(1000);

/// 用于生成默认线程池名称的计数器
static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(0);

/// 工作线程优先级
///
/// std不提供跨平台的线程优先级控制，该配置仅随诊断日志输出
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// 低优先级
    Low,
    /// 普通优先级
    Normal,
    /// 高优先级
    High,
}

impl Default for Priority {
    fn default() -> Priority {
        Priority::Normal
    }
}

/// FixedThreadPool的配置构造器
pub struct Builder {
    threads: u32,
    priority: Priority,
    name: Option<String>,
    logger: Option<Logger>,
}

impl Default for Builder {
    fn default() -> Builder {
        Builder {
            threads: num_cpus::get() as u32,
            priority: Priority::Normal,
            name: None,
            logger: None,
        }
    }
}

impl Builder {
    /// 生成默认配置的构造器，线程数量默认为CPU核心数
    pub fn new() -> Builder {
        Builder::default()
    }

    /// 设置工作线程数量
    pub fn threads(mut self, threads: u32) -> Builder {
        self.threads = threads;
        self
    }

    /// 设置工作线程优先级
    pub fn priority(mut self, priority: Priority) -> Builder {
        self.priority = priority;
        self
    }

    /// 设置线程池名称，用于工作线程命名与诊断日志
    pub fn name(mut self, name: impl Into<String>) -> Builder {
        self.name = Some(name.into());
        self
    }

    /// 设置诊断日志输出，默认丢弃全部日志
    pub fn logger(mut self, logger: Logger) -> Builder {
        self.logger = Some(logger);
        self
    }

    /// 按当前配置创建线程池
    ///
    /// 成功时立即启动全部工作线程
    ///
    /// # Errors
    /// 线程数量为0时返回`PoolError::InvalidThreadCount`；
    /// 创建系统线程失败时返回`PoolError::Io`，已创建的线程
    /// 会随队列断开自行退出
    pub fn build(self) -> Result<FixedThreadPool> {
        let Builder {
            threads,
            priority,
            name,
            logger,
        } = self;

        if threads == 0 {
            return Err(PoolError::InvalidThreadCount(threads));
        }

        let name = name
            .unwrap_or_else(|| format!("pool-{}", NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed)));
        let logger = logger.unwrap_or_else(|| Logger::root(Discard, o!()));
        let logger = logger.new(o!("pool" => name.clone()));

        let (sender, receiver) = unbounded();

        let mut workers = Vec::with_capacity(threads as usize);
        for i in 0..threads {
            let worker_name = format!("{}-worker-{}", name, i);
            let (done, done_rx) = bounded::<()>(0);
            let ctx = WorkerContext {
                name: worker_name.clone(),
                tasks: receiver.clone(),
                logger: logger.clone(),
                done,
            };
            let handle = thread::Builder::new()
                .name(worker_name.clone())
                .spawn(move || run_worker(ctx))?;
            workers.push(Worker {
                name: worker_name,
                handle,
                done: done_rx,
            });
        }

        debug!(logger, "pool started"; "workers" => threads, "priority" => ?priority);

        Ok(FixedThreadPool {
            name,
            priority,
            can_work: AtomicBool::new(true),
            sender,
            receiver: Mutex::new(Some(receiver)),
            workers: Mutex::new(workers),
            logger,
        })
    }
}

/// 工作线程句柄与完成通知
struct Worker {
    name: String,
    handle: thread::JoinHandle<()>,
    done: Receiver<()>,
}

/// 固定大小的工作线程池
///
/// 工作线程在创建时全部启动并持续存活，任务经由共享队列按
/// 提交顺序分发给空闲线程执行。关闭时先排空已提交的任务，
/// 再逐个等待工作线程退出
pub struct FixedThreadPool {
    name: String,
    priority: Priority,
    /// 关闭标志，一次性翻转，所有读取无须持锁
    can_work: AtomicBool,
    sender: Sender<WorkerMessage>,
    /// 保留一个接收端，用于关闭后清点未执行的任务
    receiver: Mutex<Option<Receiver<WorkerMessage>>>,
    workers: Mutex<Vec<Worker>>,
    logger: Logger,
}

impl FixedThreadPool {
    /// 返回线程池名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 返回配置的线程优先级
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// 使用默认超时关闭线程池
    ///
    /// 等价于`shutdown_timeout(Duration::from_millis(1000))`
    pub fn shutdown(&self) {
        self.shutdown_timeout(DEFAULT_JOIN_TIMEOUT);
    }

    /// 关闭线程池，对每个工作线程最多等待`timeout`
    ///
    /// 先于关闭提交的任务会在工作线程退出前执行完毕；超时仍
    /// 未结束的线程记录警告日志后脱离管理，其任务的副作用可能
    /// 不完整。关闭后的`spawn`调用返回`PoolError::ShuttingDown`，
    /// 重复调用本方法无效果
    pub fn shutdown_timeout(&self, timeout: Duration) {
        if !self.can_work.swap(false, Ordering::SeqCst) {
            return;
        }

        let workers = {
            let mut guard = self.workers.lock().unwrap_or_else(|e| e.into_inner());
            mem::take(&mut *guard)
        };

        info!(self.logger, "shutting down"; "workers" => workers.len());

        // 每个工作线程消费一条Shutdown消息，排在其前的任务先被执行
        for _ in 0..workers.len() {
            let _ = self.sender.send(WorkerMessage::Shutdown);
        }

        for worker in workers {
            match worker.done.recv_timeout(timeout) {
                Err(RecvTimeoutError::Timeout) => {
                    warn!(self.logger, "worker did not finish within timeout, detaching";
                          "thread" => worker.name);
                }
                _ => {
                    let _ = worker.handle.join();
                }
            }
        }

        // 清点在关闭标志翻转前后竞争入队、已无线程执行的任务；
        // 丢弃接收端后，后续send直接失败
        let receiver = {
            let mut guard = self.receiver.lock().unwrap_or_else(|e| e.into_inner());
            guard.take()
        };
        if let Some(receiver) = receiver {
            let mut discarded = 0u64;
            while let Ok(message) = receiver.try_recv() {
                if let WorkerMessage::Run(_) = message {
                    discarded += 1;
                }
            }
            if discarded > 0 {
                warn!(self.logger, "discarded tasks submitted during shutdown";
                      "count" => discarded);
            }
        }
    }
}

impl ThreadPool for FixedThreadPool {
    fn new(threads: u32) -> Result<FixedThreadPool> {
        Builder::new().threads(threads).build()
    }

    fn spawn<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.can_work.load(Ordering::SeqCst) {
            return Err(PoolError::ShuttingDown);
        }

        self.sender
            .send(WorkerMessage::Run(Box::new(job)))
            .map_err(|_| PoolError::ShuttingDown)
    }
}

impl Drop for FixedThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
