use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use slog::Logger;

/// 提交给工作线程执行的任务闭包
pub(super) type Task = Box<dyn FnOnce() + Send + 'static>;

/// 工作线程从共享队列接收的消息
pub(super) enum WorkerMessage {
    /// 执行任务
    Run(Task),
    /// 退出工作循环
    Shutdown,
}

/// 工作线程运行所需的全部状态
pub(super) struct WorkerContext {
    pub name: String,
    pub tasks: Receiver<WorkerMessage>,
    pub logger: Logger,
    /// 工作循环返回时断开，通知关闭流程该线程已结束
    pub done: Sender<()>,
}

/// 工作线程主循环
///
/// 空闲时阻塞在队列上，不做任何轮询；收到`Shutdown`或队列
/// 断开时退出
pub(super) fn run_worker(ctx: WorkerContext) {
    let WorkerContext {
        name,
        tasks,
        logger,
        done: _done,
    } = ctx;

    let logger = logger.new(o!("thread" => name));
    info!(logger, "worker started"; "id" => ?thread::current().id());

    let mut seq: u64 = 0;
    loop {
        match tasks.recv() {
            Ok(WorkerMessage::Run(task)) => {
                seq += 1;
                debug!(logger, "task started"; "task" => seq);

                let timer = Instant::now();
                match panic::catch_unwind(AssertUnwindSafe(task)) {
                    Ok(()) => {
                        debug!(logger, "task finished";
                               "task" => seq,
                               "elapsed_ms" => timer.elapsed().as_millis() as u64);
                    }
                    Err(payload) => {
                        error!(logger, "task panicked";
                               "task" => seq,
                               "error" => panic_message(payload.as_ref()));
                    }
                }
            }
            Ok(WorkerMessage::Shutdown) | Err(_) => break,
        }
    }

    info!(logger, "worker finished");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("opaque panic payload")
    }
}
