use clap::{Parser, ValueEnum};
use slog::{o, Drain};
use std::process::exit;
use std::thread;
use std::time::Duration;
use workpool::{Builder, Priority, Result, ThreadPool};

#[derive(Debug, Parser)]
#[command(name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        author = env!("CARGO_PKG_AUTHORS"),
        about = env!("CARGO_PKG_DESCRIPTION"))]
struct Cli {
    /// 工作线程数量，默认为CPU核心数
    #[arg(long)]
    threads: Option<u32>,

    /// 提交的任务数量
    #[arg(long, default_value_t = 100)]
    tasks: u32,

    /// 线程池名称
    #[arg(long)]
    name: Option<String>,

    /// 工作线程优先级
    #[arg(long, value_enum)]
    priority: Option<CliPriority>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum CliPriority {
    /// 低优先级
    Low,
    /// 普通优先级
    Normal,
    /// 高优先级
    High,
}

impl From<CliPriority> for Priority {
    fn from(priority: CliPriority) -> Priority {
        match priority {
            CliPriority::Low => Priority::Low,
            CliPriority::Normal => Priority::Normal,
            CliPriority::High => Priority::High,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let logger = slog::Logger::root(drain, o!());

    let threads = cli.threads.unwrap_or_else(|| num_cpus::get() as u32);
    let priority = cli.priority.map(Priority::from).unwrap_or_default();

    let mut builder = Builder::new()
        .threads(threads)
        .priority(priority)
        .logger(logger.clone());
    if let Some(name) = cli.name {
        builder = builder.name(name);
    }
    let pool = builder.build()?;

    for i in 1..=cli.tasks {
        let message = format!("Message - {}", i);
        pool.spawn_with(message, |message| {
            println!(">> Processing of message '{}' has started...", message);
            thread::sleep(Duration::from_millis(100));
            println!(">> Processing of message '{}' has finished", message);
        })?;
    }

    pool.shutdown_timeout(Duration::from_secs(30));

    Ok(())
}
