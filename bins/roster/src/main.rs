use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use configs::{AppConfig, LogFormat};
use dotenvy::dotenv;
use service::RosterStore;
use tracing::{error, info, warn};

mod shell;

use shell::Shell;

fn init_logging(format: LogFormat) {
    match format {
        LogFormat::Compact => common::utils::logging::init_logging_default(),
        LogFormat::Json => common::utils::logging::init_logging_json(),
    }
    info!(service = "roster", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> ExitCode {
    // .env 先于配置加载，使 RUST_LOG / ROSTER_* 生效
    dotenv().ok();

    let (cfg, problems) = AppConfig::load();
    init_logging(cfg.logging.format);
    for e in &problems {
        warn!(service = "roster", event = "config_invalid", error = %format_args!("{e:#}"), "configuration value rejected; keeping its default");
    }

    std::panic::set_hook(Box::new(|info| {
        error!(service = "roster", event = "panic", message = %info, "unhandled panic occurred");
    }));

    let data_file = PathBuf::from(&cfg.store.data_file);
    common::env::check_data_path(&data_file);
    let mut store = RosterStore::open(data_file);
    info!(service = "roster", event = "start", path = %store.path().display(), count = store.len(), "roster ready");

    let clear_screen = cfg.ui.clear_screen && io::stdout().is_terminal();

    // 单线程运行时只用于监听 Ctrl+C，菜单本身在阻塞线程中同步执行
    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "roster", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let exit_code = rt.block_on(async move {
        let shell_task = tokio::task::spawn_blocking(move || {
            let mut shell = Shell::new(io::stdin().lock(), io::stdout(), clear_screen);
            shell.run(&mut store)
        });

        tokio::select! {
            res = shell_task => {
                match res {
                    Ok(Ok(())) => {
                        info!(service = "roster", event = "stop", "shell exited normally");
                        ExitCode::SUCCESS
                    }
                    Ok(Err(e)) => {
                        error!(service = "roster", event = "terminal_io", error = %e, "terminal read/write failed");
                        ExitCode::FAILURE
                    }
                    Err(e) => {
                        error!(service = "roster", event = "task_join_error", error = %e, "shell task join error");
                        ExitCode::FAILURE
                    }
                }
            }
            Ok(()) = tokio::signal::ctrl_c() => {
                info!(service = "roster", event = "shutdown_signal", "received Ctrl+C, exiting");
                println!("\nOperation cancelled by the user.");
                let _ = io::stdout().flush();
                ExitCode::SUCCESS
            }
        }
    });

    // 阻塞在 stdin 上的读取无法取消，不等待它结束
    rt.shutdown_background();
    exit_code
}
