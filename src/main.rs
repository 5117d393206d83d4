use anyhow::{Context, Result};
use chatiq::cli;

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let runtime_options = match cli::process_cli() {
        cli::CliResult::Exit(code) => {
            if code == 0 {
                return Ok(());
            }
            std::process::exit(code);
        }
        cli::CliResult::Continue(options) => options,
    };

    // Routes all log::info!() etc. to <tmp>/chatiq_debug.log; mirrors to
    // stderr when RUST_LOG is set. --log-level takes precedence over DEBUG_LEVEL.
    chatiq::debug::init_log_bridge(runtime_options.log_level);

    log::info!("Starting chatiq demo host v{}", chatiq::VERSION);

    // The widget is single-threaded; one current-thread runtime drives
    // stdin and the timer queue
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start event loop")?;

    let result = runtime.block_on(cli::repl::run(runtime_options));
    log::info!("Event loop exited");

    if let Err(ref e) = result {
        eprintln!("chatiq: error: {e:#}");
    }
    result
}
