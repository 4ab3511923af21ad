//! UCI engine entry point. Diagnostics go to stderr through `env_logger`
//! (see `RUST_LOG`); stdout carries only protocol output.

use mailbox_chess::uci::uci_top::run_stdio_loop;

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();
    run_stdio_loop()
}
