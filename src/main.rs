use std::process::ExitCode;

mod adapters;
mod cli;
mod config;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();
    match cli::run() {
        Ok(exit_code) => exit_code,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
