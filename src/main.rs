use std::process::ExitCode;

use clap::Parser;

use owroster::{
    config::{Args, RunConfig},
    service::runner,
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RunConfig::from(Args::parse());

    match runner::run(&config) {
        Ok(written) => {
            for path in written {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            println!("Error occured while exporting roster stats:\n{}\n", error);
            ExitCode::FAILURE
        }
    }
}
