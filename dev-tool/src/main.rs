use std::process::exit;

use anyhow::Error;
use structopt::StructOpt;

use crate::exit_code::FATAL_ERROR;

mod dataset;
mod evaluate;
mod exit_code;
mod recommend;
mod similar;
mod utils;

/// Tooling for the developers of the hybrid recommender.
#[derive(StructOpt, Debug)]
enum CommandArgs {
    Recommend(recommend::RecommendCmd),
    Similar(similar::SimilarCmd),
    Evaluate(evaluate::EvaluateCmd),
}

impl CommandArgs {
    fn run(self) -> Result<i32, Error> {
        match self {
            CommandArgs::Recommend(cmd) => cmd.run(),
            CommandArgs::Similar(cmd) => cmd.run(),
            CommandArgs::Evaluate(cmd) => cmd.run(),
        }
    }
}

fn main() {
    env_logger::init();

    let exit_code = match CommandArgs::from_args().run() {
        Ok(exit_code) => exit_code,
        Err(error) => {
            eprintln!("{:?}", error);
            FATAL_ERROR
        }
    };

    exit(exit_code);
}
