use anyhow::{Context, Error};
use hybrid_rec::{
    evaluation::{evaluate_ratings, tag_precision, train_test_split, RatingAccuracy},
    ContentProfiles,
    ContentScorer,
};
use serde::Serialize;
use structopt::StructOpt;

use crate::{
    dataset::EngineArgs,
    exit_code::{NON_FATAL_ERROR, NO_ERROR},
    utils::{print_json, progress_spin_until_done},
};

/// Evaluates the rating predictions and the content similarities.
#[derive(StructOpt, Debug)]
pub struct EvaluateCmd {
    #[structopt(flatten)]
    engine: EngineArgs,

    /// The fraction of ratings held out for testing.
    #[structopt(long, default_value = "0.2")]
    test_fraction: f32,

    /// The seed of the random train/test split.
    #[structopt(long, default_value = "42")]
    seed: u64,

    /// The number of similar items checked for a matching tag.
    #[structopt(short, long, default_value = "5")]
    top_n: usize,

    #[structopt(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct EvaluateCmdResult {
    ratings: RatingAccuracy,
    tag_precision: f32,
    top_n: usize,
}

impl EvaluateCmd {
    pub fn run(self) -> Result<i32, Error> {
        let EvaluateCmd {
            engine,
            test_fraction,
            seed,
            top_n,
            pretty,
        } = self;

        let config = engine.config().context("Invalid engine configuration.")?;
        let data = engine.load(&config)?;

        let (train, test) = train_test_split(&data.dataset.interactions, test_fraction, seed)?;
        let ratings = progress_spin_until_done("Evaluating ratings", || {
            evaluate_ratings(&train, &test, &config)
        })
        .context("Evaluating the rating predictions failed.")?;

        let profiles = ContentProfiles::build(&data.dataset.items, config.content())
            .context("Building the content profiles failed.")?;
        let content = ContentScorer::new(profiles);
        let tag_precision = tag_precision(&content, &data.tags, top_n);

        let exit_code = if ratings.evaluated == 0 {
            eprintln!("No test rating could be predicted");
            NON_FATAL_ERROR
        } else {
            NO_ERROR
        };
        print_json(
            &EvaluateCmdResult {
                ratings,
                tag_precision,
                top_n,
            },
            pretty,
        )?;

        Ok(exit_code)
    }
}
