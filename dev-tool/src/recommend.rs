use anyhow::{Context, Error};
use hybrid_rec::{CandidateScore, RecommendationFacade, UserId};
use serde::Serialize;
use structopt::StructOpt;

use crate::{
    dataset::EngineArgs,
    exit_code::{NON_FATAL_ERROR, NO_ERROR},
    utils::{print_json, progress_spin_until_done},
};

/// Recommends items for a user.
#[derive(StructOpt, Debug)]
pub struct RecommendCmd {
    #[structopt(flatten)]
    engine: EngineArgs,

    /// The number of recommendations.
    #[structopt(short, long, default_value = "10")]
    top_n: usize,

    #[structopt(long)]
    pretty: bool,

    /// The user to recommend items for.
    user_id: UserId,
}

#[derive(Serialize)]
struct RecommendCmdResult {
    user_id: UserId,
    recommendations: Vec<CandidateScore>,
}

impl RecommendCmd {
    pub fn run(self) -> Result<i32, Error> {
        let RecommendCmd {
            engine,
            top_n,
            pretty,
            user_id,
        } = self;

        let config = engine.config().context("Invalid engine configuration.")?;
        let data = engine.load(&config)?;
        let facade = progress_spin_until_done("Building snapshot", || {
            RecommendationFacade::new(&data.dataset, config)
        })
        .context("Building the recommendation snapshot failed.")?;

        let recommendations = facade.recommend_for_user(user_id, top_n)?;
        let exit_code = if recommendations.is_empty() {
            eprintln!("No recommendations for user {}", user_id);
            NON_FATAL_ERROR
        } else {
            NO_ERROR
        };
        print_json(
            &RecommendCmdResult {
                user_id,
                recommendations,
            },
            pretty,
        )?;

        Ok(exit_code)
    }
}
