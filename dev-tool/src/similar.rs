use anyhow::{Context, Error};
use hybrid_rec::{CandidateScore, ItemId, RecommendationFacade};
use serde::Serialize;
use structopt::StructOpt;

use crate::{
    dataset::EngineArgs,
    exit_code::{NON_FATAL_ERROR, NO_ERROR},
    utils::{print_json, progress_spin_until_done},
};

/// Finds the items most similar in content to an item.
#[derive(StructOpt, Debug)]
pub struct SimilarCmd {
    #[structopt(flatten)]
    engine: EngineArgs,

    /// The number of similar items.
    #[structopt(short, long, default_value = "10")]
    top_n: usize,

    #[structopt(long)]
    pretty: bool,

    /// The item to find similar items for.
    item_id: ItemId,
}

#[derive(Serialize)]
struct SimilarCmdResult {
    item_id: ItemId,
    similar_items: Vec<CandidateScore>,
}

impl SimilarCmd {
    pub fn run(self) -> Result<i32, Error> {
        let SimilarCmd {
            engine,
            top_n,
            pretty,
            item_id,
        } = self;

        let config = engine.config().context("Invalid engine configuration.")?;
        let data = engine.load(&config)?;
        let facade = progress_spin_until_done("Building snapshot", || {
            RecommendationFacade::new(&data.dataset, config)
        })
        .context("Building the recommendation snapshot failed.")?;

        let similar_items = facade.recommend_similar_items(item_id, top_n)?;
        let exit_code = if similar_items.is_empty() {
            eprintln!("No similar items for item {}", item_id);
            NON_FATAL_ERROR
        } else {
            NO_ERROR
        };
        print_json(
            &SimilarCmdResult {
                item_id,
                similar_items,
            },
            pretty,
        )?;

        Ok(exit_code)
    }
}
