//! # corpus-wsd
//!
//! Runs the word sense disambiguation pipeline described by a JSON configuration file.
//!
//! ```sh
//! RUST_LOG=info corpus-wsd config.json -t 8
//! ```
use structopt::StructOpt;

use corpus_wsd::config::Config;
use corpus_wsd::error::Error;
use corpus_wsd::pipelines::{Pipeline, WsdPipeline};

#[macro_use]
extern crate log;

mod cli;

fn run(opt: cli::CorpusWsd) -> Result<u64, Error> {
    let mut config = Config::from_path(&opt.config)?;
    if let Some(threads) = opt.threads {
        config.concurrent_threads = threads;
        config.validate()?;
    }
    info!("config\n{}", serde_json::to_string_pretty(&config)?);

    let pipeline = WsdPipeline::new(config);
    info!("corpus-wsd pipeline v{}", WsdPipeline::version());
    pipeline.run()
}

fn main() {
    env_logger::init();

    let opt = cli::CorpusWsd::from_args();
    debug!("cli args\n{:#?}", opt);

    match run(opt) {
        Ok(count) => info!("Number of articles processed {}", count),
        Err(e) => error!("{:?}", e),
    }
}
