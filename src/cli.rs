//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "corpus-wsd",
    about = "word sense disambiguation of Wikipedia dumps."
)]
/// Run the disambiguation pipeline.
///
/// ```sh
/// corpus-wsd 0.1.0
/// word sense disambiguation of Wikipedia dumps.
///
/// USAGE:
///     corpus-wsd [OPTIONS] [config]
///
/// FLAGS:
///     -h, --help       Prints help information
///     -V, --version    Prints version information
///
/// OPTIONS:
///     -t, --threads <threads>    number of workers. Overrides concurrent_threads.
///
/// ARGS:
///     <config>    path to the JSON configuration file [default: config.json]
/// ```
pub struct CorpusWsd {
    #[structopt(
        parse(from_os_str),
        help = "path to the JSON configuration file",
        default_value = "config.json"
    )]
    pub config: PathBuf,
    #[structopt(
        short = "t",
        long = "threads",
        help = "number of workers. Overrides concurrent_threads."
    )]
    pub threads: Option<usize>,
}
