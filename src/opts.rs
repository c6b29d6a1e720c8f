use std::path::PathBuf;

use argh::FromArgs;
use log::LevelFilter;

use crate::rename::Rename;
use crate::unparse::Options;

/// Rewrite Fortran expressions and assignments with minimal parentheses.
#[derive(FromArgs)]
pub struct Opts {
    /// input file, one expression or statement per line
    #[argh(positional)]
    pub file: Option<PathBuf>,

    /// output file
    #[argh(option, short = 'o')]
    pub output: Option<PathBuf>,

    /// print non-default lower bounds of array constants
    #[argh(switch)]
    pub lbounds: bool,

    /// write a symbol under another name (`old=new`)
    #[argh(option)]
    pub rename: Vec<Rename>,

    /// logging level
    #[argh(option, long = "log", default = "LevelFilter::Warn")]
    pub log_level: LevelFilter,
}

impl Opts {
    /// Parse options from `env::args`.
    pub fn parse() -> Opts {
        argh::from_env()
    }

    pub fn unparse_options(&self) -> Options {
        Options {
            print_lbounds: self.lbounds,
        }
    }
}
