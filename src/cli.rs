use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::annotate::Occurrences;
use crate::config::Config;
use crate::dispatch::ClickTarget;
use crate::download::DEFAULT_SOURCE_URL;
use crate::lang::Lang;
use crate::models::EntryId;

#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output (set logging level to DEBUG)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Wrap the glossary terms of an html file in clickable markers
    Annotate(AnnotateArgs),

    /// Index of the glossary terms used in a file. Without a file, of the whole glossary
    Index(IndexArgs),

    /// Explanations of the glossary terms used in a file. Without a file, of the whole glossary
    List(ListArgs),

    /// Ids of the glossary terms used in a file
    Ids(IdsArgs),

    /// Fetch the glossary into the local cache
    Download(DownloadArgs),
}

impl Command {
    pub const fn options(&self) -> &Options {
        match self {
            Self::Annotate(args) => &args.options,
            Self::Index(args) => &args.options,
            Self::List(args) => &args.options,
            Self::Ids(args) => &args.options,
            Self::Download(args) => &args.options,
        }
    }
}

#[derive(Parser, Debug)]
pub struct AnnotateArgs {
    /// Html file
    pub input: PathBuf,

    /// Only wrap the first occurrence of every term
    #[arg(long)]
    pub first_only: bool,

    // Example:
    //   `--click index` links to the word list
    //   `--click showWord` calls the host function `showWord`
    //
    /// What clicking a term does: popup, index or the name of a callback
    #[arg(long, default_value_t)]
    pub click: ClickTarget,

    #[command(flatten)]
    pub options: Options,
}

impl AnnotateArgs {
    pub const fn occurrences(&self) -> Occurrences {
        if self.first_only {
            Occurrences::First
        } else {
            Occurrences::All
        }
    }
}

#[derive(Parser, Debug)]
pub struct IndexArgs {
    /// Html file
    pub input: Option<PathBuf>,

    /// Titles only, without links to the word list
    #[arg(long)]
    pub plain: bool,

    /// Prepend the index to the file instead of printing it alone
    #[arg(long)]
    pub insert: bool,

    #[command(flatten)]
    pub options: Options,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Html file
    pub input: Option<PathBuf>,

    /// Append the word list to the file instead of printing it alone
    #[arg(long)]
    pub insert: bool,

    #[command(flatten)]
    pub options: Options,
}

#[derive(Parser, Debug)]
pub struct IdsArgs {
    /// Html file
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub options: Options,
}

#[derive(Parser, Debug)]
pub struct DownloadArgs {
    /// Fetch even if the glossary is already cached
    #[arg(long, short)]
    pub redownload: bool,

    #[command(flatten)]
    pub options: Options,
}

#[derive(Parser, Debug, Default, Clone)]
pub struct Options {
    /// Glossary language
    #[arg(long, short, default_value_t)]
    pub language: Lang,

    /// Http(s) url or json file to fetch the glossary from. `{language}` is substituted
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    // Example:
    //   `--exclude 38,54`
    //
    /// Ids of terms to leave alone
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<EntryId>,

    /// Wait for the refresh instead of trusting the cached glossary
    #[arg(long)]
    pub no_local_cache: bool,

    /// Change the cache directory
    #[arg(long, default_value = "data")]
    pub cache_dir: PathBuf,

    /// Json list of extra words (`title`, `matches`, `text`). Can be repeated
    #[arg(long)]
    pub extra: Vec<PathBuf>,

    /// Write to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Do not print anything to the console
    #[arg(long, short)]
    pub quiet: bool,
}

impl Options {
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

impl From<&Options> for Config {
    fn from(options: &Options) -> Self {
        Self {
            language: options.language,
            use_local_cache: !options.no_local_cache,
            source_url: options.source_url.clone(),
            exclude: options.exclude.clone(),
        }
    }
}

impl Cli {
    pub fn parse_cli() -> Self {
        Self::parse()
    }
}
