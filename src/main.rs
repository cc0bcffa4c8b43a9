use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use enlighten::cache::{FileCache, cache_key};
use enlighten::cli::{Cli, Command, Options};
use enlighten::download::source_for;
use enlighten::host::{Host, MemoryHost, Placement, Selector};
use enlighten::models::NewEntry;
use enlighten::utils::{CHECK_C, pretty_println_at_path, skip_because_file_exists};
use enlighten::{Config, Enlighten, setup_tracing};

/// The input file.
const DOCUMENT: &str = "#document";
/// Views printed on their own.
const OUTPUT: &str = "#output";

fn read_input(path: Option<&Path>) -> Result<String> {
    path.map_or_else(
        || Ok(String::new()),
        |path| {
            fs::read_to_string(path).with_context(|| format!("Error reading {}", path.display()))
        },
    )
}

fn build_engine(options: &Options, input: &str) -> Result<Enlighten<MemoryHost>> {
    let host = MemoryHost::default()
        .with_element("document", input)
        .with_element("output", "");
    let cache = FileCache::new(&options.cache_dir);
    let mut app = Enlighten::new(Config::from(options), cache, host);

    for path in &options.extra {
        let body = fs::read_to_string(path)
            .with_context(|| format!("Error reading extra words {}", path.display()))?;
        let words: Vec<NewEntry> = serde_json::from_str(&body)
            .with_context(|| format!("Error decoding JSON @ {}", path.display()))?;
        tracing::debug!("Adding {} extra words from {}", words.len(), path.display());
        for word in words {
            app.add_word(word)?;
        }
    }

    Ok(app)
}

/// Refresh from the configured source. Deferred operations run here.
fn refresh(app: &mut Enlighten<MemoryHost>) -> Result<()> {
    let url = app.config().resolved_source_url();
    let replay = app.refresh(source_for(&url).as_ref())?;
    if replay.stale {
        tracing::warn!("Could not refresh the glossary, using the cached one");
    }
    if let Some(err) = replay.failed.into_iter().next() {
        return Err(err.into());
    }
    Ok(())
}

fn emit(options: &Options, content: &str) -> Result<()> {
    match options.output() {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Error writing {}", path.display()))?;
            if !options.quiet {
                pretty_println_at_path(&format!("{CHECK_C} Wrote"), path);
            }
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn run_command(cmd: &Command) -> Result<()> {
    let options = cmd.options();
    match cmd {
        Command::Annotate(args) => {
            let input = read_input(Some(args.input.as_path()))?;
            let mut app = build_engine(options, &input)?;
            app.parse_element(DOCUMENT, args.occurrences(), args.click.clone())?;
            refresh(&mut app)?;
            emit(options, &app.host().read(&Selector::new(DOCUMENT))?)
        }
        Command::Index(args) => {
            let input = read_input(args.input.as_deref())?;
            let mut app = build_engine(options, &input)?;
            let source = args.input.as_ref().map(|_| DOCUMENT);
            let (target, placement) = if args.insert {
                (DOCUMENT, Placement::Prepend)
            } else {
                (OUTPUT, Placement::Replace)
            };
            app.insert_index(source, Some(target), placement, !args.plain)?;
            refresh(&mut app)?;
            emit(options, &app.host().read(&Selector::new(target))?)
        }
        Command::List(args) => {
            let input = read_input(args.input.as_deref())?;
            let mut app = build_engine(options, &input)?;
            let source = args.input.as_ref().map(|_| DOCUMENT);
            let (target, placement) = if args.insert {
                (DOCUMENT, Placement::Append)
            } else {
                (OUTPUT, Placement::Replace)
            };
            app.insert_word_list(source, Some(target), placement)?;
            refresh(&mut app)?;
            emit(options, &app.host().read(&Selector::new(target))?)
        }
        Command::Ids(args) => {
            let input = read_input(args.input.as_deref())?;
            let mut app = build_engine(options, &input)?;
            refresh(&mut app)?;
            let mut out = String::new();
            for id in app.find_entry_ids(&input)? {
                let title = app.get_word(id).map_or("", |word| word.title.as_str());
                writeln!(out, "{id}\t{title}")?;
            }
            emit(options, &out)
        }
        Command::Download(args) => {
            let cache = FileCache::new(&options.cache_dir);
            let path = cache.path(&cache_key(options.language));
            if path.exists() && !args.redownload {
                if !options.quiet {
                    skip_because_file_exists("download", &path);
                }
                return Ok(());
            }

            let config = Config {
                use_local_cache: false,
                ..Config::from(options)
            };
            let mut app = Enlighten::new(config, cache, MemoryHost::default());
            refresh(&mut app)?;
            if !options.quiet {
                let msg = format!(
                    "{CHECK_C} Cached {} {} words",
                    app.store().words().len(),
                    options.language.long()
                );
                pretty_println_at_path(&msg, &path);
            }
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse_cli();

    setup_tracing(cli.verbose);
    let span = tracing::info_span!("main");
    let _guard = span.enter();

    let cmd = cli.command;
    tracing::debug!("{:#?}", cmd);
    run_command(&cmd)
}
