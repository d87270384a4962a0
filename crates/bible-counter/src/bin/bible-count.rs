use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bible_db::{FailurePolicy, Library, LoadMode, VersionSpec, default_versions};
use bible_text::{full_name, normalize};
use bible_types::SearchMode;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use bible_counter::{CountTable, count_by_book, list_matches};

const QUIT_WORDS: [&str; 3] = ["sair", "quit", "exit"];

#[derive(Parser, Debug)]
#[command(
    name = "bible-count",
    about = "Count a term per book across Bible versions"
)]
struct Args {
    /// Directory holding the version files.
    #[arg(long, env = "BIBLE_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,
    /// How to read version files: mmap or owned.
    #[arg(long, env = "BIBLE_LOAD_MODE", default_value = "mmap", value_parser = parse_load_mode)]
    load_mode: LoadMode,
    /// Version to load as NAME=FILE[:SCHEMA]; repeatable. Defaults to the five bundled versions.
    #[arg(long = "source", value_parser = VersionSpec::parse)]
    sources: Vec<VersionSpec>,
    /// Search mode for one-shot queries (substring, exact or an alias).
    #[arg(long, default_value = "substring")]
    mode: SearchMode,
    /// Count this term and exit instead of prompting.
    #[arg(long)]
    term: Option<String>,
    /// Also print every matching verse.
    #[arg(long)]
    list: bool,
    /// Abort if any version fails to load.
    #[arg(long)]
    strict: bool,
}

fn parse_load_mode(raw: &str) -> Result<LoadMode, String> {
    LoadMode::parse(raw).ok_or_else(|| format!("unknown load mode {raw:?} (expected mmap or owned)"))
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let specs = if args.sources.is_empty() {
        default_versions()
    } else {
        args.sources.clone()
    };
    let policy = if args.strict {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Skip
    };
    let library = Library::load(&args.data_dir, &specs, args.load_mode, policy)
        .with_context(|| format!("loading versions from {}", args.data_dir.display()))?;
    if library.is_empty() {
        bail!(
            "no Bible version could be loaded from {}",
            args.data_dir.display()
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(term) = &args.term {
        report(&mut out, &library, term, args.mode, args.list)?;
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        write!(out, "Termo (ou 'sair'): ")?;
        out.flush()?;
        let Some(term) = lines.next().transpose()? else {
            break;
        };
        let term = term.trim();
        if term.is_empty() {
            continue;
        }
        if QUIT_WORDS.contains(&normalize(term).as_str()) {
            break;
        }

        write!(out, "Modo [substring/exact] (substring): ")?;
        out.flush()?;
        let mode = match lines.next().transpose()? {
            Some(raw) => match raw.trim().parse::<SearchMode>() {
                Ok(mode) => mode,
                Err(err) => {
                    writeln!(out, "{err}; usando substring")?;
                    SearchMode::Substring
                }
            },
            None => SearchMode::Substring,
        };

        write!(out, "Listar versículos? [s/N]: ")?;
        out.flush()?;
        let list = lines
            .next()
            .transpose()?
            .is_some_and(|raw| matches!(normalize(raw.trim()).as_str(), "s" | "sim" | "y" | "yes"));

        report(&mut out, &library, term, mode, list || args.list)?;
    }
    Ok(())
}

fn report(
    out: &mut impl Write,
    library: &Library,
    term: &str,
    mode: SearchMode,
    list: bool,
) -> Result<()> {
    let table = CountTable::build(
        term,
        mode,
        library
            .iter()
            .map(|corpus| (corpus.name(), count_by_book(corpus, term, mode))),
    );
    writeln!(out)?;
    writeln!(out, "\"{}\" ({})", table.term, table.mode)?;
    write!(out, "{}", table.render_text())?;
    writeln!(out, "Total geral: {}", table.grand_total())?;

    if list {
        for corpus in library.iter() {
            let found = list_matches(corpus, term, mode);
            writeln!(out)?;
            writeln!(out, "== {} ({} versículos) ==", corpus.name(), found.len())?;
            for m in found {
                writeln!(
                    out,
                    "{} {}:{} — {}",
                    full_name(m.book),
                    m.chapter,
                    m.verse,
                    m.text
                )?;
            }
        }
    }
    writeln!(out)?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
