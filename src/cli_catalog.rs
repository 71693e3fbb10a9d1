use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use cli_style::{
    get_prompt, get_styles, print_empty_list, print_error, print_key_value, print_success,
    TableBuilder,
};
use media_catalog::catalog_store::{Genre, Language};
use media_catalog::config::{AppConfig, CliConfig, FileConfig};
use media_catalog::facade::FacadeResult;
use media_catalog::{Catalog, EntityKind, FacadeError};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

fn parse_kind(s: &str) -> Result<EntityKind, String> {
    s.parse()
}

#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    /// Path to the catalog database file, created when missing.
    #[clap(value_parser = parse_path)]
    pub path: Option<PathBuf>,

    /// TOML config file. Values found there override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace). LOG_LEVEL wins over it.
    #[clap(long)]
    pub log_level: Option<String>,

    /// File keeping the command history between sessions.
    #[clap(long, value_parser = parse_path)]
    pub history_file: Option<PathBuf>,
}

#[derive(Parser)]
#[command(styles=get_styles(),name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Lists all genres in catalog order.
    Genres,

    /// Appends a genre at the end of the list.
    AddGenre { name: String },

    /// Lists all movies with their media and genres.
    Movies,

    /// Lists all shows.
    Shows,

    /// Lists the seasons of a show.
    Seasons { show_id: i64 },

    /// Lists the episodes of a season.
    Episodes { season_id: i64 },

    /// Lists all music albums.
    Music,

    /// Lists the songs of a music album.
    Songs { music_id: i64 },

    /// Lists all games.
    Games,

    /// Lists all programs.
    Programs,

    /// Swaps a record with the one right before it.
    MoveUp {
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
        id: i64,
    },

    /// Swaps a record with the one right after it.
    MoveDown {
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
        id: i64,
    },

    /// Copies a record, with everything it owns, to the end of its list.
    Duplicate {
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
        id: i64,
    },

    /// Removes a record and everything it owns.
    Remove {
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
        id: i64,
    },

    /// Repairs the positions of every list of the given kind.
    Renumber {
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
    },

    /// Deletes every record of the given kind and everything they own.
    Wipe {
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
    },

    /// Shows catalog totals.
    Stats,

    /// Shows the path of the current catalog db.
    Where,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

fn execute_command(line: String, catalog: &Catalog, db_path: &Path) -> CommandExecutionResult {
    if line.trim().is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    match cli {
        Ok(cli) => match run(cli.command, catalog, db_path) {
            Ok(result) => result,
            Err(err) => CommandExecutionResult::Error(err.to_string()),
        },
        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
            CommandExecutionResult::Ok
        }
    }
}

fn run(
    command: InnerCommand,
    catalog: &Catalog,
    db_path: &Path,
) -> FacadeResult<CommandExecutionResult> {
    match command {
        InnerCommand::Genres => {
            let rows = catalog
                .genres
                .get_all()?
                .into_iter()
                .map(|g| vec![id_cell(g.id), g.position.to_string(), g.name])
                .collect();
            print_table(&["id", "pos", "name"], rows, "No genres.");
        }
        InnerCommand::AddGenre { name } => {
            let genre = catalog.genres.add(&Genre::new(name))?;
            print_success(&format!(
                "Added genre {} at position {}",
                id_cell(genre.id),
                genre.position
            ));
        }
        InnerCommand::Movies => {
            let rows = catalog
                .movies
                .get_all()?
                .into_iter()
                .map(|m| {
                    let length: i64 = m.media.iter().map(|medium| medium.length).sum();
                    vec![
                        id_cell(m.id),
                        m.position.to_string(),
                        m.czech_name,
                        m.original_name,
                        m.year.to_string(),
                        m.media.len().to_string(),
                        format_minutes(length),
                        genre_names(&m.genres),
                    ]
                })
                .collect();
            print_table(
                &[
                    "id", "pos", "czech", "original", "year", "media", "length", "genres",
                ],
                rows,
                "No movies.",
            );
        }
        InnerCommand::Shows => {
            let rows = catalog
                .shows
                .get_all()?
                .into_iter()
                .map(|s| {
                    vec![
                        id_cell(s.id),
                        s.position.to_string(),
                        s.czech_name,
                        s.original_name,
                        genre_names(&s.genres),
                    ]
                })
                .collect();
            print_table(
                &["id", "pos", "czech", "original", "genres"],
                rows,
                "No shows.",
            );
        }
        InnerCommand::Seasons { show_id } => {
            let show = catalog.shows.get(show_id)?.ok_or(FacadeError::NotFound {
                kind: EntityKind::Show,
                id: show_id,
            })?;
            let rows = catalog
                .seasons
                .find_by_parent(&show)?
                .into_iter()
                .map(|s| {
                    vec![
                        id_cell(s.id),
                        s.position.to_string(),
                        s.number.to_string(),
                        format!("{}-{}", s.start_year, s.end_year),
                        s.language.to_db_str().to_string(),
                        languages(&s.subtitles),
                    ]
                })
                .collect();
            print_table(
                &["id", "pos", "number", "years", "language", "subtitles"],
                rows,
                "No seasons.",
            );
        }
        InnerCommand::Episodes { season_id } => {
            let season = catalog
                .seasons
                .get(season_id)?
                .ok_or(FacadeError::NotFound {
                    kind: EntityKind::Season,
                    id: season_id,
                })?;
            let rows = catalog
                .episodes
                .find_by_parent(&season)?
                .into_iter()
                .map(|e| {
                    vec![
                        id_cell(e.id),
                        e.position.to_string(),
                        e.number.to_string(),
                        e.name,
                        format_minutes(e.length),
                    ]
                })
                .collect();
            print_table(
                &["id", "pos", "number", "name", "length"],
                rows,
                "No episodes.",
            );
        }
        InnerCommand::Music => {
            let rows = catalog
                .music
                .get_all()?
                .into_iter()
                .map(|m| {
                    vec![
                        id_cell(m.id),
                        m.position.to_string(),
                        m.name,
                        m.media_count.to_string(),
                    ]
                })
                .collect();
            print_table(&["id", "pos", "name", "media"], rows, "No music.");
        }
        InnerCommand::Songs { music_id } => {
            let music = catalog.music.get(music_id)?.ok_or(FacadeError::NotFound {
                kind: EntityKind::Music,
                id: music_id,
            })?;
            let rows = catalog
                .songs
                .find_by_parent(&music)?
                .into_iter()
                .map(|s| {
                    vec![
                        id_cell(s.id),
                        s.position.to_string(),
                        s.name,
                        format_seconds(s.length),
                    ]
                })
                .collect();
            print_table(&["id", "pos", "name", "length"], rows, "No songs.");
        }
        InnerCommand::Games => {
            let rows = catalog
                .games
                .get_all()?
                .into_iter()
                .map(|g| {
                    vec![
                        id_cell(g.id),
                        g.position.to_string(),
                        g.name,
                        g.media_count.to_string(),
                    ]
                })
                .collect();
            print_table(&["id", "pos", "name", "media"], rows, "No games.");
        }
        InnerCommand::Programs => {
            let rows = catalog
                .programs
                .get_all()?
                .into_iter()
                .map(|p| {
                    vec![
                        id_cell(p.id),
                        p.position.to_string(),
                        p.name,
                        p.media_count.to_string(),
                    ]
                })
                .collect();
            print_table(&["id", "pos", "name", "media"], rows, "No programs.");
        }
        InnerCommand::MoveUp { kind, id } => {
            let position = catalog.move_up(kind, id)?;
            print_success(&format!("{} {} is now at position {}", kind, id, position));
        }
        InnerCommand::MoveDown { kind, id } => {
            let position = catalog.move_down(kind, id)?;
            print_success(&format!("{} {} is now at position {}", kind, id, position));
        }
        InnerCommand::Duplicate { kind, id } => {
            let copy_id = catalog.duplicate(kind, id)?;
            print_success(&format!("Duplicated {} {} as {}", kind, id, copy_id));
        }
        InnerCommand::Remove { kind, id } => {
            let removed = catalog.remove(kind, id)?;
            print_success(&format!(
                "Removed {} {} ({} records in total)",
                kind, id, removed
            ));
        }
        InnerCommand::Renumber { kind } => {
            let changed = catalog.update_positions(kind)?;
            print_success(&format!("{} positions changed", changed));
        }
        InnerCommand::Wipe { kind } => {
            let deleted = catalog.wipe(kind)?;
            print_success(&format!("Deleted {} {} records", deleted, kind));
        }
        InnerCommand::Stats => {
            let stats = catalog.stats()?;
            print_key_value("genres", &stats.genres.to_string());
            print_key_value(
                "movies",
                &format!(
                    "{} on {} media, {}",
                    stats.movies,
                    stats.movie_media,
                    format_minutes(stats.movie_length)
                ),
            );
            print_key_value(
                "shows",
                &format!(
                    "{}, {} seasons, {} episodes, {}",
                    stats.shows,
                    stats.seasons,
                    stats.episodes,
                    format_minutes(stats.show_length)
                ),
            );
            print_key_value(
                "games",
                &format!("{} on {} media", stats.games, stats.game_media),
            );
            print_key_value(
                "programs",
                &format!("{} on {} media", stats.programs, stats.program_media),
            );
            print_key_value(
                "music",
                &format!(
                    "{} on {} media, {} songs, {}",
                    stats.music,
                    stats.music_media,
                    stats.songs,
                    format_seconds(stats.music_length)
                ),
            );
        }
        InnerCommand::Where => {
            println!("{}", db_path.display());
        }
        InnerCommand::Exit => return Ok(CommandExecutionResult::Exit),
    }
    Ok(CommandExecutionResult::Ok)
}

fn print_table(headers: &[&str], rows: Vec<Vec<String>>, empty_message: &str) {
    if rows.is_empty() {
        print_empty_list(empty_message);
        return;
    }
    let mut table = TableBuilder::new(headers);
    for row in rows {
        table.add_row(row);
    }
    table.print();
}

fn id_cell(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

fn genre_names(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn languages(languages: &[Language]) -> String {
    languages
        .iter()
        .map(|l| l.to_db_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_minutes(minutes: i64) -> String {
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

fn format_seconds(seconds: i64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[derive(rustyline_derive::Hinter)]
struct MyHelper {
    commands_names: Vec<String>,
}

impl MyHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        MyHelper { commands_names }
    }
}

impl Completer for MyHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .cloned()
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for MyHelper {}
impl Validator for MyHelper {}
impl Helper for MyHelper {}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        db_path: cli_args.path,
        log_level: cli_args.log_level,
        history_file: cli_args.history_file,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(config.log_level.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let catalog = Catalog::open(&config.db_path)
        .with_context(|| format!("Could not open the catalog at {:?}", config.db_path))?;

    InnerCli::command().print_long_help()?;

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<MyHelper, FileHistory>::with_config(rl_config)?;
    rl.set_helper(Some(MyHelper::new()));
    if let Some(history_file) = &config.history_file {
        // A missing history file is normal on first run.
        let _ = rl.load_history(history_file);
    }

    let prompt = get_prompt();
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &catalog, &config.db_path) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => print_error(&err),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                println!("Error: {:?}", e);
                break;
            }
        }
    }

    if let Some(history_file) = &config.history_file {
        if let Err(err) = rl.save_history(history_file) {
            warn!("Could not save history to {:?}: {}", history_file, err);
        }
    }
    Ok(())
}
