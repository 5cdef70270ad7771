use std::io::{self, BufRead, Write};

use anyhow::{Context, bail};
use clap::Parser;
use sweeper_protocol::{GameInfoResponse, NewGameRequest, ServiceError, TurnRequest};
use sweeper_session::{GameSession, InMemoryStore, SessionConfig};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Play a game of mines in the terminal", long_about = None)]
struct Args {
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board width in cells
    #[arg(short = 'W', long, default_value_t = 9)]
    width: i32,

    /// Board height in cells
    #[arg(short = 'H', long, default_value_t = 9)]
    height: i32,

    /// Number of mines
    #[arg(short, long, default_value_t = 10)]
    mines: i32,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print every game state as JSON instead of a grid
    #[arg(long)]
    json: bool,
}

fn init_logging(level: log::LevelFilter) {
    let level = match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn print_game(out: &mut impl Write, game: &GameInfoResponse, json: bool) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(game)?)?;
        return Ok(());
    }

    write!(out, "   ")?;
    for col in 0..game.width {
        write!(out, "{:>3}", col)?;
    }
    writeln!(out)?;
    for (row, cells) in game.field.iter().enumerate() {
        write!(out, "{:>3}", row)?;
        for cell in cells {
            let shown = if cell == " " { "." } else { cell.as_str() };
            write!(out, "{:>3}", shown)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn parse_move(line: &str) -> anyhow::Result<(i32, i32)> {
    let mut parts = line.split_whitespace();
    let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("expected `<row> <col>`");
    };
    let row = row.parse().with_context(|| format!("bad row {row:?}"))?;
    let col = col.parse().with_context(|| format!("bad col {col:?}"))?;
    Ok((row, col))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose.log_level_filter());
    log::debug!("seed: {:?}", args.seed);

    let session = GameSession::with_config(
        InMemoryStore::new(),
        SessionConfig { seed: args.seed },
    );
    let request = NewGameRequest {
        width: args.width,
        height: args.height,
        mines_count: args.mines,
    };
    let mut game = session
        .new_game_request(&request)
        .context("could not start a game")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    print_game(&mut stdout, &game, args.json)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "q" || line == "quit" {
            break;
        }

        let (row, col) = match parse_move(line) {
            Ok(coords) => coords,
            Err(err) => {
                writeln!(stdout, "{err:#}")?;
                continue;
            }
        };
        let turn = TurnRequest {
            game_id: game.game_id,
            row,
            col,
        };
        match session.turn_request(&turn) {
            Ok(next) => game = next,
            Err(err) => {
                let body = ServiceError::from(&err);
                writeln!(stdout, "{} ({}): {err}", body.code, body.status)?;
                continue;
            }
        }

        print_game(&mut stdout, &game, args.json)?;
        if game.completed {
            let exploded = game.field.iter().flatten().any(|cell| cell == "X");
            writeln!(stdout, "{}", if exploded { "Boom. Game over." } else { "Cleared!" })?;
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_row_and_column() {
        assert_eq!(parse_move("3 4").unwrap(), (3, 4));
        assert_eq!(parse_move("  0\t12 ").unwrap(), (0, 12));
        assert!(parse_move("3").is_err());
        assert!(parse_move("3 4 5").is_err());
        assert!(parse_move("a 4").is_err());
    }

    #[test]
    fn grid_output_marks_hidden_cells() {
        let game = GameInfoResponse {
            game_id: Default::default(),
            width: 2,
            height: 1,
            mines_count: 1,
            completed: false,
            field: vec![vec![" ".to_string(), "1".to_string()]],
        };
        let mut out = Vec::new();
        print_game(&mut out, &game, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "     0  1\n  0  .  1\n");
    }
}
