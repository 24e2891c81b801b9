use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use rookery::{CastleSide, Color, Game, Move, SearchConfig, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Agent {
    Human,
    Engine,
    Random,
}

#[derive(Debug, Parser)]
#[command(name = "rookery", version, about = "Two-player chess in the terminal")]
struct Args {
    /// Who plays white
    #[arg(long, value_enum, default_value_t = Agent::Human)]
    white: Agent,

    /// Who plays black
    #[arg(long, value_enum, default_value_t = Agent::Engine)]
    black: Agent,

    /// Engine search depth in plies
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    depth: u32,

    /// Search the full tree without alpha-beta pruning
    #[arg(long)]
    no_pruning: bool,

    /// Seed for random moves
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many turns
    #[arg(long)]
    max_turns: Option<usize>,
}

/// One line of human input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play(Move),
    Random,
    Best,
    Undo,
    Moves,
    Forfeit,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        let command = match input.to_ascii_lowercase().as_str() {
            "kc" => Command::Play(Move::Castle(CastleSide::King)),
            "qc" => Command::Play(Move::Castle(CastleSide::Queen)),
            "r" => Command::Random,
            "b" => Command::Best,
            "u" => Command::Undo,
            "m" => Command::Moves,
            "ff" => Command::Forfeit,
            "h" | "?" => Command::Help,
            "q" => Command::Quit,
            _ => {
                let squares: String = input.chars().filter(|c| !c.is_whitespace()).collect();
                if squares.len() != 4 || !squares.is_ascii() {
                    return Err(anyhow!("unknown command {:?}, type h for help", input));
                }
                let (from, to) = squares.split_at(2);
                let from: Square = from.parse()?;
                let to: Square = to.parse()?;
                Command::Play(Move::step(from, to))
            }
        };
        Ok(command)
    }
}

const HELP: &str = "\
e2e4 / e2 e4   move a piece
kc / qc        castle king side / queen side
r              play a random legal move
b              let the engine move for you
u              undo the last turn
m              list legal moves
ff             forfeit
q              quit";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = SearchConfig::default()
        .with_depth(args.depth)
        .with_alpha_beta(!args.no_pruning);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut game = Game::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("{}", game.render_text());
        if game.state().is_over() {
            println!("{}", game.state());
            break;
        }
        if let Some(max) = args.max_turns {
            if game.position().history().len() >= max {
                println!("stopping after {} turns", max);
                break;
            }
        }

        let color = game.turn();
        match agent_for(&args, color) {
            Agent::Engine => {
                let mv = game.engine_move(&config)?;
                println!("{} plays {}", color, mv);
            }
            Agent::Random => {
                let mv = game.random_move(&mut rng)?;
                println!("{} plays {}", color, mv);
            }
            Agent::Human => {
                print!("{} to move: ", color);
                io::stdout().flush()?;
                let Some(line) = lines.next() else {
                    break;
                };
                let line = line.context("failed to read from stdin")?;

                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                match command {
                    Command::Play(mv) => {
                        if !game.attempt(mv) {
                            if let Some(reason) = game.last_error() {
                                println!("illegal: {}", reason);
                            }
                        }
                    }
                    Command::Random => {
                        let mv = game.random_move(&mut rng)?;
                        println!("{} plays {}", color, mv);
                    }
                    Command::Best => {
                        let mv = game.engine_move(&config)?;
                        println!("{} plays {}", color, mv);
                    }
                    Command::Undo => undo(&mut game, &args),
                    Command::Moves => {
                        let moves: Vec<String> = game.legal_moves_for(color).iter().map(Move::to_string).collect();
                        println!("{}", moves.join(" "));
                    }
                    Command::Forfeit => game.forfeit()?,
                    Command::Help => println!("{}", HELP),
                    Command::Quit => break,
                }
            }
        }
    }

    Ok(())
}

fn agent_for(args: &Args, color: Color) -> Agent {
    match color {
        Color::White => args.white,
        Color::Black => args.black,
    }
}

/// Take back turns until a human is to move again.
fn undo(game: &mut Game, args: &Args) {
    loop {
        match game.unmake_turn() {
            Ok(turn) => println!("undid {}", turn.as_move()),
            Err(e) => {
                println!("{}", e);
                return;
            }
        }
        if agent_for(args, game.turn()) == Agent::Human || game.position().history().is_empty() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let e2: Square = "E2".parse().unwrap();
        let e4: Square = "E4".parse().unwrap();
        assert_eq!("e2e4".parse::<Command>().unwrap(), Command::Play(Move::step(e2, e4)));
        assert_eq!(" E2 E4 ".parse::<Command>().unwrap(), Command::Play(Move::step(e2, e4)));
        assert_eq!("KC".parse::<Command>().unwrap(), Command::Play(Move::Castle(CastleSide::King)));
        assert_eq!("qc".parse::<Command>().unwrap(), Command::Play(Move::Castle(CastleSide::Queen)));
        assert_eq!("u".parse::<Command>().unwrap(), Command::Undo);
        assert_eq!("ff".parse::<Command>().unwrap(), Command::Forfeit);
    }

    #[test]
    fn test_depth_must_be_positive() {
        assert!(Args::try_parse_from(["rookery", "--depth", "0"]).is_err());
        let args = Args::try_parse_from(["rookery", "--depth", "2", "--white", "random"]).unwrap();
        assert_eq!(args.depth, 2);
        assert_eq!(args.white, Agent::Random);
        assert_eq!(Args::try_parse_from(["rookery"]).unwrap().depth, 3);
    }

    #[test]
    fn test_reject_bad_input() {
        assert!("e9e4".parse::<Command>().is_err());
        assert!("hello".parse::<Command>().is_err());
        assert!("x".parse::<Command>().is_err());
    }
}
