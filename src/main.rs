//! # Self-Play Arena
//!
//! Command-line demo running AI-vs-AI series of any supported game through
//! the public `StrategyGame` API, the same way an embedding device would:
//! poll `update` at a frame cadence until the match ends, then read the
//! final position and the winner off the orchestrator.
//!
//! Boards are rendered twice per finished game: the plain `Display` form
//! and a small ANSI canvas that exercises the `PixelDisplay` interface,
//! with the winning cells highlighted.

use std::process;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use colored::Colorize;

use alphabeta::game_controller::StrategyGame;
use alphabeta::game_wrapper::FieldWrapper;
use alphabeta::games::{connect4::ConnectFourField, reversi::ReversiField, tictactoe::TicTacToeField};
use alphabeta::io::{Keypad, KeyValueStore, MemoryStore, PixelDisplay};
use alphabeta::strategy::{AiPreset, Strategy};
use alphabeta::{Cell, Color, Field, FieldMove};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Game to play: tictactoe, connect4 or reversi
    #[clap(short, long, default_value = "connect4")]
    game: String,

    /// Difficulty preset for player 1: easy, medium or hard
    #[clap(long, default_value = "medium")]
    p1: String,

    /// Difficulty preset for player 2: easy, medium or hard
    #[clap(long, default_value = "medium")]
    p2: String,

    /// Number of games in the series
    #[clap(short = 'n', long, default_value_t = 1)]
    games: u32,
}

fn starting_field(name: &str) -> Option<FieldWrapper> {
    match name.to_ascii_lowercase().as_str() {
        "tictactoe" | "ttt" => Some(FieldWrapper::TicTacToe(TicTacToeField::new())),
        "connect4" | "c4" => Some(FieldWrapper::ConnectFour(ConnectFourField::new())),
        "reversi" | "othello" => Some(FieldWrapper::Reversi(ReversiField::new())),
        _ => None,
    }
}

fn find_preset(presets: &[AiPreset; 3], name: &str) -> Option<AiPreset> {
    presets
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .copied()
}

/// Terminal-backed [`PixelDisplay`]: stages RGB pixels and prints them as
/// truecolor blocks on `flush`.
struct AnsiCanvas {
    width: usize,
    height: usize,
    pixels: Vec<(u8, u8, u8)>,
}

impl AnsiCanvas {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![(0, 0, 0); width * height],
        }
    }
}

impl PixelDisplay for AnsiCanvas {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: (u8, u8, u8)) {
        self.pixels[x + y * self.width] = color;
    }

    fn flush(&mut self) {
        for y in 0..self.height {
            let mut line = String::new();
            for x in 0..self.width {
                let (r, g, b) = self.pixels[x + y * self.width];
                line.push_str(&"██".truecolor(r, g, b).to_string());
            }
            println!("{}", line);
        }
    }
}

const COLOR_P1: (u8, u8, u8) = (220, 40, 40);
const COLOR_P2: (u8, u8, u8) = (40, 80, 220);
const COLOR_EMPTY: (u8, u8, u8) = (24, 24, 24);
const COLOR_WIN: (u8, u8, u8) = (255, 255, 255);

fn render_canvas(field: &FieldWrapper, winning: &[<FieldWrapper as Field>::Move]) {
    let mut canvas = AnsiCanvas::new(field.width(), field.height());
    for y in 0..field.height() {
        for x in 0..field.width() {
            let color = match field.cell(x, y) {
                Cell::Color1 => COLOR_P1,
                Cell::Color2 => COLOR_P2,
                _ => COLOR_EMPTY,
            };
            canvas.set_pixel(x, y, color);
        }
    }
    for mv in winning {
        canvas.set_pixel(mv.x(), mv.y(), COLOR_WIN);
    }
    canvas.flush();
}

fn play_one(proto: &FieldWrapper, p1: AiPreset, p2: AiPreset) -> StrategyGame<FieldWrapper> {
    let start = proto.restarted();
    let mut game = StrategyGame::new(move || start.clone(), proto.presets());
    game.start_with(Strategy::ai(Color::One, p1), Strategy::ai(Color::Two, p2));

    let mut ctrl = Keypad::new();
    let frame = Duration::from_millis(5);
    let mut last = Instant::now();
    while !game.is_over() {
        let now = Instant::now();
        game.update(&mut ctrl, now - last);
        last = now;
        thread::sleep(frame);
    }
    game
}

fn main() {
    let args = Args::parse();

    let proto = match starting_field(&args.game) {
        Some(field) => field,
        None => {
            eprintln!("unknown game '{}', expected tictactoe, connect4 or reversi", args.game);
            process::exit(2);
        }
    };
    let presets = proto.presets();
    let (p1, p2) = match (find_preset(&presets, &args.p1), find_preset(&presets, &args.p2)) {
        (Some(p1), Some(p2)) => (p1, p2),
        _ => {
            eprintln!("unknown preset, expected easy, medium or hard");
            process::exit(2);
        }
    };

    println!(
        "{} - {} ({}) vs {} ({}), {} game(s)",
        proto.name().bold(),
        "P1".red(),
        p1.name,
        "P2".blue(),
        p2.name,
        args.games
    );

    let mut tally = MemoryStore::new();
    for round in 1..=args.games {
        let game = play_one(&proto, p1, p2);

        let field = match game.field() {
            Some(field) => field,
            None => continue,
        };
        println!("\ngame {}:\n{}", round, field);
        render_canvas(field, &game.winning_moves());

        let (key, line) = match game.winner() {
            Some(Color::One) => ("p1_wins", "P1 wins".red().bold()),
            Some(Color::Two) => ("p2_wins", "P2 wins".blue().bold()),
            None => ("draws", "draw".white().bold()),
        };
        let count = tally
            .load_value(key)
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0)
            + 1;
        tally.save_value(key, &count.to_string());
        println!("{}", line);
    }

    let score = |key: &str| {
        tally
            .load_value(key)
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0)
    };
    println!(
        "\nseries: {} {} / {} {} / {} draws",
        score("p1_wins").to_string().red(),
        "P1".red(),
        score("p2_wins").to_string().blue(),
        "P2".blue(),
        score("draws")
    );
}
