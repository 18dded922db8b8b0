use docopt::Docopt;
use log::info;
use mazegame::{
    game::{LevelTable, MoveOutcome, Session},
    generators,
    grid_displays::{MazeView, PathDisplay, PlayerDisplay},
    pathing,
    player::Direction,
    units::{Height, Width},
};
use serde_derive::Deserialize;
use std::io::{self, prelude::*};

const USAGE: &str = "Maze game

Usage:
    mazegame -h | --help
    mazegame [--seed=<n>] [--show-path]
    mazegame render [--width=<w> --height=<h>] [--seed=<n>] [--show-path]

Options:
    -h --help          Show this screen.
    --seed=<n>         Seed the maze generator so every maze is reproducible.
    --width=<w>        Width of a rendered maze, odd and at least 3 [default: 17].
    --height=<h>       Height of a rendered maze, odd and at least 3 [default: 17].
    --show-path        Draw the route from the start to the exit.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_render: bool,
    flag_seed: Option<u64>,
    flag_width: usize,
    flag_height: usize,
    flag_show_path: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazegame::errors::Error, ::mazegame::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

enum MenuChoice {
    NewGame,
    Continue,
    Exit,
}

enum PlayResult {
    Menu,
    GameOver,
    InputClosed,
}

fn main() -> Result<()> {
    env_logger::init();

    // --help is reported as an error by docopt, but it is not a failure
    let args: MazeArgs = match Docopt::new(USAGE).and_then(|d| d.deserialize()) {
        Ok(args) => args,
        Err(e) if e.fatal() => return Err(e.into()),
        Err(e) => e.exit(),
    };

    if args.cmd_render {
        render_single_maze(&args)
    } else {
        run_game(&args)
    }
}

fn render_single_maze(args: &MazeArgs) -> Result<()> {
    let (width, height) = (Width(args.flag_width), Height(args.flag_height));
    let grid = match args.flag_seed {
        Some(seed) => generators::generate_seeded(width, height, seed)?,
        None => generators::generate(width, height)?,
    };

    let route = if args.flag_show_path {
        pathing::solution_path(&grid).map(|path| PathDisplay::new(&path))
    } else {
        None
    };

    let mut view = MazeView::new(&grid);
    if let Some(ref route) = route {
        view = view.with_overlay(route);
    }
    print!("{}", view);

    Ok(())
}

fn run_game(args: &MazeArgs) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut session: Option<Session> = None;

    loop {
        let choice = match display_menu(&mut input)? {
            Some(choice) => choice,
            None => break,
        };

        match choice {
            MenuChoice::NewGame => {
                session = Some(Session::new(LevelTable::default(), args.flag_seed)?);
            }
            MenuChoice::Continue => {
                if session.is_none() {
                    println!("There is no game to continue.");
                    continue;
                }
            }
            MenuChoice::Exit => break,
        }

        if let Some(ref mut current) = session {
            match play_game(current, args.flag_show_path, &mut input)? {
                PlayResult::Menu => {}
                PlayResult::GameOver => break,
                PlayResult::InputClosed => return Ok(()),
            }
        }
    }

    println!("Thanks for playing!");
    Ok(())
}

fn display_menu<R: BufRead>(input: &mut R) -> Result<Option<MenuChoice>> {
    println!("{}", "=".repeat(40));
    println!("1. Start a new game");
    println!("2. Continue (if available)");
    println!("3. Exit");
    println!("{}", "=".repeat(40));

    loop {
        let line = match prompt(input, "Choose a menu item (1-3): ")? {
            Some(line) => line,
            None => return Ok(None),
        };
        match line.as_str() {
            "1" => return Ok(Some(MenuChoice::NewGame)),
            "2" => return Ok(Some(MenuChoice::Continue)),
            "3" => return Ok(Some(MenuChoice::Exit)),
            _ => println!("Invalid choice. Please choose 1, 2 or 3."),
        }
    }
}

fn display_game_ui(session: &Session, show_path: bool) {
    let grid = session.grid();
    let player = PlayerDisplay::new(session.player().position());
    let route = if show_path {
        pathing::Distances::new(grid, session.player().position())
            .and_then(|distances| {
                grid.exit_position()
                    .and_then(|exit| pathing::shortest_path(grid, &distances, exit))
            })
            .map(|path| PathDisplay::new(&path))
    } else {
        None
    };

    println!("Level: {}", session.current_level().0);
    println!("Score: {}", session.player().score.0);
    println!("Controls: W-up, S-down, A-left, D-right, M-menu");

    let mut view = MazeView::new(grid).with_overlay(&player);
    if let Some(ref route) = route {
        view = view.with_overlay(route);
    }
    print!("{}", view);
}

fn play_game<R: BufRead>(session: &mut Session, show_path: bool, input: &mut R) -> Result<PlayResult> {
    loop {
        display_game_ui(session, show_path);

        loop {
            let line = match prompt(input, "Enter a command: ")? {
                Some(line) => line.to_lowercase(),
                None => return Ok(PlayResult::InputClosed),
            };

            let mut keys = line.chars();
            let direction = match (keys.next(), keys.next()) {
                (Some('m'), None) => return Ok(PlayResult::Menu),
                (Some(key), None) => Direction::from_key(key),
                _ => None,
            };

            let direction = match direction {
                Some(direction) => direction,
                None => {
                    println!("Unknown command! Use W, A, S, D to move or M for the menu.");
                    continue;
                }
            };

            match session.step(direction)? {
                MoveOutcome::Blocked => {
                    println!("Can't move there! A wall is in the way.");
                }
                MoveOutcome::Moved => break,
                MoveOutcome::LevelComplete { level, awarded } => {
                    println!("Congratulations! You completed level {}!", level.0);
                    println!("Points earned: {}", awarded.0);
                    if prompt(input, "Press Enter to go to the next level...")?.is_none() {
                        return Ok(PlayResult::InputClosed);
                    }
                    break;
                }
                MoveOutcome::GameComplete { total, .. } => {
                    println!("Congratulations! You completed every level!");
                    println!("Final score: {}", total.0);
                    info!("game finished with {} points", total.0);
                    return Ok(PlayResult::GameOver);
                }
            }
        }
    }
}

/// Print a prompt and read one trimmed line. None once stdin is closed.
fn prompt<R: BufRead>(input: &mut R, text: &str) -> Result<Option<String>> {
    print!("{}", text);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
