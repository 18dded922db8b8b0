//! Level progression: which maze to carve for each level, what finishing it is worth, and a
//! `Session` that drives a player through every level in turn.

use error_chain::bail;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::*;
use crate::generators;
use crate::grid::Grid;
use crate::player::{Direction, Player};
use crate::units::{Height, Level, Score, Width};
use crate::utils::{self, FnvHashMap};

const BASE_SIZE: usize = 15;
const SIZE_INCREASE_PER_LEVEL: usize = 2;
const DEFAULT_LEVEL_SCORE: Score = Score(100);
const MAX_LEVELS: u32 = 5;

#[derive(Debug, Clone)]
pub struct LevelTable {
    max_levels: u32,
    level_scores: FnvHashMap<Level, Score>,
    default_score: Score,
}

impl Default for LevelTable {
    fn default() -> LevelTable {
        let mut level_scores = utils::fnv_hashmap(MAX_LEVELS as usize);
        for level in 1..=MAX_LEVELS {
            let _ = level_scores.insert(Level(level), Score(level * 100));
        }
        LevelTable {
            max_levels: MAX_LEVELS,
            level_scores,
            default_score: DEFAULT_LEVEL_SCORE,
        }
    }
}

impl LevelTable {
    pub fn new(max_levels: u32, level_scores: FnvHashMap<Level, Score>) -> LevelTable {
        LevelTable {
            max_levels,
            level_scores,
            default_score: DEFAULT_LEVEL_SCORE,
        }
    }

    #[inline]
    pub fn max_levels(&self) -> u32 {
        self.max_levels
    }

    #[inline]
    pub fn is_last_level(&self, level: Level) -> bool {
        level.0 >= self.max_levels
    }

    /// Points for completing a level, falling back to the default for levels with no entry.
    pub fn score_for(&self, level: Level) -> Score {
        self.level_scores.get(&level).cloned().unwrap_or(self.default_score)
    }

    /// Square maze side length for a level. Always odd so it lines up with the carving.
    pub fn level_size(&self, level: Level) -> Result<(Width, Height)> {
        if level.0 == 0 || level.0 > self.max_levels {
            bail!(ErrorKind::InvalidLevel(level.0));
        }
        let side = BASE_SIZE + level.0 as usize * SIZE_INCREASE_PER_LEVEL;
        Ok((Width(side), Height(side)))
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum MoveOutcome {
    /// A wall or the grid edge is in the way.
    Blocked,
    Moved,
    /// The exit was reached and the next level's maze is ready.
    LevelComplete { level: Level, awarded: Score },
    /// The exit of the final level was reached.
    GameComplete { awarded: Score, total: Score },
}

/// One play-through from the first level to the last.
#[derive(Debug)]
pub struct Session {
    table: LevelTable,
    rng: StdRng,
    current_level: Level,
    grid: Grid,
    player: Player,
    finished: bool,
}

impl Session {
    /// Start a new game on level 1. With a seed every maze in the session is reproducible.
    pub fn new(table: LevelTable, seed: Option<u64>) -> Result<Session> {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let first_level = Level(1);
        let grid = carve_level(&table, first_level, &mut rng)?;
        let player = Player::new(grid.start_position());

        info!("starting level {}", first_level.0);
        Ok(Session {
            table,
            rng,
            current_level: first_level,
            grid,
            player,
            finished: false,
        })
    }

    #[inline]
    pub fn current_level(&self) -> Level {
        self.current_level
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn table(&self) -> &LevelTable {
        &self.table
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Move the player one cell, then check whether that finished the level or the game.
    pub fn step(&mut self, direction: Direction) -> Result<MoveOutcome> {
        if self.finished {
            return Ok(MoveOutcome::Blocked);
        }

        let (dx, dy) = direction.delta();
        if !self.player.try_move(dx, dy, &self.grid) {
            return Ok(MoveOutcome::Blocked);
        }

        match self.check_win_condition() {
            Some(MoveOutcome::LevelComplete { level, awarded }) => {
                self.start_level(Level(level.0 + 1))?;
                Ok(MoveOutcome::LevelComplete { level, awarded })
            }
            Some(outcome) => Ok(outcome),
            None => Ok(MoveOutcome::Moved),
        }
    }

    /// Is the player standing on the exit of the current maze.
    #[inline]
    pub fn is_at_exit(&self) -> bool {
        Some(self.player.position()) == self.grid.exit_position()
    }

    /// Award the level's score if the player reached the exit. None when they have not.
    ///
    /// Only `step` calls this, straight after a move, and it leaves the exit cell by starting
    /// the next level or finishing the game, so a level is awarded once.
    fn check_win_condition(&mut self) -> Option<MoveOutcome> {
        if !self.is_at_exit() {
            return None;
        }

        let level = self.current_level;
        let awarded = self.table.score_for(level);
        self.player.award(awarded);
        info!("level {} complete, awarded {} points", level.0, awarded.0);

        if self.table.is_last_level(level) {
            self.finished = true;
            info!("all levels complete, final score {}", self.player.score.0);
            Some(MoveOutcome::GameComplete { awarded, total: self.player.score })
        } else {
            Some(MoveOutcome::LevelComplete { level, awarded })
        }
    }

    /// Carve the maze for `level` and put the player at its start, keeping their score.
    pub fn start_level(&mut self, level: Level) -> Result<()> {
        self.grid = carve_level(&self.table, level, &mut self.rng)?;
        let score = self.player.score;
        self.player = Player::new(self.grid.start_position());
        self.player.score = score;
        self.current_level = level;
        info!("starting level {}", level.0);
        Ok(())
    }
}

fn carve_level<R: Rng>(table: &LevelTable, level: Level, rng: &mut R) -> Result<Grid> {
    let (width, height) = table.level_size(level)?;
    generators::recursive_backtracker(width, height, rng)
        .chain_err(|| format!("failed to carve the maze for level {}", level.0))
}
