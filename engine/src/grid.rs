use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The bundled maze. Short rows are padded with floor when parsed.
pub const DEFAULT_MAZE: &[&str] = &[
    "#############################",
    "                             ",
    "     #######         ####    ",
    "                             ",
    " ########     #####          ",
    "                         ####",
    "                             ",
    "####      ############       ",
    "                             ",
    "#############                 ",
    "                      ###### ",
    "                             ",
    "                   ####      ",
    "                             ",
    "#############################",
];

/// Where the player stands at the start of a run.
pub const START: Pos = Pos { x: 0, y: 1 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Floor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Immutable rectangular wall/floor grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    tiles: Vec<Tile>,
    width: usize,
    height: usize,
}

impl Grid {
    pub fn default_maze() -> Result<Self, EngineError> {
        Self::from_rows(DEFAULT_MAZE)
    }

    /// Parse newline-separated rows; `#` is a wall, anything else is floor.
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let rows: Vec<&str> = text.split('\n').map(|r| r.trim_end_matches('\r')).collect();
        Self::from_rows(&rows)
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, EngineError> {
        let width = rows.iter().map(|r| r.as_ref().chars().count()).max().unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Err(EngineError::InvalidMap("map has no cells".to_string()));
        }
        let mut tiles = Vec::with_capacity(width * rows.len());
        for row in rows {
            let mut n = 0;
            for ch in row.as_ref().chars() {
                tiles.push(if ch == '#' { Tile::Wall } else { Tile::Floor });
                n += 1;
            }
            tiles.extend(std::iter::repeat(Tile::Floor).take(width - n));
        }
        Ok(Self { tiles, width, height: rows.len() })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile(&self, pos: Pos) -> Option<Tile> {
        if pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some(self.tiles[pos.y * self.width + pos.x])
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.tile(pos) == Some(Tile::Floor)
    }

    /// One row of tiles, or `None` past the bottom edge.
    pub fn row(&self, y: usize) -> Option<&[Tile]> {
        (y < self.height).then(|| &self.tiles[y * self.width..(y + 1) * self.width])
    }

    /// All floor cells in row-major order.
    pub fn floor_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Pos::new(x, y)))
            .filter(move |&p| self.is_walkable(p))
    }

    /// The cell one step away, wrapping around the borders when `wrap` is set.
    /// Walls are not checked here.
    pub fn neighbor(&self, pos: Pos, dir: Direction, wrap: bool) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = pos.x as isize + dx;
        let ny = pos.y as isize + dy;
        if wrap {
            let x = nx.rem_euclid(self.width as isize) as usize;
            let y = ny.rem_euclid(self.height as isize) as usize;
            return Some(Pos::new(x, y));
        }
        if nx < 0 || ny < 0 || nx as usize >= self.width || ny as usize >= self.height {
            None
        } else {
            Some(Pos::new(nx as usize, ny as usize))
        }
    }

    /// In-bounds walkable orthogonal neighbours, without wrapping.
    pub fn open_neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| self.neighbor(pos, d, false))
            .filter(move |&p| self.is_walkable(p))
    }
}
