//! Grid pathfinding traces (BFS and DFS).
//!
//! Cells are encoded 0 = open, 1 = wall, 2 = start, 3 = end. `Step::array`
//! holds the flattened codes in row-major order and every index in a step,
//! including the auxiliary `visited`, `frontier` and `path` lists, is a flat
//! cell index.

use std::collections::VecDeque;

use crate::error::{Result, TraceError};
use crate::step::{Auxiliary, GraphAux, Recorder, Trace};

/// Kind of grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    Open = 0,
    Wall = 1,
    Start = 2,
    End = 3,
}

impl Cell {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }
}

impl TryFrom<u8> for Cell {
    type Error = u8;

    fn try_from(code: u8) -> std::result::Result<Self, u8> {
        match code {
            0 => Ok(Cell::Open),
            1 => Ok(Cell::Wall),
            2 => Ok(Cell::Start),
            3 => Ok(Cell::End),
            other => Err(other),
        }
    }
}

/// A validated rectangular grid with exactly one start and one end.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>"))]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    start: usize,
    end: usize,
}

impl Grid {
    /// Parse rows of cell codes.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut cells = Vec::with_capacity(rows.len() * cols);
        let mut starts = Vec::new();
        let mut ends = Vec::new();

        for (row, codes) in rows.iter().enumerate() {
            let codes = codes.as_ref();
            if codes.len() != cols {
                return Err(TraceError::RaggedGrid {
                    row,
                    len: codes.len(),
                    expected: cols,
                });
            }
            for (col, &code) in codes.iter().enumerate() {
                let cell = Cell::try_from(code)
                    .map_err(|code| TraceError::UnknownCell { row, col, code })?;
                match cell {
                    Cell::Start => starts.push(cells.len()),
                    Cell::End => ends.push(cells.len()),
                    _ => {}
                }
                cells.push(cell);
            }
        }

        if starts.len() != 1 {
            return Err(TraceError::StartCount(starts.len()));
        }
        if ends.len() != 1 {
            return Err(TraceError::EndCount(ends.len()));
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            cells,
            start: starts[0],
            end: ends[0],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// `(row, col)` of a flat index.
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Flattened cell codes.
    pub fn codes(&self) -> Vec<i64> {
        self.cells.iter().map(|c| i64::from(c.code())).collect()
    }

    /// Non-wall neighbours in the order up, right, down, left.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let (row, col) = self.coords(index);
        let up = (row > 0).then(|| index - self.cols);
        let right = (col + 1 < self.cols).then(|| index + 1);
        let down = (row + 1 < self.rows).then(|| index + self.cols);
        let left = (col > 0).then(|| index - 1);

        [up, right, down, left]
            .into_iter()
            .flatten()
            .filter(|&n| !self.cells[n].is_wall())
    }

    /// True when two cells share an edge.
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        let (ar, ac) = self.coords(a);
        let (br, bc) = self.coords(b);
        ar.abs_diff(br) + ac.abs_diff(bc) == 1
    }
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = TraceError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.cells
            .chunks(grid.cols.max(1))
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect()
    }
}

/// Frontier discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    /// Queue: breadth first, shortest path.
    Fifo,
    /// Stack: depth first.
    Lifo,
}

impl Order {
    fn name(self) -> &'static str {
        match self {
            Order::Fifo => "BFS",
            Order::Lifo => "DFS",
        }
    }
}

/// Breadth-first search from start to end.
pub fn bfs(grid: &Grid) -> Trace {
    explore(grid, Order::Fifo)
}

/// Depth-first search from start to end.
pub fn dfs(grid: &Grid) -> Trace {
    explore(grid, Order::Lifo)
}

struct Walk<'g> {
    grid: &'g Grid,
    codes: Vec<i64>,
    visited: Vec<usize>,
    is_visited: Vec<bool>,
    parent: Vec<Option<usize>>,
    frontier: VecDeque<usize>,
}

impl Walk<'_> {
    fn aux(&self, path: Vec<usize>) -> Auxiliary {
        let mut seen = vec![false; self.grid.len()];
        let frontier = self
            .frontier
            .iter()
            .copied()
            .filter(|&i| !self.is_visited[i] && !std::mem::replace(&mut seen[i], true))
            .collect();

        Auxiliary::Graph(GraphAux {
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            visited: self.visited.clone(),
            frontier,
            path,
        })
    }

    fn pos(&self, index: usize) -> String {
        let (r, c) = self.grid.coords(index);
        format!("({r}, {c})")
    }

    /// Walk parents back from `end`; returns start-to-end order.
    fn path_to(&self, end: usize) -> Vec<usize> {
        let mut path = vec![end];
        let mut cur = end;
        while let Some(prev) = self.parent[cur] {
            path.push(prev);
            cur = prev;
        }
        path.reverse();
        path
    }
}

fn explore(grid: &Grid, order: Order) -> Trace {
    let name = order.name();
    let start = grid.start();
    let end = grid.end();
    let mut walk = Walk {
        grid,
        codes: grid.codes(),
        visited: Vec::new(),
        is_visited: vec![false; grid.len()],
        parent: vec![None; grid.len()],
        frontier: VecDeque::from([start]),
    };
    // BFS marks cells when queued so each is queued once.
    let mut queued = vec![false; grid.len()];
    queued[start] = true;

    let mut rec = Recorder::new();
    rec.record_with(
        &walk.codes,
        [start],
        format!("Starting {name} from {}", walk.pos(start)),
        walk.aux(Vec::new()),
    );

    let mut found = false;
    // Every cell is visited at most once, so this runs at most grid.len() times.
    while let Some(cur) = match order {
        Order::Fifo => walk.frontier.pop_front(),
        Order::Lifo => walk.frontier.pop_back(),
    } {
        if walk.is_visited[cur] {
            continue;
        }
        walk.is_visited[cur] = true;
        walk.visited.push(cur);
        rec.record_with(
            &walk.codes,
            [cur],
            format!("Visiting {}", walk.pos(cur)),
            walk.aux(Vec::new()),
        );

        if cur == end {
            found = true;
            break;
        }

        let mut neighbors: Vec<usize> = grid.neighbors(cur).collect();
        if order == Order::Lifo {
            // Pushed in reverse so the first neighbour is popped first.
            neighbors.reverse();
        }

        for next in neighbors {
            let fresh = match order {
                Order::Fifo => !queued[next],
                Order::Lifo => !walk.is_visited[next],
            };
            if !fresh {
                continue;
            }
            queued[next] = true;
            walk.parent[next] = Some(cur);
            walk.frontier.push_back(next);
            rec.record_with(
                &walk.codes,
                [cur, next],
                format!("Discovered {} from {}", walk.pos(next), walk.pos(cur)),
                walk.aux(Vec::new()),
            );
        }
    }

    if found {
        let path = walk.path_to(end);
        for &cell in &path {
            rec.resolve(cell);
        }
        rec.record_with(
            &walk.codes,
            path.iter().copied(),
            format!(
                "Path Found: {} steps from {} to {}",
                path.len() - 1,
                walk.pos(start),
                walk.pos(end)
            ),
            walk.aux(path.clone()),
        );
    } else {
        walk.frontier.clear();
        rec.record_with(
            &walk.codes,
            [],
            format!(
                "No path: {} unreachable after visiting {} cells",
                walk.pos(end),
                walk.visited.len()
            ),
            walk.aux(Vec::new()),
        );
    }

    tracing::debug!(algorithm = name, steps = rec.len(), found, "grid search traced");
    rec.finish()
}
