//! A* search over sliding puzzle boards.
//!
//! Solvability is decided without parity arithmetic: the board and its
//! [`Board::twin`] are searched in lock-step, and exactly one of them can
//! reach the goal. Whichever gets there first settles the answer.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use tracing::{debug, trace};

use crate::board::{Board, Move};
use crate::error::{PuzzleError, Result};

const TRACE_INTERVAL: usize = 10_000;

/// Which boards a search refuses to enqueue again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dedup {
    /// Skip only the board the expanded node was reached from.
    #[default]
    Parent,
    /// Keep a closed set and never expand the same board twice.
    Visited,
}

#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    pub dedup: Dedup,
}

/// Work done by the main and twin searches of one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub main_expanded: usize,
    pub main_enqueued: usize,
    pub twin_expanded: usize,
    pub twin_enqueued: usize,
}

struct SearchNode {
    board: Board,
    moves: usize,
    parent: Option<usize>,
}

/// A* ordering key: moves made so far plus the manhattan estimate.
fn manhattan_priority(node: &SearchNode) -> usize {
    node.moves + node.board.manhattan()
}

enum Step {
    Running,
    Reached(usize),
    Exhausted,
}

/// One best-first search: an arena of nodes linked to their parent by index
/// and a min-heap of arena indices keyed by `priority`. Equal keys pop in
/// insertion order.
struct Search {
    nodes: Vec<SearchNode>,
    frontier: BinaryHeap<Reverse<(usize, usize)>>,
    priority: fn(&SearchNode) -> usize,
    closed: Option<HashSet<Board>>,
    expanded: usize,
}

impl Search {
    fn new(root: Board, priority: fn(&SearchNode) -> usize, dedup: Dedup) -> Self {
        let mut search = Self {
            nodes: Vec::new(),
            frontier: BinaryHeap::new(),
            priority,
            closed: match dedup {
                Dedup::Parent => None,
                Dedup::Visited => Some(HashSet::new()),
            },
            expanded: 0,
        };
        search.push(SearchNode {
            board: root,
            moves: 0,
            parent: None,
        });
        search
    }

    fn push(&mut self, node: SearchNode) {
        let key = (self.priority)(&node);
        let index = self.nodes.len();
        self.nodes.push(node);
        self.frontier.push(Reverse((key, index)));
    }

    /// Pops the best node and either reports it as the goal or expands it.
    fn step(&mut self) -> Step {
        let Some(Reverse((_, index))) = self.frontier.pop() else {
            return Step::Exhausted;
        };

        if let Some(closed) = &mut self.closed {
            if !closed.insert(self.nodes[index].board.clone()) {
                return Step::Running;
            }
        }

        let node = &self.nodes[index];
        if node.board.is_goal() {
            return Step::Reached(index);
        }
        self.expanded += 1;

        let moves = node.moves + 1;
        let parent_board = node.parent.map(|p| &self.nodes[p].board);
        let closed = self.closed.as_ref();
        let next: Vec<Board> = node
            .board
            .neighbors()
            .filter(|n| parent_board != Some(n))
            .filter(|n| closed.map_or(true, |c| !c.contains(n)))
            .collect();

        for board in next {
            self.push(SearchNode {
                board,
                moves,
                parent: Some(index),
            });
        }
        Step::Running
    }

    /// Boards from the root to `index`, inclusive.
    fn path_to(&self, index: usize) -> Vec<Board> {
        let mut path = Vec::new();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            path.push(self.nodes[i].board.clone());
            cursor = self.nodes[i].parent;
        }
        path.reverse();
        path
    }
}

/// Finds a minimum-move solution for a board, or proves there is none.
///
/// The whole search runs inside the constructor; the queries afterwards
/// only read the cached result.
#[derive(Debug, Clone)]
pub struct Solver {
    solution: Option<Vec<Board>>,
    stats: SearchStats,
}

impl Solver {
    pub fn new(initial: Board) -> Self {
        Self::with_config(initial, SolverConfig::default())
    }

    pub fn with_config(initial: Board, config: SolverConfig) -> Self {
        debug!(
            dimension = initial.dimension(),
            manhattan = initial.manhattan(),
            hamming = initial.hamming(),
            dedup = ?config.dedup,
            "Solving board"
        );

        let twin = initial.twin();
        let mut main = Search::new(initial, manhattan_priority, config.dedup);
        let mut twin = Search::new(twin, manhattan_priority, config.dedup);
        let mut twin_done = false;
        let mut rounds = 0usize;

        let solution = loop {
            rounds += 1;
            if rounds % TRACE_INTERVAL == 0 {
                trace!(
                    rounds,
                    main_frontier = main.frontier.len(),
                    twin_frontier = twin.frontier.len(),
                    "Search progress"
                );
            }

            match main.step() {
                Step::Reached(index) => break Some(main.path_to(index)),
                // The main board's whole component was searched without a goal.
                Step::Exhausted => break None,
                Step::Running => {}
            }

            if !twin_done {
                match twin.step() {
                    Step::Reached(_) => break None,
                    Step::Exhausted => twin_done = true,
                    Step::Running => {}
                }
            }
        };

        let stats = SearchStats {
            main_expanded: main.expanded,
            main_enqueued: main.nodes.len(),
            twin_expanded: twin.expanded,
            twin_enqueued: twin.nodes.len(),
        };

        debug!(
            solvable = solution.is_some(),
            moves = solution.as_ref().map(|s| s.len() - 1),
            main_expanded = stats.main_expanded,
            twin_expanded = stats.twin_expanded,
            "Search finished"
        );

        Self { solution, stats }
    }

    pub fn is_solvable(&self) -> bool {
        self.solution.is_some()
    }

    /// Minimum number of slides that solve the initial board.
    pub fn moves(&self) -> Result<usize> {
        self.path().map(|path| path.len() - 1)
    }

    /// Boards of a shortest solution, from the initial board to the goal.
    pub fn solution(&self) -> Result<std::slice::Iter<'_, Board>> {
        self.path().map(|path| path.iter())
    }

    /// The slide taken between each pair of consecutive solution boards.
    pub fn directions(&self) -> Result<Vec<Move>> {
        Ok(self
            .path()?
            .windows(2)
            .filter_map(|pair| pair[0].move_to(&pair[1]))
            .collect())
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    fn path(&self) -> Result<&[Board]> {
        self.solution.as_deref().ok_or(PuzzleError::Unsolvable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&[u32]]) -> Board {
        Board::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn goal_root_is_reached_immediately() {
        let mut search = Search::new(Board::goal(3).unwrap(), manhattan_priority, Dedup::Parent);
        assert!(matches!(search.step(), Step::Reached(0)));
        assert_eq!(search.expanded, 0);
        assert_eq!(search.path_to(0), vec![Board::goal(3).unwrap()]);
    }

    #[test]
    fn expansion_skips_the_parent_board() {
        let root = board(&[&[1, 2, 3], &[4, 5, 6], &[7, 0, 8]]);
        let mut search = Search::new(root.clone(), manhattan_priority, Dedup::Parent);

        assert!(matches!(search.step(), Step::Running));
        // Blank on the bottom edge: three children, no parent to skip yet.
        assert_eq!(search.nodes.len(), 4);

        // The goal child has the lowest priority and is popped next.
        match search.step() {
            Step::Reached(index) => {
                assert_eq!(search.nodes[index].moves, 1);
                assert_eq!(search.path_to(index).first(), Some(&root));
            }
            _ => panic!("expected the goal to be reached"),
        }

        // Expanding a non-goal child must not re-enqueue the root.
        let child = search
            .nodes
            .iter()
            .position(|n| n.parent == Some(0) && !n.board.is_goal())
            .unwrap();
        let before = search.nodes.len();
        search.frontier.clear();
        search.frontier.push(Reverse((0, child)));
        search.step();
        assert!(search.nodes[before..].iter().all(|n| n.board != root));
    }

    #[test]
    fn equal_priorities_pop_in_insertion_order() {
        // Interior blank: four children, none of them the goal.
        let root = board(&[&[1, 2, 3], &[4, 0, 5], &[7, 8, 6]]);
        let mut search = Search::new(root, |_| 0, Dedup::Parent);

        assert!(matches!(search.step(), Step::Running));
        assert_eq!(search.nodes.len(), 5);

        // Every key ties, so the children expand in the order they were pushed.
        for expected in 1..=4 {
            let before = search.nodes.len();
            assert!(matches!(search.step(), Step::Running));
            let children = &search.nodes[before..];
            assert!(!children.is_empty());
            assert!(children.iter().all(|n| n.parent == Some(expected)));
        }
    }

    #[test]
    fn visited_search_exhausts_a_goalless_component() {
        // 2x2 boards form two cycles of 12; this one lies on the unsolvable one.
        let unsolvable = board(&[&[2, 1], &[3, 0]]);
        let mut search = Search::new(unsolvable, manhattan_priority, Dedup::Visited);
        let mut steps = 0;
        loop {
            match search.step() {
                Step::Running => steps += 1,
                Step::Exhausted => break,
                Step::Reached(_) => panic!("goal is not reachable"),
            }
            assert!(steps < 1_000);
        }
        assert_eq!(search.closed.as_ref().map(HashSet::len), Some(12));
    }

    #[test]
    fn solves_one_move_board() {
        let solver = Solver::new(board(&[&[1, 2, 3], &[4, 5, 6], &[7, 0, 8]]));
        assert!(solver.is_solvable());
        assert_eq!(solver.moves(), Ok(1));
        assert_eq!(solver.directions().unwrap(), vec![Move::Left]);
    }

    #[test]
    fn unsolvable_queries_fail() {
        let solver = Solver::new(board(&[&[1, 2, 3], &[4, 5, 6], &[8, 7, 0]]));
        assert!(!solver.is_solvable());
        assert_eq!(solver.moves(), Err(PuzzleError::Unsolvable));
        assert!(solver.solution().is_err());
        assert_eq!(solver.directions(), Err(PuzzleError::Unsolvable));
    }
}
