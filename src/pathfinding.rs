// Bounded A* over the 4-connected board
//
// Cells on a living snake's body or on a hazard are impassable. Every step
// costs 1 and the estimate is the Manhattan distance, so the first time the
// goal is popped its cost is the exact shortest distance.
//
// The open set is a std BinaryHeap without decrease-key. A cheaper route to a
// queued cell is pushed again and the outdated heap entry is skipped when it
// surfaces.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::config::PathfindingConfig;
use crate::profile;
use crate::snapshot::GameSnapshot;
use crate::types::Coord;

pub const MAX_ITERATIONS: usize = 1000;
pub const MAX_DISTANCE: f64 = 100.0;

/// Per-cell search record
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    g: u32,
    h: u32,
    parent: Option<Coord>,
}

impl SearchNode {
    fn f(&self) -> u32 {
        self.g + self.h
    }
}

/// Heap entry, ordered so that BinaryHeap pops the lowest f first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    g: u32,
    coord: Coord,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            // deeper nodes first on equal f
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| (other.coord.x, other.coord.y).cmp(&(self.coord.x, self.coord.y)))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Outcome of one search run
struct SearchRun {
    goal_cost: Option<u32>,
    nodes: HashMap<Coord, SearchNode>,
    expansions: usize,
}

/// A* search with an expansion budget and an "unreachable" distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AStar {
    pub max_iterations: usize,
    pub max_distance: f64,
}

impl Default for AStar {
    fn default() -> Self {
        AStar {
            max_iterations: MAX_ITERATIONS,
            max_distance: MAX_DISTANCE,
        }
    }
}

impl AStar {
    pub fn new(max_iterations: usize, max_distance: f64) -> Self {
        AStar {
            max_iterations,
            max_distance,
        }
    }

    pub fn from_config(config: &PathfindingConfig) -> Self {
        Self::new(config.max_iterations, config.max_distance)
    }

    /// Shortest number of steps from `start` to `end`
    ///
    /// Returns `max_distance` when `end` cannot be reached or the expansion
    /// budget runs out first.
    pub fn distance(&self, start: Coord, end: Coord, snapshot: &GameSnapshot) -> f64 {
        match self.search(start, end, snapshot).goal_cost {
            Some(cost) => f64::from(cost),
            None => self.max_distance,
        }
    }

    /// Cells of a shortest route, `start` first and `end` last
    pub fn path(&self, start: Coord, end: Coord, snapshot: &GameSnapshot) -> Option<Vec<Coord>> {
        let run = self.search(start, end, snapshot);
        run.goal_cost?;

        let mut path = vec![end];
        let mut current = end;
        while let Some(parent) = run.nodes.get(&current).and_then(|n| n.parent) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    /// Number of nodes the search expands before it stops
    pub fn expansions(&self, start: Coord, end: Coord, snapshot: &GameSnapshot) -> usize {
        self.search(start, end, snapshot).expansions
    }

    /// A cell the search may step onto
    pub fn is_passable(coord: &Coord, snapshot: &GameSnapshot) -> bool {
        snapshot.in_bounds(coord) && !snapshot.is_body(coord) && !snapshot.is_hazard(coord)
    }

    fn search(&self, start: Coord, end: Coord, snapshot: &GameSnapshot) -> SearchRun {
        profile!("astar", {
            let mut nodes: HashMap<Coord, SearchNode> = HashMap::new();
            let mut open = BinaryHeap::new();
            let mut closed: HashSet<Coord> = HashSet::new();

            let start_node = SearchNode {
                g: 0,
                h: heuristic(&start, &end),
                parent: None,
            };
            open.push(OpenEntry {
                f: start_node.f(),
                g: 0,
                coord: start,
            });
            nodes.insert(start, start_node);

            let mut expansions = 0;
            while let Some(entry) = open.pop() {
                if closed.contains(&entry.coord) {
                    continue;
                }
                match nodes.get(&entry.coord) {
                    Some(node) if node.g == entry.g => {}
                    _ => continue,
                }

                if expansions >= self.max_iterations {
                    break;
                }
                expansions += 1;

                if entry.coord == end {
                    return SearchRun {
                        goal_cost: Some(entry.g),
                        nodes,
                        expansions,
                    };
                }

                closed.insert(entry.coord);

                for neighbor in entry.coord.neighbors().iter() {
                    if closed.contains(neighbor) || !Self::is_passable(neighbor, snapshot) {
                        continue;
                    }

                    let tentative_g = entry.g + 1;
                    let improves = nodes
                        .get(neighbor)
                        .map_or(true, |existing| tentative_g < existing.g);

                    if improves {
                        let node = SearchNode {
                            g: tentative_g,
                            h: heuristic(neighbor, &end),
                            parent: Some(entry.coord),
                        };
                        open.push(OpenEntry {
                            f: node.f(),
                            g: node.g,
                            coord: *neighbor,
                        });
                        nodes.insert(*neighbor, node);
                    }
                }
            }

            SearchRun {
                goal_cost: None,
                nodes,
                expansions,
            }
        })
    }
}

/// Manhattan distance, admissible and consistent for unit steps
fn heuristic(a: &Coord, b: &Coord) -> u32 {
    a.manhattan_distance(b) as u32
}

/// Bounded A* distance with the default budget
pub fn shortest_distance(start: Coord, end: Coord, snapshot: &GameSnapshot) -> f64 {
    AStar::default().distance(start, end, snapshot)
}
