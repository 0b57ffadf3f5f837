//! Movement selection: bounded-depth lookahead over the four cardinal
//! directions, with greedy and random fallbacks.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::city::{manhattan, CityMap};

/// Cardinal directions: up, down, left, right.
pub const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Score weight on remaining Manhattan distance to the target.
const DISTANCE_WEIGHT: f64 = 10.0;
/// Bonus for standing on a street tile instead of rough terrain.
const STREET_BONUS: f64 = 2.0;

fn valid(city: &CityMap, tile: (i32, i32)) -> bool {
    city.in_bounds(tile.0, tile.1) && !city.is_blocked(tile.0, tile.1)
}

/// Position score for one node of the tree: closer is better, streets are
/// better than rough ground.
pub fn position_score(city: &CityMap, tile: (i32, i32), target: (i32, i32)) -> f64 {
    let mut score = -DISTANCE_WEIGHT * manhattan(tile, target) as f64;
    if city.is_street(tile.0, tile.1) {
        score += STREET_BONUS;
    }
    score
}

/// Breadth-first expansion of move sequences up to `depth`, branching over
/// the four cardinal directions (so at most 4^depth leaf paths). Each node
/// adds its position score to the path's cumulative score; the first step
/// of the best deepest path wins. Returns `None` when no neighbor is
/// reachable at all.
pub fn best_lookahead_step(
    city: &CityMap,
    start: (i32, i32),
    target: (i32, i32),
    depth: u32,
) -> Option<(i32, i32)> {
    struct Node {
        tile: (i32, i32),
        first_step: (i32, i32),
        depth: u32,
        score: f64,
    }

    let mut frontier: Vec<Node> = Vec::new();
    for dir in DIRECTIONS {
        let next = (start.0 + dir.0, start.1 + dir.1);
        if valid(city, next) {
            frontier.push(Node {
                tile: next,
                first_step: next,
                depth: 1,
                score: position_score(city, next, target),
            });
        }
    }
    if frontier.is_empty() {
        return None;
    }

    let mut best: Option<(f64, u32, (i32, i32))> = None;
    let mut queue = std::collections::VecDeque::from(frontier);
    while let Some(node) = queue.pop_front() {
        let mut expanded = false;
        if node.depth < depth {
            for dir in DIRECTIONS {
                let next = (node.tile.0 + dir.0, node.tile.1 + dir.1);
                if valid(city, next) {
                    expanded = true;
                    queue.push_back(Node {
                        tile: next,
                        first_step: node.first_step,
                        depth: node.depth + 1,
                        score: node.score + position_score(city, next, target),
                    });
                }
            }
        }
        if !expanded {
            // Leaf: either at full depth or boxed in early.
            let replace = match best {
                None => true,
                Some((best_score, best_depth, _)) => {
                    node.depth > best_depth
                        || (node.depth == best_depth && node.score > best_score)
                }
            };
            if replace {
                best = Some((node.score, node.depth, node.first_step));
            }
        }
    }
    best.map(|(_, _, step)| step)
}

/// Single-step greedy evaluation: best-scoring immediate neighbor.
pub fn greedy_step(
    city: &CityMap,
    start: (i32, i32),
    target: (i32, i32),
) -> Option<(i32, i32)> {
    let mut best: Option<(f64, (i32, i32))> = None;
    for dir in DIRECTIONS {
        let next = (start.0 + dir.0, start.1 + dir.1);
        if !valid(city, next) {
            continue;
        }
        let score = position_score(city, next, target);
        match best {
            Some((best_score, _)) if score <= best_score => {}
            _ => best = Some((score, next)),
        }
    }
    best.map(|(_, tile)| tile)
}

/// Axis-priority step toward the target: move along the axis with the
/// larger remaining distance, falling back to the other axis when blocked.
pub fn axis_step(
    city: &CityMap,
    start: (i32, i32),
    target: (i32, i32),
    rng: &mut StdRng,
) -> Option<(i32, i32)> {
    let dx = (target.0 - start.0).signum();
    let dy = (target.1 - start.1).signum();
    if dx == 0 && dy == 0 {
        return None;
    }

    let distance_x = (target.0 - start.0).abs();
    let distance_y = (target.1 - start.1).abs();
    let (first, second) = if dx != 0 && dy != 0 {
        let x_first = if distance_x != distance_y {
            distance_x > distance_y
        } else {
            rng.gen_bool(0.5)
        };
        if x_first {
            ((dx, 0), (0, dy))
        } else {
            ((0, dy), (dx, 0))
        }
    } else {
        ((dx, dy), (0, 0))
    };

    for dir in [first, second] {
        if dir == (0, 0) {
            continue;
        }
        let next = (start.0 + dir.0, start.1 + dir.1);
        if valid(city, next) {
            return Some(next);
        }
    }
    None
}

/// Uniformly random valid cardinal neighbor.
pub fn random_step(city: &CityMap, start: (i32, i32), rng: &mut StdRng) -> Option<(i32, i32)> {
    let mut dirs = DIRECTIONS;
    dirs.shuffle(rng);
    for dir in dirs {
        let next = (start.0 + dir.0, start.1 + dir.1);
        if valid(city, next) {
            return Some(next);
        }
    }
    None
}
