//! External contour extraction and contour geometry.
//!
//! Foreground is 8-connected, background 4-connected. Each component's outer
//! boundary is traced with Moore-neighbour tracing starting at its first
//! pixel in raster order, so every contour starts at a topmost point.
//! Components lying inside another component's hole are not external and
//! are skipped.

use std::collections::VecDeque;

use super::mask::ForegroundMask;

/// Integer point, x right and y down
pub type Point = (i32, i32);

/// Clockwise neighbour offsets on screen, starting east
const DIRECTIONS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Closed boundary polyline of one connected foreground region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    /// Enclosed area by the shoelace formula, as a magnitude
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: i64 = (0..n)
            .map(|i| {
                let (x0, y0) = self.points[i];
                let (x1, y1) = self.points[(i + 1) % n];
                x0 as i64 * y1 as i64 - x1 as i64 * y0 as i64
            })
            .sum();
        (twice as f64 / 2.0).abs()
    }

    /// Point with the smallest y; the first one in traversal order on ties
    pub fn topmost(&self) -> Option<Point> {
        self.points
            .iter()
            .copied()
            .fold(None, |best: Option<Point>, p| match best {
                Some(b) if b.1 <= p.1 => Some(b),
                _ => Some(p),
            })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Contour with the largest enclosed area; the first one wins ties
pub fn largest_contour(contours: &[Contour]) -> Option<&Contour> {
    contours.iter().fold(None, |best: Option<&Contour>, c| match best {
        Some(b) if b.area() >= c.area() => Some(b),
        _ => Some(c),
    })
}

/// Outer boundaries of all external foreground components, in raster order
pub fn find_external_contours(mask: &ForegroundMask) -> Vec<Contour> {
    let (width, height) = (mask.width() as i64, mask.height() as i64);
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let outside = outside_background(mask);
    let mut labelled = vec![false; (width * height) as usize];
    let mut contours = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let index = (y * width + x) as usize;
            if !mask.get(x, y) || labelled[index] {
                continue;
            }
            label_component(mask, &mut labelled, (x, y));

            // Raster-first pixel: its west neighbour is background. If that
            // background is enclosed, the component sits in a hole.
            let west_enclosed = x > 0 && !outside[(y * width + x - 1) as usize];
            if west_enclosed {
                continue;
            }
            contours.push(trace_boundary(mask, (x, y)));
        }
    }

    contours
}

/// Background pixels 4-connected to the mask border
fn outside_background(mask: &ForegroundMask) -> Vec<bool> {
    let (width, height) = (mask.width() as i64, mask.height() as i64);
    let mut outside = vec![false; (width * height) as usize];
    let mut queue = VecDeque::new();

    let visit = |x: i64, y: i64, outside: &mut Vec<bool>, queue: &mut VecDeque<(i64, i64)>| {
        let index = (y * width + x) as usize;
        if !mask.get(x, y) && !outside[index] {
            outside[index] = true;
            queue.push_back((x, y));
        }
    };

    for x in 0..width {
        visit(x, 0, &mut outside, &mut queue);
        visit(x, height - 1, &mut outside, &mut queue);
    }
    for y in 0..height {
        visit(0, y, &mut outside, &mut queue);
        visit(width - 1, y, &mut outside, &mut queue);
    }

    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let (nx, ny) = (x + dx, y + dy);
            if nx >= 0 && ny >= 0 && nx < width && ny < height {
                visit(nx, ny, &mut outside, &mut queue);
            }
        }
    }

    outside
}

/// Flood-fill one 8-connected component into `labelled`
fn label_component(mask: &ForegroundMask, labelled: &mut [bool], start: (i64, i64)) {
    let width = mask.width() as i64;
    let mut stack = vec![start];
    labelled[(start.1 * width + start.0) as usize] = true;

    while let Some((x, y)) = stack.pop() {
        for (dx, dy) in DIRECTIONS {
            let (nx, ny) = (x + dx, y + dy);
            if mask.get(nx, ny) {
                let index = (ny * width + nx) as usize;
                if !labelled[index] {
                    labelled[index] = true;
                    stack.push((nx, ny));
                }
            }
        }
    }
}

/// Moore-neighbour trace of the outer boundary through `start`
///
/// Stops when the walk leaves `start` toward the same pixel as its very
/// first move.
fn trace_boundary(mask: &ForegroundMask, start: (i64, i64)) -> Contour {
    let to_point = |(x, y): (i64, i64)| (x as i32, y as i32);
    let mut points = vec![to_point(start)];

    let mut current = start;
    let mut backtrack = (start.0 - 1, start.1);
    let mut first_move = None;
    // Each boundary pixel is entered at most 4 times
    let limit = 4 * (mask.width() as usize * mask.height() as usize) + 8;

    for _ in 0..limit {
        let Some(from) = direction_between(current, backtrack) else {
            break;
        };

        let mut next = None;
        for i in 1..=8 {
            let d = (from + i) % 8;
            let candidate = (current.0 + DIRECTIONS[d].0, current.1 + DIRECTIONS[d].1);
            if mask.get(candidate.0, candidate.1) {
                let prev = (from + i - 1) % 8;
                let new_backtrack = (current.0 + DIRECTIONS[prev].0, current.1 + DIRECTIONS[prev].1);
                next = Some((candidate, new_backtrack));
                break;
            }
        }

        // Isolated pixel
        let Some((candidate, new_backtrack)) = next else {
            break;
        };

        if current == start {
            match first_move {
                None => first_move = Some(candidate),
                Some(first) if first == candidate => {
                    // Drop the closing arrival at start
                    points.pop();
                    break;
                }
                Some(_) => {}
            }
        }

        current = candidate;
        backtrack = new_backtrack;
        points.push(to_point(current));
    }

    Contour { points }
}

fn direction_between(from: (i64, i64), to: (i64, i64)) -> Option<usize> {
    let delta = (to.0 - from.0, to.1 - from.1);
    DIRECTIONS.iter().position(|d| *d == delta)
}
