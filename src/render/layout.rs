//! Force-directed (Fruchterman–Reingold) layout for the hierarchy graph.

use crate::core::hierarchy::HierarchyGraph;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

const INITIAL_TEMPERATURE: f64 = 0.1;
const MIN_DISTANCE: f64 = 0.01;
const CONVERGENCE_THRESHOLD: f64 = 1e-4;

/// Compute node positions in `[-1, 1]²`, indexed like `graph.nodes()`.
///
/// Starting positions are derived from each node's path, so the same graph
/// always produces the same layout.
pub fn spring_layout(graph: &HierarchyGraph, iterations: usize) -> Vec<Point> {
    let n = graph.len();
    match n {
        0 => return Vec::new(),
        1 => return vec![Point { x: 0.0, y: 0.0 }],
        _ => {}
    }

    let mut pos: Vec<Point> = graph
        .nodes()
        .iter()
        .map(|node| Point {
            x: hash01(node.path.as_os_str().as_encoded_bytes(), 0x811c_9dc5),
            y: hash01(node.path.as_os_str().as_encoded_bytes(), 0x0100_0193),
        })
        .collect();

    let adjacency = adjacency_lists(graph);
    let k = 1.0 / (n as f64).sqrt();

    let (min_x, max_x, min_y, max_y) = bounds(&pos);
    let mut temperature = (max_x - min_x).max(max_y - min_y) * INITIAL_TEMPERATURE;
    let cooling = temperature / (iterations as f64 + 1.0);

    let mut displacement = vec![Point { x: 0.0, y: 0.0 }; n];
    for _ in 0..iterations {
        for (i, disp) in displacement.iter_mut().enumerate() {
            let mut dx_sum = 0.0;
            let mut dy_sum = 0.0;
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i].x - pos[j].x;
                let dy = pos[i].y - pos[j].y;
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                // Repulsion between every pair.
                let force = k * k / (dist * dist);
                dx_sum += dx * force;
                dy_sum += dy * force;
            }
            // Attraction along edges.
            for &j in &adjacency[i] {
                let dx = pos[i].x - pos[j].x;
                let dy = pos[i].y - pos[j].y;
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                dx_sum -= dx * dist / k;
                dy_sum -= dy * dist / k;
            }
            *disp = Point { x: dx_sum, y: dy_sum };
        }

        let mut moved = 0.0;
        for (p, d) in pos.iter_mut().zip(&displacement) {
            let mut length = (d.x * d.x + d.y * d.y).sqrt();
            if length < MIN_DISTANCE {
                length = 0.1;
            }
            let step_x = d.x * temperature / length;
            let step_y = d.y * temperature / length;
            p.x += step_x;
            p.y += step_y;
            moved += (step_x * step_x + step_y * step_y).sqrt();
        }
        temperature -= cooling;

        if moved / (n as f64) < CONVERGENCE_THRESHOLD {
            break;
        }
    }

    rescale(&mut pos);
    pos
}

fn adjacency_lists(graph: &HierarchyGraph) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); graph.len()];
    for (parent, child) in graph.edges() {
        adjacency[parent].push(child);
        adjacency[child].push(parent);
    }
    adjacency
}

fn bounds(pos: &[Point]) -> (f64, f64, f64, f64) {
    pos.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(min_x, max_x, min_y, max_y), p| {
            (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y))
        },
    )
}

/// Center on the mean and scale so the largest coordinate magnitude is 1.
fn rescale(pos: &mut [Point]) {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p.y).sum::<f64>() / n;

    let mut lim: f64 = 0.0;
    for p in pos.iter_mut() {
        p.x -= mean_x;
        p.y -= mean_y;
        lim = lim.max(p.x.abs()).max(p.y.abs());
    }
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p.x /= lim;
            p.y /= lim;
        }
    }
}

/// FNV-1a hash of `bytes` mapped to `0.0..1.0`.
fn hash01(bytes: &[u8], seed: u32) -> f64 {
    let mut h: u32 = seed;
    for &b in bytes {
        h ^= b as u32;
        h = h.wrapping_mul(16777619);
    }
    ((h >> 8) as f64) / ((u32::MAX >> 8) as f64 + 1.0)
}
