// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounding Volume Hierarchy
//!
//! Binned surface-area-heuristic BVH over primitive bounding boxes. The tree
//! stores primitive indices and boxes only; callers keep the primitives
//! themselves and run the exact intersection test on the candidates a
//! traversal yields.

use crate::aabb::Aabb;
use crate::ray::Ray;
use nalgebra::Point3;
use smallvec::SmallVec;

/// Maximum primitives stored in a leaf
const MAX_LEAF_PRIMITIVES: usize = 4;

/// Number of centroid bins evaluated per axis
const SAH_BINS: usize = 12;

#[derive(Debug, Clone, Copy)]
struct BvhNode {
    bounds: Aabb,
    /// Left child index (internal) or first primitive slot (leaf)
    left_or_start: u32,
    /// Right child index (internal) or primitive count (leaf)
    right_or_count: u32,
    is_leaf: bool,
}

/// Hierarchy over a fixed set of primitive boxes
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    /// Primitive indices in leaf order
    primitive_indices: Vec<u32>,
    /// Box of each primitive, by primitive index
    primitive_bounds: Vec<Aabb>,
}

#[derive(Clone, Copy)]
struct Bin {
    count: usize,
    bounds: Aabb,
}

impl Bvh {
    /// Build a hierarchy over `bounds` (one box per primitive)
    pub fn build(bounds: &[Aabb]) -> Self {
        let n = bounds.len();
        let mut indices: Vec<u32> = (0..n as u32).collect();
        let mut nodes = Vec::with_capacity(n.max(1) * 2);

        if n > 0 {
            let centroids: Vec<Point3<f64>> = bounds.iter().map(Aabb::centroid).collect();
            build_recursive(&mut nodes, &mut indices, bounds, &centroids, 0, n);
        }

        Self {
            nodes,
            primitive_indices: indices,
            primitive_bounds: bounds.to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn primitive_count(&self) -> usize {
        self.primitive_indices.len()
    }

    /// Call `visit` with every primitive whose box the ray enters within
    /// `[0, max_t]`. Order is traversal order, not distance order.
    pub fn traverse<F>(&self, ray: &Ray, max_t: f64, mut visit: F)
    where
        F: FnMut(usize),
    {
        if self.nodes.is_empty() {
            return;
        }

        let mut stack: SmallVec<[u32; 64]> = SmallVec::new();
        stack.push(0);

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            if node.bounds.intersect_ray(ray, max_t).is_none() {
                continue;
            }

            if node.is_leaf {
                let start = node.left_or_start as usize;
                let end = start + node.right_or_count as usize;
                for &prim in &self.primitive_indices[start..end] {
                    let prim = prim as usize;
                    if self.primitive_bounds[prim].intersect_ray(ray, max_t).is_some() {
                        visit(prim);
                    }
                }
            } else {
                stack.push(node.right_or_count);
                stack.push(node.left_or_start);
            }
        }
    }

    /// Primitive indices the ray may hit, in traversal order
    pub fn candidates(&self, ray: &Ray, max_t: f64) -> Vec<usize> {
        let mut out = Vec::new();
        self.traverse(ray, max_t, |prim| out.push(prim));
        out
    }
}

fn build_recursive(
    nodes: &mut Vec<BvhNode>,
    indices: &mut [u32],
    bounds: &[Aabb],
    centroids: &[Point3<f64>],
    start: usize,
    end: usize,
) -> u32 {
    let count = end - start;

    let node_bounds = indices[start..end]
        .iter()
        .fold(Aabb::empty(), |acc, &i| acc.union(&bounds[i as usize]));

    let node_idx = nodes.len() as u32;
    nodes.push(BvhNode {
        bounds: node_bounds,
        left_or_start: start as u32,
        right_or_count: count as u32,
        is_leaf: true,
    });

    if count <= MAX_LEAF_PRIMITIVES {
        return node_idx;
    }

    let (axis, split) = match find_best_split(&indices[start..end], bounds, centroids) {
        Some(found) => found,
        None => return node_idx,
    };

    // Order the slice so the `split` smallest centroids on `axis` come first
    indices[start..end].select_nth_unstable_by(split, |&a, &b| {
        centroids[a as usize][axis].total_cmp(&centroids[b as usize][axis])
    });

    let mid = start + split;
    let left = build_recursive(nodes, indices, bounds, centroids, start, mid);
    let right = build_recursive(nodes, indices, bounds, centroids, mid, end);

    let node = &mut nodes[node_idx as usize];
    node.left_or_start = left;
    node.right_or_count = right;
    node.is_leaf = false;

    node_idx
}

/// Best `(axis, left_count)` split by binned SAH, or `None` when splitting
/// does not beat a leaf
fn find_best_split(
    indices: &[u32],
    bounds: &[Aabb],
    centroids: &[Point3<f64>],
) -> Option<(usize, usize)> {
    let count = indices.len();

    let centroid_bounds = indices.iter().fold(Aabb::empty(), |mut acc, &i| {
        acc.expand(&centroids[i as usize]);
        acc
    });
    let node_area = indices
        .iter()
        .fold(Aabb::empty(), |acc, &i| acc.union(&bounds[i as usize]))
        .surface_area();

    let leaf_cost = count as f64;
    let mut best: Option<(f64, usize, usize)> = None;

    for axis in 0..3 {
        let lo = centroid_bounds.min[axis];
        let extent = centroid_bounds.max[axis] - lo;
        if extent <= 0.0 {
            continue;
        }

        let mut bins = [Bin {
            count: 0,
            bounds: Aabb::empty(),
        }; SAH_BINS];
        for &i in indices {
            let c = centroids[i as usize][axis];
            let b = (((c - lo) / extent) * SAH_BINS as f64) as usize;
            let bin = &mut bins[b.min(SAH_BINS - 1)];
            bin.count += 1;
            bin.bounds = bin.bounds.union(&bounds[i as usize]);
        }

        // Prefix sweep for the left side
        let mut left_counts = [0usize; SAH_BINS];
        let mut left_areas = [0.0f64; SAH_BINS];
        let mut running = Aabb::empty();
        let mut running_count = 0;
        for b in 0..SAH_BINS {
            running_count += bins[b].count;
            if bins[b].count > 0 {
                running = running.union(&bins[b].bounds);
            }
            left_counts[b] = running_count;
            left_areas[b] = running.surface_area();
        }

        // Suffix sweep for the right side, evaluating each plane
        let mut running = Aabb::empty();
        let mut right_count = 0;
        for b in (1..SAH_BINS).rev() {
            right_count += bins[b].count;
            if bins[b].count > 0 {
                running = running.union(&bins[b].bounds);
            }
            let left_count = left_counts[b - 1];
            if left_count == 0 || right_count == 0 {
                continue;
            }

            let cost = if node_area > 0.0 {
                1.0 + (left_areas[b - 1] * left_count as f64
                    + running.surface_area() * right_count as f64)
                    / node_area
            } else {
                1.0 + count as f64 * 0.5
            };

            if best.map_or(true, |(c, _, _)| cost < c) {
                best = Some((cost, axis, left_count));
            }
        }
    }

    match best {
        Some((cost, axis, split)) if cost < leaf_cost => Some((axis, split)),
        // Too many primitives for one leaf even if SAH prefers it
        Some((_, axis, split)) if count > MAX_LEAF_PRIMITIVES * 4 => Some((axis, split)),
        _ => None,
    }
}
