//! Half-space clipping against the water plane, with waterline capping.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use keel_math::{Pose, Vec2, Vec3};

use crate::polygon;
use crate::trimesh::TriMesh;

/// Vertices within this distance of the plane are treated as lying on it.
const PLANE_EPS: f64 = 1e-9;

/// An oriented plane `dot(p, normal) = offset`. The kept half-space of a
/// clip is `dot(p, normal) <= offset`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f64,
}

impl Plane {
    /// Plane from a normal (normalized here) and offset.
    pub fn new(normal: Vec3, offset: f64) -> Self {
        Self {
            normal: normal.normalize(),
            offset,
        }
    }

    /// Horizontal water surface at the given height.
    pub fn horizontal(level: f64) -> Self {
        Self {
            normal: Vec3::z(),
            offset: level,
        }
    }

    /// Signed distance from the plane: negative below, positive above.
    pub fn signed_distance(&self, p: &Vec3) -> f64 {
        self.normal.dot(p) - self.offset
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::horizontal(0.0)
    }
}

/// Outcome of the capping step: the triangles that re-close the cut, or
/// nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CapResult {
    /// Cap triangles, as index triples into the capped mesh's vertices.
    Faces(Vec<[usize; 3]>),
    /// No cap was produced: the body is entirely on one side of the
    /// plane, or the cut boundary is degenerate. Tolerated; waterplane
    /// area is zero.
    Empty,
}

/// A mesh clipped to a half-space and re-closed at the cutting plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CappedMesh {
    pub mesh: TriMesh,
    pub cap: CapResult,
}

/// Submerged volume, approximate centroid, and waterline cross-section
/// area at a pose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SubmergedProperties {
    /// Volume below the plane (m³).
    pub volume: f64,
    /// Vertex mean of the capped submerged mesh (m): the center of
    /// buoyancy under the solver's centroid approximation.
    pub centroid: Vec3,
    /// Area of the waterline cross-section (m²); zero when the cap is
    /// empty.
    pub waterplane_area: f64,
}

/// Seam between the clipping control logic and the geometry backend, so
/// an alternative kernel can be substituted and the solver tested in
/// isolation.
pub trait ClipKernel {
    /// Clip `mesh` to the kept half-space of `plane` and cap the cut
    /// boundary. Must return well-defined output for every input pose,
    /// including fully-kept and fully-discarded meshes.
    fn bisect_and_cap(&self, mesh: &TriMesh, plane: &Plane) -> CappedMesh;
}

/// Default geometry backend: per-triangle half-space clipping with
/// welded cut vertices, boundary-loop reconstruction, and ear-clipped
/// cap polygons.
///
/// Welding matters beyond topology: the centroid downstream is a vertex
/// mean, so each cut edge must contribute exactly one vertex.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HalfSpaceClipper;

impl ClipKernel for HalfSpaceClipper {
    fn bisect_and_cap(&self, mesh: &TriMesh, plane: &Plane) -> CappedMesh {
        let dist: Vec<f64> = mesh
            .vertices
            .iter()
            .map(|v| plane.signed_distance(v))
            .collect();

        let mut clip = ClipBuilder::new(mesh, &dist);
        for face in &mesh.faces {
            clip.push_face(face);
        }

        let ClipBuilder {
            vertices, faces, ..
        } = clip;
        let mut mesh = TriMesh { vertices, faces };

        let cap = match cap_faces(&mesh, plane) {
            Some(faces) if !faces.is_empty() => {
                mesh.faces.extend_from_slice(&faces);
                CapResult::Faces(faces)
            }
            _ => CapResult::Empty,
        };

        CappedMesh { mesh, cap }
    }
}

/// Accumulates the kept side of the mesh with welded vertices: original
/// vertices are reused, and each crossing edge yields a single
/// intersection vertex shared by both adjacent faces.
struct ClipBuilder<'a> {
    source: &'a TriMesh,
    dist: &'a [f64],
    vertices: Vec<Vec3>,
    faces: Vec<[usize; 3]>,
    kept: HashMap<usize, usize>,
    cut: HashMap<(usize, usize), usize>,
}

impl<'a> ClipBuilder<'a> {
    fn new(source: &'a TriMesh, dist: &'a [f64]) -> Self {
        Self {
            source,
            dist,
            vertices: Vec::new(),
            faces: Vec::new(),
            kept: HashMap::new(),
            cut: HashMap::new(),
        }
    }

    fn keep_vertex(&mut self, index: usize) -> usize {
        let vertices = &mut self.vertices;
        let v = self.source.vertices[index];
        *self.kept.entry(index).or_insert_with(|| {
            vertices.push(v);
            vertices.len() - 1
        })
    }

    fn cut_vertex(&mut self, a: usize, b: usize) -> usize {
        let key = (a.min(b), a.max(b));
        let vertices = &mut self.vertices;
        let t = self.dist[a] / (self.dist[a] - self.dist[b]);
        let p = self.source.vertices[a] + (self.source.vertices[b] - self.source.vertices[a]) * t;
        *self.cut.entry(key).or_insert_with(|| {
            vertices.push(p);
            vertices.len() - 1
        })
    }

    /// Clip one triangle against the half-space and fan the kept
    /// polygon (at most a quad) into output faces, preserving winding.
    fn push_face(&mut self, face: &[usize; 3]) {
        let mut poly: Vec<usize> = Vec::with_capacity(4);
        for k in 0..3 {
            let a = face[k];
            let b = face[(k + 1) % 3];
            if self.dist[a] <= PLANE_EPS {
                poly.push(self.keep_vertex(a));
            }
            let crosses = (self.dist[a] > PLANE_EPS && self.dist[b] < -PLANE_EPS)
                || (self.dist[a] < -PLANE_EPS && self.dist[b] > PLANE_EPS);
            if crosses {
                poly.push(self.cut_vertex(a, b));
            }
        }
        poly.dedup();
        if poly.len() > 1 && poly[0] == poly[poly.len() - 1] {
            poly.pop();
        }
        if poly.len() < 3 {
            return;
        }
        for i in 1..poly.len() - 1 {
            self.faces.push([poly[0], poly[i], poly[i + 1]]);
        }
    }
}

/// Triangulate the open boundary of `mesh` into cap faces lying on
/// `plane`, oriented outward (along the plane normal). Returns `None`
/// when the boundary is degenerate, `Some(vec![])` when there is no
/// boundary at all.
fn cap_faces(mesh: &TriMesh, plane: &Plane) -> Option<Vec<[usize; 3]>> {
    let boundary = boundary_edges(&mesh.faces);
    if boundary.is_empty() {
        return Some(Vec::new());
    }
    let loops = boundary_loops(&boundary)?;

    // In-plane orthonormal basis (u, v) with u x v = normal, so
    // counter-clockwise cap triangles face outward.
    let n = plane.normal;
    let seed = if n.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    let u = n.cross(&seed).normalize();
    let v = n.cross(&u);

    let mut faces = Vec::new();
    for ring in &loops {
        let pts: Vec<Vec2> = ring
            .iter()
            .map(|&i| {
                let p = mesh.vertices[i];
                Vec2::new(p.dot(&u), p.dot(&v))
            })
            .collect();
        let tris = polygon::triangulate(&pts)?;
        for t in &tris {
            faces.push([ring[t[0]], ring[t[1]], ring[t[2]]]);
        }
    }
    Some(faces)
}

/// Undirected edges used by exactly one face.
fn boundary_edges(faces: &[[usize; 3]]) -> Vec<(usize, usize)> {
    let mut edge_use: HashMap<(usize, usize), usize> = HashMap::new();
    for f in faces {
        for k in 0..3 {
            let a = f[k];
            let b = f[(k + 1) % 3];
            *edge_use.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }
    let mut edges: Vec<(usize, usize)> = edge_use
        .into_iter()
        .filter(|&(_, count)| count == 1)
        .map(|(edge, _)| edge)
        .collect();
    edges.sort_unstable();
    edges
}

/// Chain boundary edges into closed vertex loops. Returns `None` when
/// the boundary does not decompose into simple loops (a vertex with
/// more or fewer than two boundary edges, an open chain, or a loop
/// shorter than a triangle).
fn boundary_loops(edges: &[(usize, usize)]) -> Option<Vec<Vec<usize>>> {
    let mut adjacent: HashMap<usize, Vec<usize>> = HashMap::new();
    for &(a, b) in edges {
        adjacent.entry(a).or_default().push(b);
        adjacent.entry(b).or_default().push(a);
    }
    if adjacent.values().any(|n| n.len() != 2) {
        return None;
    }

    let mut visited: HashSet<usize> = HashSet::new();
    let mut loops = Vec::new();
    for &(start, _) in edges {
        if visited.contains(&start) {
            continue;
        }
        let mut ring = vec![start];
        visited.insert(start);
        let mut prev = start;
        let mut curr = adjacent[&start][0];
        while curr != start {
            if !visited.insert(curr) {
                return None; // pinched loop
            }
            ring.push(curr);
            let next_pair = &adjacent[&curr];
            let next = if next_pair[0] == prev {
                next_pair[1]
            } else {
                next_pair[0]
            };
            prev = curr;
            curr = next;
        }
        if ring.len() < 3 {
            return None;
        }
        loops.push(ring);
    }
    Some(loops)
}

fn triangle_area(vertices: &[Vec3], f: &[usize; 3]) -> f64 {
    let e1 = vertices[f[1]] - vertices[f[0]];
    let e2 = vertices[f[2]] - vertices[f[0]];
    0.5 * e1.cross(&e2).norm()
}

/// Submerged volume, center of buoyancy, and waterplane area of `mesh`
/// posed by `pose`, below `plane`.
///
/// Operates on a world-transformed working copy; the base mesh is never
/// mutated. Returns well-defined (possibly zero) values for every pose:
/// a fully emerged body reports zero volume, and a fully submerged or
/// degenerate-boundary body reports zero waterplane area.
pub fn submerged_properties(
    mesh: &TriMesh,
    pose: &Pose,
    plane: &Plane,
    kernel: &dyn ClipKernel,
) -> SubmergedProperties {
    let world = mesh.transformed(pose);
    let capped = kernel.bisect_and_cap(&world, plane);
    let waterplane_area = match &capped.cap {
        CapResult::Faces(faces) => faces
            .iter()
            .map(|f| triangle_area(&capped.mesh.vertices, f))
            .sum(),
        CapResult::Empty => 0.0,
    };
    SubmergedProperties {
        volume: capped.mesh.volume(),
        centroid: capped.mesh.vertex_mean(),
        waterplane_area,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_math::Quat;

    const EPS: f64 = 1e-9;

    fn submerged(mesh: &TriMesh, pose: &Pose) -> SubmergedProperties {
        submerged_properties(mesh, pose, &Plane::default(), &HalfSpaceClipper)
    }

    #[test]
    fn test_half_submerged_cube() {
        let cube = TriMesh::cuboid(1.0, 1.0, 1.0);
        let sub = submerged(&cube, &Pose::identity());

        assert!((sub.volume - 4.0).abs() < EPS, "volume {}", sub.volume);
        assert!(
            (sub.waterplane_area - 4.0).abs() < EPS,
            "wpa {}",
            sub.waterplane_area
        );
        // 4 kept corners at z = -1 plus 8 cut vertices at z = 0 (the cut
        // also crosses each side face's triangulation diagonal).
        assert!(
            (sub.centroid.z + 1.0 / 3.0).abs() < EPS,
            "centroid.z {}",
            sub.centroid.z
        );
        assert!(sub.centroid.x.abs() < EPS && sub.centroid.y.abs() < EPS);
    }

    #[test]
    fn test_fully_submerged_keeps_volume_zero_wpa() {
        let cube = TriMesh::cuboid(1.0, 1.0, 1.0);
        let pose = Pose::from_position(Vec3::new(0.0, 0.0, -5.0));
        let sub = submerged(&cube, &pose);

        assert!((sub.volume - cube.volume()).abs() < EPS, "volume {}", sub.volume);
        assert_eq!(sub.waterplane_area, 0.0);
        assert!((sub.centroid.z + 5.0).abs() < EPS);
    }

    #[test]
    fn test_fully_emerged_is_all_zero() {
        let cube = TriMesh::cuboid(1.0, 1.0, 1.0);
        let pose = Pose::from_position(Vec3::new(0.0, 0.0, 5.0));
        let sub = submerged(&cube, &pose);

        assert_eq!(sub.volume, 0.0);
        assert_eq!(sub.waterplane_area, 0.0);
        assert_eq!(sub.centroid, Vec3::zeros());
    }

    #[test]
    fn test_tilted_cube_waterplane() {
        // Cube rotated 45 degrees about X: the waterline cross-section
        // is a 2 x 2*sqrt(2) rectangle, and the cut boundary picks up
        // collinear vertices where it crosses face diagonals.
        let cube = TriMesh::cuboid(1.0, 1.0, 1.0);
        let pose = Pose {
            orientation: Quat::from_axis_angle(&Vec3::x(), std::f64::consts::FRAC_PI_4),
            ..Pose::identity()
        };
        let sub = submerged(&cube, &pose);

        assert!((sub.volume - 4.0).abs() < EPS, "volume {}", sub.volume);
        let expected = 2.0 * 2.0 * std::f64::consts::SQRT_2;
        assert!(
            (sub.waterplane_area - expected).abs() < EPS,
            "wpa {} expected {}",
            sub.waterplane_area,
            expected
        );
    }

    #[test]
    fn test_raised_water_level() {
        let cube = TriMesh::cuboid(1.0, 1.0, 1.0);
        let sub = submerged_properties(
            &cube,
            &Pose::identity(),
            &Plane::horizontal(0.5),
            &HalfSpaceClipper,
        );
        assert!((sub.volume - 6.0).abs() < EPS, "volume {}", sub.volume);
        assert!((sub.waterplane_area - 4.0).abs() < EPS);
    }

    #[test]
    fn test_concave_waterline_section() {
        // L-shaped prism standing along Z, cut mid-height: the cap is a
        // concave hexagon of area 3.
        let section = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let prism = TriMesh::prism(&section, 1.0).expect("valid section");
        let sub = submerged(&prism, &Pose::identity());

        assert!((sub.volume - 1.5).abs() < EPS, "volume {}", sub.volume);
        assert!(
            (sub.waterplane_area - 3.0).abs() < EPS,
            "wpa {}",
            sub.waterplane_area
        );
    }

    #[test]
    fn test_base_mesh_not_mutated() {
        let cube = TriMesh::cuboid(1.0, 1.0, 1.0);
        let faces_before = cube.faces.clone();
        let _ = submerged(&cube, &Pose::identity());
        assert_eq!(cube.faces, faces_before);
        assert_eq!(cube.vertices.len(), 8);
    }

    #[test]
    fn test_cap_faces_reported() {
        let cube = TriMesh::cuboid(1.0, 1.0, 1.0);
        let capped = HalfSpaceClipper.bisect_and_cap(&cube, &Plane::default());
        match capped.cap {
            CapResult::Faces(ref faces) => {
                // Octagonal waterline loop: 8 vertices, 6 cap triangles.
                assert_eq!(faces.len(), 6);
            }
            CapResult::Empty => panic!("expected cap faces for a half-submerged cube"),
        }
    }
}
