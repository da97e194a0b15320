use super::LoadError;
use crate::math::Aabb;
use crate::render::mesh::Vertex;
use glam::{Mat4, Vec3};

/// One triangle primitive, already placed in model space by its node chain.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
    pub transform: Mat4,
}

#[derive(Debug, Clone)]
pub struct ModelData {
    pub meshes: Vec<MeshData>,
    pub bounds: Aabb,
}

impl ModelData {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len() / 3).sum()
    }
}

/// Parses a binary glTF (or self-contained JSON glTF) from memory.
///
/// Only the default scene is walked (the first scene if none is marked
/// default). Non-triangle primitives are skipped; missing normals are
/// generated by averaging face normals. Images are never decoded, so a
/// broken texture does not cost the geometry.
pub fn parse_glb(bytes: &[u8]) -> Result<ModelData, LoadError> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&document, None, blob)?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(LoadError::EmptyScene)?;

    let mut meshes = Vec::new();
    for node in scene.nodes() {
        visit_node(&node, Mat4::IDENTITY, &buffers, &mut meshes);
    }

    if meshes.is_empty() {
        return Err(LoadError::EmptyScene);
    }

    let bounds = meshes.iter().fold(Aabb::EMPTY, |acc, mesh| {
        let mut local = Aabb::EMPTY;
        for v in &mesh.vertices {
            local.extend(Vec3::from(v.position));
        }
        acc.union(&local.transformed(&mesh.transform))
    });

    log::info!(
        "parsed model: {} meshes, {} triangles",
        meshes.len(),
        meshes.iter().map(|m| m.indices.len() / 3).sum::<usize>()
    );

    Ok(ModelData { meshes, bounds })
}

fn visit_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<MeshData>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!("skipping {:?} primitive in mesh {}", primitive.mode(), mesh.index());
                continue;
            }
            if let Some(data) = read_primitive(&primitive, world, buffers) {
                out.push(data);
            }
        }
    }

    for child in node.children() {
        visit_node(&child, world, buffers, out);
    }
}

fn read_primitive(
    primitive: &gltf::Primitive<'_>,
    transform: Mat4,
    buffers: &[gltf::buffer::Data],
) -> Option<MeshData> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    if positions.is_empty() {
        return None;
    }

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    if indices.len() < 3 {
        return None;
    }

    let normals: Vec<[f32; 3]> = match reader.read_normals() {
        Some(normals) => normals.collect(),
        None => generate_normals(&positions, &indices),
    };

    let vertices = positions
        .iter()
        .zip(normals.iter().chain(std::iter::repeat(&[0.0, 1.0, 0.0])))
        .map(|(position, normal)| Vertex {
            position: *position,
            normal: *normal,
        })
        .collect();

    Some(MeshData {
        vertices,
        indices,
        base_color: primitive.material().pbr_metallic_roughness().base_color_factor(),
        transform,
    })
}

fn generate_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accum = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let pa = Vec3::from(positions[a]);
        let face = (Vec3::from(positions[b]) - pa).cross(Vec3::from(positions[c]) - pa);
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }

    accum
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_JSON: &str = r#"{"asset":{"version":"2.0"},"scene":0,"scenes":[{"nodes":[0]}],"nodes":[{"mesh":0,"translation":[0.0,1.0,0.0]}],"meshes":[{"primitives":[{"attributes":{"POSITION":0},"indices":1,"material":0}]}],"materials":[{"pbrMetallicRoughness":{"baseColorFactor":[0.5,0.25,1.0,1.0]}}],"buffers":[{"byteLength":42}],"bufferViews":[{"buffer":0,"byteOffset":0,"byteLength":36},{"buffer":0,"byteOffset":36,"byteLength":6}],"accessors":[{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0.0,0.0,0.0],"max":[1.0,1.0,0.0]},{"bufferView":1,"componentType":5123,"count":3,"type":"SCALAR"}]}"#;

    // Same triangle, plus an embedded PNG whose bytes are not a PNG.
    const BROKEN_IMAGE_JSON: &str = r#"{"asset":{"version":"2.0"},"scene":0,"scenes":[{"nodes":[0]}],"nodes":[{"mesh":0,"translation":[0.0,1.0,0.0]}],"meshes":[{"primitives":[{"attributes":{"POSITION":0},"indices":1,"material":0}]}],"materials":[{"pbrMetallicRoughness":{"baseColorFactor":[0.5,0.25,1.0,1.0]}}],"images":[{"bufferView":2,"mimeType":"image/png"}],"buffers":[{"byteLength":48}],"bufferViews":[{"buffer":0,"byteOffset":0,"byteLength":36},{"buffer":0,"byteOffset":36,"byteLength":6},{"buffer":0,"byteOffset":44,"byteLength":4}],"accessors":[{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0.0,0.0,0.0],"max":[1.0,1.0,0.0]},{"bufferView":1,"componentType":5123,"count":3,"type":"SCALAR"}]}"#;

    fn triangle_bin() -> Vec<u8> {
        let mut bin = Vec::new();
        for p in [[0.0_f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            for c in p {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        for i in [0_u16, 1, 2] {
            bin.extend_from_slice(&i.to_le_bytes());
        }
        bin
    }

    fn glb(json: &str, mut bin_chunk: Vec<u8>) -> Vec<u8> {
        let mut json_chunk = json.as_bytes().to_vec();
        while json_chunk.len() % 4 != 0 {
            json_chunk.push(b' ');
        }
        while bin_chunk.len() % 4 != 0 {
            bin_chunk.push(0);
        }

        let total = 12 + 8 + json_chunk.len() + 8 + bin_chunk.len();
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2_u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"JSON");
        glb.extend_from_slice(&json_chunk);
        glb.extend_from_slice(&(bin_chunk.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"BIN\0");
        glb.extend_from_slice(&bin_chunk);
        glb
    }

    fn triangle_glb() -> Vec<u8> {
        glb(TRIANGLE_JSON, triangle_bin())
    }

    #[test]
    fn parses_single_triangle() {
        let model = parse_glb(&triangle_glb()).unwrap();
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.triangle_count(), 1);

        let mesh = &model.meshes[0];
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.base_color, [0.5, 0.25, 1.0, 1.0]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn bounds_include_node_translation() {
        let model = parse_glb(&triangle_glb()).unwrap();
        assert!(model.bounds.min.abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-6));
        assert!(model.bounds.max.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-6));
    }

    #[test]
    fn undecodable_image_keeps_the_geometry() {
        let mut bin = triangle_bin();
        bin.extend_from_slice(&[0, 0]);
        bin.extend_from_slice(b"JUNK");
        let model = parse_glb(&glb(BROKEN_IMAGE_JSON, bin)).unwrap();

        assert_eq!(model.triangle_count(), 1);
        assert_eq!(model.meshes[0].base_color, [0.5, 0.25, 1.0, 1.0]);
    }

    #[test]
    fn garbage_is_a_gltf_error() {
        let err = parse_glb(b"definitely not a model").unwrap_err();
        assert!(matches!(err, LoadError::Gltf(_)));
    }

    #[test]
    fn generated_normals_are_unit_length() {
        let positions = [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]];
        let normals = generate_normals(&positions, &[0, 1, 2]);
        for n in normals {
            assert!(Vec3::from(n).abs_diff_eq(Vec3::Y, 1e-6));
        }
    }
}
