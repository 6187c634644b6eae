use bevy::{
    prelude::*,
    render::mesh::{Indices, PrimitiveTopology},
};
use shared::generators::MeshData;

/// Uploads generated mesh data as a bevy mesh.
pub fn build_mesh(data: &MeshData) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, Default::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, data.positions.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, data.uvs.clone());
    mesh.insert_indices(Indices::U32(data.indices.clone()));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::generators::uv_sphere;

    #[test]
    fn test_build_mesh_keeps_buffers() {
        let sphere = uv_sphere(1.0, 8, 6);
        let mesh = build_mesh(&sphere);
        assert_eq!(mesh.count_vertices(), sphere.vertex_count());
        assert_eq!(
            mesh.indices().map(|indices| indices.len()),
            Some(sphere.indices.len())
        );
        assert!(mesh.attribute(Mesh::ATTRIBUTE_UV_0).is_some());
    }
}
