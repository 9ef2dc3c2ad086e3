use cgmath::{Matrix, Matrix4, SquareMatrix, Vector3};

/// Meshes the renderer uploads once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Sphere,
    Floor,
    Cube,
}

/// Shader technique an object is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technique {
    /// Lit with both point lights, UV checker over the base colour
    Basic,
    /// Flat base colour, no lighting
    Unlit,
}

impl Technique {
    /// Pipeline name registered with the pipeline manager
    pub fn pipeline_name(self) -> &'static str {
        match self {
            Technique::Basic => "BasicShader",
            Technique::Unlit => "Unlit",
        }
    }
}

/// One draw call's worth of scene state.
#[derive(Debug, Clone)]
pub struct DrawObject {
    pub name: String,
    pub mesh: MeshKind,
    pub world: Matrix4<f32>,
    pub color: [f32; 3],
    pub technique: Technique,
    pub visible: bool,
}

impl DrawObject {
    pub fn new(name: &str, mesh: MeshKind, technique: Technique) -> Self {
        Self {
            name: name.to_owned(),
            mesh,
            world: Matrix4::identity(),
            color: [1.0, 1.0, 1.0],
            technique,
            visible: true,
        }
    }

    pub fn with_world(mut self, world: Matrix4<f32>) -> Self {
        self.world = world;
        self
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.world = Matrix4::from_translation(translation);
    }

    /// Inverse-transpose of the world matrix for transforming normals.
    ///
    /// Falls back to the world matrix when it is singular (zero scale).
    pub fn normal_matrix(&self) -> Matrix4<f32> {
        self.world
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or(self.world)
    }
}
