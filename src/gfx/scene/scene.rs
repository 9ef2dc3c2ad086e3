use cgmath::{Matrix4, Vector3};

use crate::gfx::camera::camera_utils::CameraManager;

use super::{
    lights::{orbiting_lights, PointLight},
    object::{DrawObject, MeshKind, Technique},
};

pub const LAVA_COLOR: [f32; 3] = [0.95, 0.35, 0.08];
pub const WATER_COLOR: [f32; 3] = [0.15, 0.45, 0.9];
pub const ROCK_COLOR: [f32; 3] = [0.5, 0.48, 0.45];
pub const FLOOR_COLOR: [f32; 3] = [0.85, 0.85, 0.8];

const LIGHT_ONE_MARKER: &str = "light_one";
const LIGHT_TWO_MARKER: &str = "light_two";

/// Main scene containing the draw list, lights and camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<DrawObject>,
    pub lights: [PointLight; 2],
    lighting_enabled: bool,
}

impl Scene {
    /// Creates an empty scene with the given camera manager
    pub fn new(camera_manager: CameraManager, lighting_enabled: bool) -> Self {
        Self {
            camera_manager,
            objects: Vec::new(),
            lights: orbiting_lights(0.0),
            lighting_enabled,
        }
    }

    /// Three spheres in a row above a large floor, plus light markers when lighting is on.
    pub fn demo(camera_manager: CameraManager, lighting_enabled: bool) -> Self {
        let mut scene = Self::new(camera_manager, lighting_enabled);

        scene.add_object(
            DrawObject::new("lava_sphere", MeshKind::Sphere, Technique::Basic).with_color(LAVA_COLOR),
        );
        scene.add_object(
            DrawObject::new("water_sphere", MeshKind::Sphere, Technique::Basic)
                .with_world(Matrix4::from_translation(Vector3::new(-40.0, 0.0, 0.0)))
                .with_color(WATER_COLOR),
        );
        scene.add_object(
            DrawObject::new("rock_sphere", MeshKind::Sphere, Technique::Basic)
                .with_world(Matrix4::from_translation(Vector3::new(40.0, 0.0, 0.0)))
                .with_color(ROCK_COLOR),
        );
        scene.add_object(
            DrawObject::new("floor", MeshKind::Floor, Technique::Basic)
                .with_world(
                    Matrix4::from_translation(Vector3::new(0.0, -10.0, 0.0))
                        * Matrix4::from_scale(50.0),
                )
                .with_color(FLOOR_COLOR),
        );

        if lighting_enabled {
            let [one, two] = scene.lights;
            scene.add_object(
                DrawObject::new(LIGHT_ONE_MARKER, MeshKind::Cube, Technique::Unlit)
                    .with_world(Matrix4::from_translation(one.position))
                    .with_color(one.color),
            );
            scene.add_object(
                DrawObject::new(LIGHT_TWO_MARKER, MeshKind::Cube, Technique::Unlit)
                    .with_world(Matrix4::from_translation(two.position))
                    .with_color(two.color),
            );
        }

        scene
    }

    pub fn add_object(&mut self, object: DrawObject) {
        self.objects.push(object);
    }

    pub fn get_object(&self, name: &str) -> Option<&DrawObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    pub fn lighting_enabled(&self) -> bool {
        self.lighting_enabled
    }

    /// Advances the lights to `total_seconds` and moves their markers along.
    pub fn update(&mut self, total_seconds: f32) {
        if !self.lighting_enabled {
            return;
        }

        self.lights = orbiting_lights(total_seconds);
        let [one, two] = self.lights;
        for object in self.objects.iter_mut() {
            match object.name.as_str() {
                LIGHT_ONE_MARKER => object.set_translation(one.position),
                LIGHT_TWO_MARKER => object.set_translation(two.position),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Vector4};

    fn camera() -> CameraManager {
        CameraManager::at_position(1.0, Point3::new(0.0, 5.0, 20.0))
    }

    fn translation(object: &DrawObject) -> Vector3<f32> {
        (object.world * Vector4::new(0.0, 0.0, 0.0, 1.0)).truncate()
    }

    #[test]
    fn test_demo_layout() {
        let scene = Scene::demo(camera(), true);
        assert_eq!(scene.objects.len(), 6);

        let spheres: Vec<_> = scene
            .objects
            .iter()
            .filter(|o| o.mesh == MeshKind::Sphere)
            .collect();
        assert_eq!(spheres.len(), 3);

        let water = scene.get_object("water_sphere").unwrap();
        assert_eq!(translation(water), Vector3::new(-40.0, 0.0, 0.0));
        let rock = scene.get_object("rock_sphere").unwrap();
        assert_eq!(translation(rock), Vector3::new(40.0, 0.0, 0.0));
    }

    #[test]
    fn test_floor_is_scaled_then_lowered() {
        let scene = Scene::demo(camera(), true);
        let floor = scene.get_object("floor").unwrap();
        let corner = floor.world * Vector4::new(1.0, 0.0, 1.0, 1.0);
        assert_eq!(corner, Vector4::new(50.0, -10.0, 50.0, 1.0));
    }

    #[test]
    fn test_light_markers_follow_lights() {
        let mut scene = Scene::demo(camera(), true);
        scene.update(1.25);
        let [one, two] = orbiting_lights(1.25);

        let marker_one = scene.get_object(LIGHT_ONE_MARKER).unwrap();
        let marker_two = scene.get_object(LIGHT_TWO_MARKER).unwrap();
        assert_eq!(translation(marker_one), one.position);
        assert_eq!(translation(marker_two), two.position);
        assert_eq!(marker_one.technique, Technique::Unlit);
    }

    #[test]
    fn test_lighting_disabled_has_no_markers_and_static_lights() {
        let mut scene = Scene::demo(camera(), false);
        assert_eq!(scene.objects.len(), 4);
        assert!(scene.get_object(LIGHT_ONE_MARKER).is_none());

        let before = scene.lights;
        scene.update(3.0);
        assert_eq!(scene.lights, before);
        assert!(!scene.lighting_enabled());
    }
}
