//! Materials, shader properties and the per-frame parameter binder
//!
//! A [`Material`] is immutable once created. Per-frame uniform values never
//! mutate it; the [`MaterialBinder`] produces a [`BoundMaterial`] that pairs
//! the material with a fresh [`PropertyBlock`], and draw lists carry that
//! block by value. One binder call per pass per frame is therefore the only
//! writer of those values.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Shader property names written by the binder
pub mod property {
    pub const LIGHT_DIR_SS: &str = "_LightDirSS";
    pub const COLOR: &str = "_Color";
    pub const OFFSET: &str = "_Offset";
    pub const STENCIL_REF: &str = "_StencilRef";
    pub const STENCIL_COMP: &str = "_StencilComp";
}

/// Largest screen-space offset the hair shadow shader accepts
pub const MAX_SHADOW_OFFSET: f32 = 0.1;

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const CLEAR: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Stencil/depth comparison function, numbered as the shaders expect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompareFunction {
    Disabled = 0,
    Never = 1,
    Less = 2,
    #[default]
    Equal = 3,
    LessEqual = 4,
    Greater = 5,
    NotEqual = 6,
    GreaterEqual = 7,
    Always = 8,
}

impl CompareFunction {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// A shader-visible material with one or more named sub-passes
#[derive(Debug, PartialEq, Eq)]
pub struct Material {
    name: String,
    passes: Vec<String>,
}

/// Shared reference to a material
pub type MaterialHandle = Arc<Material>;

impl Material {
    pub fn new(name: impl Into<String>, passes: Vec<String>) -> MaterialHandle {
        Arc::new(Self {
            name: name.into(),
            passes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pass_count(&self) -> u32 {
        self.passes.len() as u32
    }
}

/// A single shader property value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Float(f32),
    Int(i32),
    Vector(Vec4),
    Color(Color),
}

/// Named shader property values for one material binding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBlock {
    values: BTreeMap<String, PropertyValue>,
}

impl PropertyBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.values.insert(name.to_string(), PropertyValue::Float(value));
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        self.values.insert(name.to_string(), PropertyValue::Int(value));
    }

    pub fn set_vector(&mut self, name: &str, value: Vec4) {
        self.values.insert(name.to_string(), PropertyValue::Vector(value));
    }

    pub fn set_color(&mut self, name: &str, value: Color) {
        self.values.insert(name.to_string(), PropertyValue::Color(value));
    }

    pub fn get(&self, name: &str) -> Option<PropertyValue> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Uniform values the hair shadow material reads each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    pub color: Color,
    /// Screen-space shadow offset, clamped to `[0, MAX_SHADOW_OFFSET]`
    pub offset: f32,
    pub stencil_ref: u8,
    pub stencil_compare: CompareFunction,
    pub light_dir_screen: Vec2,
}

impl MaterialParams {
    pub fn new(
        color: Color,
        offset: f32,
        stencil_ref: u8,
        stencil_compare: CompareFunction,
        light_dir_screen: Vec2,
    ) -> Self {
        Self {
            color,
            offset: offset.clamp(0.0, MAX_SHADOW_OFFSET),
            stencil_ref,
            stencil_compare,
            light_dir_screen,
        }
    }

    pub fn to_property_block(&self) -> PropertyBlock {
        let mut block = PropertyBlock::new();
        block.set_vector(
            property::LIGHT_DIR_SS,
            Vec4::new(self.light_dir_screen.x, self.light_dir_screen.y, 0.0, 0.0),
        );
        block.set_color(property::COLOR, self.color);
        block.set_float(property::OFFSET, self.offset);
        block.set_int(property::STENCIL_REF, i32::from(self.stencil_ref));
        block.set_int(property::STENCIL_COMP, self.stencil_compare.as_i32());
        block
    }

    pub fn to_uniform(&self) -> MaterialParamsUniform {
        MaterialParamsUniform {
            light_dir_ss: [self.light_dir_screen.x, self.light_dir_screen.y, 0.0, 0.0],
            color: self.color.to_array(),
            offset: self.offset,
            stencil_ref: u32::from(self.stencil_ref),
            stencil_comp: self.stencil_compare as u32,
            _pad: 0,
        }
    }
}

/// GPU-side layout of [`MaterialParams`] (48 bytes, std140 compatible)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialParamsUniform {
    pub light_dir_ss: [f32; 4],
    pub color: [f32; 4],
    pub offset: f32,
    pub stencil_ref: u32,
    pub stencil_comp: u32,
    pub _pad: u32,
}

/// A material paired with the property values bound for this frame
#[derive(Debug, Clone)]
pub struct BoundMaterial {
    material: MaterialHandle,
    properties: Arc<PropertyBlock>,
}

impl BoundMaterial {
    pub fn material(&self) -> &MaterialHandle {
        &self.material
    }

    pub fn properties(&self) -> &Arc<PropertyBlock> {
        &self.properties
    }
}

/// Static part of a pass's material parameters
///
/// Everything except the light direction is fixed when the pass is created;
/// [`MaterialBinder::bind`] fills in the per-frame direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialBinder {
    pub color: Color,
    pub offset: f32,
    pub stencil_ref: u8,
    pub stencil_compare: CompareFunction,
}

impl MaterialBinder {
    pub fn new(color: Color, offset: f32, stencil_ref: u8, stencil_compare: CompareFunction) -> Self {
        Self {
            color,
            offset: offset.clamp(0.0, MAX_SHADOW_OFFSET),
            stencil_ref,
            stencil_compare,
        }
    }

    pub fn params(&self, light_dir_screen: Vec2) -> MaterialParams {
        MaterialParams::new(
            self.color,
            self.offset,
            self.stencil_ref,
            self.stencil_compare,
            light_dir_screen,
        )
    }

    pub fn bind(&self, material: &MaterialHandle, light_dir_screen: Vec2) -> BoundMaterial {
        let properties = self.params(light_dir_screen).to_property_block();
        log::trace!(
            "Bound {} properties to material '{}'",
            properties.len(),
            material.name()
        );
        BoundMaterial {
            material: material.clone(),
            properties: Arc::new(properties),
        }
    }
}

/// Materials addressable by name, used to resolve config assets
#[derive(Debug, Default, Clone)]
pub struct MaterialLibrary {
    materials: HashMap<String, MaterialHandle>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, material: MaterialHandle) {
        self.materials.insert(material.name().to_string(), material);
    }

    pub fn with_material(mut self, material: MaterialHandle) -> Self {
        self.insert(material);
        self
    }

    pub fn get(&self, name: &str) -> Option<MaterialHandle> {
        self.materials.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hair_material() -> MaterialHandle {
        Material::new("HairShadow", vec!["HairShadow".into()])
    }

    #[test]
    fn binder_writes_every_property() {
        let binder = MaterialBinder::new(Color::rgba(0.2, 0.1, 0.1, 1.0), 0.02, 128, CompareFunction::Equal);
        let bound = binder.bind(&hair_material(), Vec2::new(0.6, -0.8));
        let props = bound.properties();

        assert_eq!(props.len(), 5);
        assert_eq!(
            props.get(property::LIGHT_DIR_SS),
            Some(PropertyValue::Vector(Vec4::new(0.6, -0.8, 0.0, 0.0)))
        );
        assert_eq!(props.get(property::OFFSET), Some(PropertyValue::Float(0.02)));
        assert_eq!(props.get(property::STENCIL_REF), Some(PropertyValue::Int(128)));
        assert_eq!(props.get(property::STENCIL_COMP), Some(PropertyValue::Int(3)));
        assert_eq!(bound.material().name(), "HairShadow");
    }

    #[test]
    fn offset_is_clamped() {
        assert_eq!(MaterialBinder::new(Color::BLACK, 0.5, 0, CompareFunction::Always).offset, 0.1);
        assert_eq!(MaterialBinder::new(Color::BLACK, -1.0, 0, CompareFunction::Always).offset, 0.0);
    }

    #[test]
    fn uniform_layout_is_48_bytes() {
        assert_eq!(std::mem::size_of::<MaterialParamsUniform>(), 48);
        let params = MaterialParams::new(Color::WHITE, 0.05, 255, CompareFunction::NotEqual, Vec2::NEG_Y);
        let uniform = params.to_uniform();
        assert_eq!(uniform.stencil_ref, 255);
        assert_eq!(uniform.stencil_comp, 6);
        assert_eq!(bytemuck::bytes_of(&uniform).len(), 48);
    }

    #[test]
    fn library_resolves_by_name() {
        let library = MaterialLibrary::new().with_material(hair_material());
        assert!(library.get("HairShadow").is_some());
        assert!(library.get("Missing").is_none());
    }
}
