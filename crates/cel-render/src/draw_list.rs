//! Draw list construction
//!
//! A draw list is the cull result narrowed by a [`FilterConfig`] and a set of
//! shader tags, ordered by [`SortingCriteria`]. Building one is a pure
//! function of its inputs and keeps no state between frames.

use crate::camera::CameraData;
use crate::filter::{FilterConfig, SortingCriteria};
use crate::material::{BoundMaterial, MaterialHandle, PropertyBlock};
use crate::scene::{CullResults, ObjectId, Renderable};
use crate::{Error, Result};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::Arc;

/// Width of a front-to-back distance bucket, in world units
///
/// Renderers inside the same bucket are ordered by state instead of depth.
pub const DEPTH_BUCKET_SIZE: f32 = 0.25;

/// Light-mode tag naming a shader sub-pass
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderTagId(Cow<'static, str>);

impl ShaderTagId {
    pub const UNIVERSAL_FORWARD: Self = Self(Cow::Borrowed("UniversalForward"));
    pub const DEPTH_ONLY: Self = Self(Cow::Borrowed("DepthOnly"));
    pub const SRP_DEFAULT_UNLIT: Self = Self(Cow::Borrowed("SRPDefaultUnlit"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Substitute material every selected renderer draws with
#[derive(Debug, Clone)]
pub struct MaterialOverride {
    material: MaterialHandle,
    pass_index: u32,
    properties: Option<Arc<PropertyBlock>>,
}

impl MaterialOverride {
    /// Override with the material's own property values
    pub fn new(material: &MaterialHandle, pass_index: u32) -> Result<Self> {
        Self::check_pass(material, pass_index)?;
        Ok(Self {
            material: material.clone(),
            pass_index,
            properties: None,
        })
    }

    /// Override with the values bound for this frame
    pub fn bound(bound: &BoundMaterial, pass_index: u32) -> Result<Self> {
        Self::check_pass(bound.material(), pass_index)?;
        Ok(Self {
            material: bound.material().clone(),
            pass_index,
            properties: Some(bound.properties().clone()),
        })
    }

    fn check_pass(material: &MaterialHandle, pass_index: u32) -> Result<()> {
        if pass_index >= material.pass_count() {
            return Err(Error::Resource(format!(
                "Material '{}' has {} pass(es), override requested pass {}",
                material.name(),
                material.pass_count(),
                pass_index
            )));
        }
        Ok(())
    }

    pub fn material(&self) -> &MaterialHandle {
        &self.material
    }

    pub fn pass_index(&self) -> u32 {
        self.pass_index
    }

    pub fn properties(&self) -> Option<&Arc<PropertyBlock>> {
        self.properties.as_ref()
    }
}

/// What a pass asks the draw list builder for
#[derive(Debug, Clone)]
pub struct DrawListRequest {
    pub filter: FilterConfig,
    /// Tags in priority order; a renderer draws with the first one it has
    pub shader_tags: Vec<ShaderTagId>,
    pub sort: SortingCriteria,
    pub override_material: Option<MaterialOverride>,
    /// Only renderers with a depth-only sub-pass; commands write depth only
    pub depth_only: bool,
}

impl DrawListRequest {
    pub fn new(filter: FilterConfig, shader_tag: ShaderTagId, sort: SortingCriteria) -> Self {
        Self {
            filter,
            shader_tags: vec![shader_tag],
            sort,
            override_material: None,
            depth_only: false,
        }
    }

    /// Request restricted to renderers that contribute depth
    pub fn depth_only(filter: FilterConfig, sort: SortingCriteria) -> Self {
        Self {
            depth_only: true,
            ..Self::new(filter, ShaderTagId::DEPTH_ONLY, sort)
        }
    }

    pub fn with_shader_tag(mut self, tag: ShaderTagId) -> Self {
        self.shader_tags.push(tag);
        self
    }

    pub fn with_override(mut self, material: MaterialOverride) -> Self {
        self.override_material = Some(material);
        self
    }
}

/// Inputs for one draw list: the cull result, the camera and the request
pub struct DrawListParams<'a> {
    pub cull: &'a CullResults,
    pub camera: &'a CameraData,
    pub request: DrawListRequest,
}

impl<'a> DrawListParams<'a> {
    pub fn new(cull: &'a CullResults, camera: &'a CameraData, request: DrawListRequest) -> Self {
        Self { cull, camera, request }
    }
}

/// One renderer draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCommand {
    pub object: ObjectId,
    /// Material the draw uses: the override if any, else the renderer's own
    pub material: String,
    /// Tag of the sub-shader that matched the request
    pub shader_tag: ShaderTagId,
    /// Override sub-pass index, `None` when drawing with the own material
    pub pass_index: Option<u32>,
    pub depth_only: bool,
}

/// Ordered draws produced by [`build_draw_list`]
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    override_material: Option<MaterialOverride>,
}

impl DrawList {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn override_material(&self) -> Option<&MaterialOverride> {
        self.override_material.as_ref()
    }
}

struct Candidate<'a> {
    renderable: &'a Renderable,
    tag: &'a ShaderTagId,
    distance_sq: f32,
}

fn depth_bucket(distance_sq: f32) -> u32 {
    (distance_sq.sqrt() / DEPTH_BUCKET_SIZE).floor() as u32
}

fn compare_candidates(criteria: SortingCriteria, a: &Candidate, b: &Candidate) -> Ordering {
    let (ra, rb) = (a.renderable, b.renderable);
    let mut ord = Ordering::Equal;

    if criteria.contains(SortingCriteria::SORTING_LAYER) {
        ord = ord.then(ra.sorting_layer.cmp(&rb.sorting_layer));
    }
    if criteria.contains(SortingCriteria::RENDERER_PRIORITY) {
        ord = ord.then(ra.renderer_priority.cmp(&rb.renderer_priority));
    }
    if criteria.contains(SortingCriteria::RENDER_QUEUE) {
        ord = ord.then(ra.render_queue.cmp(&rb.render_queue));
    }
    if criteria.contains(SortingCriteria::BACK_TO_FRONT) {
        ord = ord.then(b.distance_sq.total_cmp(&a.distance_sq));
    } else if criteria.contains(SortingCriteria::QUANTIZED_FRONT_TO_BACK) {
        ord = ord.then(depth_bucket(a.distance_sq).cmp(&depth_bucket(b.distance_sq)));
    }
    if criteria.contains(SortingCriteria::OPTIMIZE_STATE_CHANGES) {
        ord = ord.then_with(|| ra.material.cmp(&rb.material));
    }

    ord.then(ra.id.cmp(&rb.id))
}

/// Select, order and emit draws for one request
///
/// A filter that matches nothing yields an empty list.
pub fn build_draw_list(params: &DrawListParams) -> DrawList {
    let request = &params.request;
    let eye = params.camera.position;

    let mut selected: Vec<Candidate> = params
        .cull
        .visible
        .iter()
        .filter(|r| request.filter.accepts(r.render_queue, r.layer))
        .filter_map(|r| {
            let tag = request.shader_tags.iter().find(|tag| r.has_shader_tag(tag))?;
            Some(Candidate {
                renderable: r,
                tag,
                distance_sq: eye.distance_squared(r.position),
            })
        })
        .collect();

    selected.sort_by(|a, b| compare_candidates(request.sort, a, b));

    let commands = selected
        .iter()
        .map(|c| match &request.override_material {
            Some(ovr) => DrawCommand {
                object: c.renderable.id,
                material: ovr.material().name().to_string(),
                shader_tag: c.tag.clone(),
                pass_index: Some(ovr.pass_index()),
                depth_only: request.depth_only,
            },
            None => DrawCommand {
                object: c.renderable.id,
                material: c.renderable.material.clone(),
                shader_tag: c.tag.clone(),
                pass_index: None,
                depth_only: request.depth_only,
            },
        })
        .collect::<Vec<_>>();

    log::trace!(
        "Draw list: {} of {} visible renderers selected",
        commands.len(),
        params.cull.len()
    );

    DrawList {
        commands,
        override_material: request.override_material.clone(),
    }
}
