//! Per-frame render graph with automatic dependency resolution
//!
//! Passes declare the textures and draw lists they use through a
//! [`RasterPassBuilder`]. Compiling derives read/write hazards between them,
//! culls passes whose output nothing observes and fixes the execution order.
//! Executing runs each pass's render function once and records the result
//! into a [`CommandBuffer`].

mod builder;
mod command;
mod pass;
mod resource;

pub use builder::RasterPassBuilder;
pub use command::{ColorTarget, Command, CommandBuffer, DepthTarget, LoadOp};
pub use pass::{RasterContext, RenderFunc};
pub use resource::{
    AccessFlags, DrawListHandle, PassId, ResourceData, ResourceHandle, TextureDesc, TextureFormat,
};

use crate::draw_list::{build_draw_list, DrawList, DrawListParams};
use crate::scene::FrameTargets;
use crate::{Error, Result};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColorAttachment {
    index: u32,
    texture: ResourceHandle,
    access: AccessFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DepthAttachment {
    texture: ResourceHandle,
    access: AccessFlags,
}

struct PassNode {
    name: String,
    color: Vec<ColorAttachment>,
    depth: Option<DepthAttachment>,
    reads: Vec<ResourceHandle>,
    writes: Vec<ResourceHandle>,
    draw_lists: Vec<DrawListHandle>,
    publishes: Vec<(String, ResourceHandle)>,
    render_func: Option<RenderFunc>,
}

impl PassNode {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            color: Vec::new(),
            depth: None,
            reads: Vec::new(),
            writes: Vec::new(),
            draw_lists: Vec::new(),
            publishes: Vec::new(),
            render_func: None,
        }
    }

    fn track(&mut self, texture: ResourceHandle, access: AccessFlags) {
        if access.contains(AccessFlags::READ) && !self.reads.contains(&texture) {
            self.reads.push(texture);
        }
        if access.contains(AccessFlags::WRITE) && !self.writes.contains(&texture) {
            self.writes.push(texture);
        }
    }
}

struct TextureEntry {
    desc: TextureDesc,
    imported: bool,
}

/// Dependency between two passes touching the same texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hazard {
    ReadAfterWrite,
    WriteAfterWrite,
    WriteAfterRead,
}

/// Render graph for one frame
pub struct RenderGraph {
    passes: Vec<PassNode>,
    textures: Vec<TextureEntry>,
    draw_lists: Vec<DrawList>,
    resource_data: ResourceData,
    globals: HashMap<String, ResourceHandle>,
    execution_order: Vec<usize>,
    culled: Vec<bool>,
    lifetimes: HashMap<ResourceHandle, (usize, usize)>,
    compiled: bool,
}

impl RenderGraph {
    /// Start a graph drawing into the camera's colour and depth targets
    pub fn new(targets: &FrameTargets) -> Self {
        let mut graph = Self {
            passes: Vec::new(),
            textures: Vec::new(),
            draw_lists: Vec::new(),
            resource_data: ResourceData {
                active_color: ResourceHandle(0),
                active_depth: ResourceHandle(0),
            },
            globals: HashMap::new(),
            execution_order: Vec::new(),
            culled: Vec::new(),
            lifetimes: HashMap::new(),
            compiled: false,
        };
        graph.resource_data = ResourceData {
            active_color: graph.import_texture(targets.color.clone()),
            active_depth: graph.import_texture(targets.depth.clone()),
        };
        graph
    }

    pub fn resource_data(&self) -> ResourceData {
        self.resource_data
    }

    /// Register an externally owned texture; its contents outlive the frame
    pub fn import_texture(&mut self, desc: TextureDesc) -> ResourceHandle {
        self.push_texture(desc, true)
    }

    /// Register a transient texture that lives only while passes use it
    pub fn create_texture(&mut self, desc: TextureDesc) -> ResourceHandle {
        self.push_texture(desc, false)
    }

    fn push_texture(&mut self, desc: TextureDesc, imported: bool) -> ResourceHandle {
        let handle = ResourceHandle(self.textures.len() as u64);
        log::trace!(
            "{} texture '{}' ({}x{} {:?}) as {:?}",
            if imported { "Importing" } else { "Creating" },
            desc.name,
            desc.width,
            desc.height,
            desc.format,
            handle
        );
        self.textures.push(TextureEntry { desc, imported });
        handle
    }

    pub fn texture_desc(&self, texture: ResourceHandle) -> Result<&TextureDesc> {
        self.texture(texture).map(|entry| &entry.desc)
    }

    fn texture(&self, texture: ResourceHandle) -> Result<&TextureEntry> {
        usize::try_from(texture.0)
            .ok()
            .and_then(|i| self.textures.get(i))
            .ok_or_else(|| Error::Resource(format!("Unknown texture {:?}", texture)))
    }

    pub fn is_imported(&self, texture: ResourceHandle) -> bool {
        self.texture(texture).map(|entry| entry.imported).unwrap_or(false)
    }

    pub fn create_draw_list(&mut self, params: &DrawListParams) -> DrawListHandle {
        let handle = DrawListHandle(self.draw_lists.len());
        self.draw_lists.push(build_draw_list(params));
        handle
    }

    pub fn draw_list(&self, handle: DrawListHandle) -> Option<&DrawList> {
        self.draw_lists.get(handle.0)
    }

    /// Texture published under `name`, available once the graph is compiled
    pub fn global_texture(&self, name: &str) -> Option<ResourceHandle> {
        self.globals.get(name).copied()
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Declare a raster pass
    ///
    /// `setup` runs immediately; a declaration error aborts the pass. Textures
    /// and draw lists it created stay unused and cost nothing.
    pub fn add_raster_pass<F>(&mut self, name: &str, setup: F) -> Result<PassId>
    where
        F: FnOnce(&mut RasterPassBuilder<'_>) -> Result<()>,
    {
        if self.compiled {
            return Err(Error::Graph(format!(
                "Cannot add pass '{}' to a compiled graph",
                name
            )));
        }

        let mut builder = RasterPassBuilder::new(self, name);
        setup(&mut builder)?;
        let node = builder.finish()?;

        let id = PassId(self.passes.len());
        log::trace!(
            "Added pass '{}' ({} reads, {} writes, {} draw lists)",
            node.name,
            node.reads.len(),
            node.writes.len(),
            node.draw_lists.len()
        );
        self.passes.push(node);
        Ok(id)
    }

    /// Resolve dependencies, cull unobserved passes and fix the execution order
    pub fn compile(&mut self) -> Result<()> {
        if self.compiled {
            return Ok(());
        }
        log::debug!("Compiling render graph with {} passes", self.passes.len());

        let dag = self.build_dependencies();
        if is_cyclic_directed(&dag) {
            return Err(Error::Graph("Cyclic dependency detected in render graph".to_string()));
        }

        self.culled = self.cull(&dag);
        self.execution_order = self.topological_order(&dag);

        for (i, &pass_idx) in self.execution_order.iter().enumerate() {
            log::debug!("  Pass {}: {}", i, self.passes[pass_idx].name);
        }

        self.check_initialized()?;
        self.compute_resource_lifetimes();
        self.collect_globals();

        self.compiled = true;
        Ok(())
    }

    /// Hazard edges between passes, in declaration order
    fn build_dependencies(&self) -> DiGraph<usize, Hazard> {
        let mut dag = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..self.passes.len()).map(|i| dag.add_node(i)).collect();

        let mut last_writer: HashMap<ResourceHandle, usize> = HashMap::new();
        let mut readers: HashMap<ResourceHandle, Vec<usize>> = HashMap::new();

        for (i, pass) in self.passes.iter().enumerate() {
            for &texture in &pass.reads {
                if let Some(&writer) = last_writer.get(&texture) {
                    if writer != i {
                        dag.update_edge(nodes[writer], nodes[i], Hazard::ReadAfterWrite);
                    }
                }
            }
            for &texture in &pass.writes {
                if let Some(&writer) = last_writer.get(&texture) {
                    if writer != i {
                        dag.update_edge(nodes[writer], nodes[i], Hazard::WriteAfterWrite);
                    }
                }
                for &reader in readers.get(&texture).into_iter().flatten() {
                    if reader != i && dag.find_edge(nodes[reader], nodes[i]).is_none() {
                        dag.add_edge(nodes[reader], nodes[i], Hazard::WriteAfterRead);
                    }
                }
            }

            for &texture in &pass.writes {
                last_writer.insert(texture, i);
                readers.remove(&texture);
            }
            for &texture in &pass.reads {
                readers.entry(texture).or_default().push(i);
            }
        }

        dag
    }

    /// Mark passes whose output never reaches an imported texture or a global
    fn cull(&self, dag: &DiGraph<usize, Hazard>) -> Vec<bool> {
        let mut keep: Vec<bool> = self
            .passes
            .iter()
            .map(|pass| {
                !pass.publishes.is_empty() || pass.writes.iter().any(|&t| self.is_imported(t))
            })
            .collect();

        // Edges always point forward, so one reverse sweep reaches every producer.
        for i in (0..self.passes.len()).rev() {
            if !keep[i] {
                continue;
            }
            for edge in dag.edges_directed(NodeIndex::new(i), Direction::Incoming) {
                if matches!(edge.weight(), Hazard::ReadAfterWrite | Hazard::WriteAfterWrite) {
                    keep[dag[edge.source()]] = true;
                }
            }
        }

        for (pass, kept) in self.passes.iter().zip(&keep) {
            if !kept {
                log::debug!("Culling pass '{}': no observable output", pass.name);
            }
        }

        keep.into_iter().map(|kept| !kept).collect()
    }

    /// Kahn's algorithm, lowest declaration index first among ready passes
    fn topological_order(&self, dag: &DiGraph<usize, Hazard>) -> Vec<usize> {
        let mut in_degree: Vec<usize> = dag
            .node_indices()
            .map(|n| dag.edges_directed(n, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<usize>> = (0..in_degree.len())
            .filter(|&i| in_degree[i] == 0)
            .map(Reverse)
            .collect();

        let mut order = Vec::with_capacity(self.passes.len());
        while let Some(Reverse(i)) = ready.pop() {
            if !self.culled[i] {
                order.push(i);
            }
            for edge in dag.edges_directed(NodeIndex::new(i), Direction::Outgoing) {
                let target = dag[edge.target()];
                in_degree[target] -= 1;
                if in_degree[target] == 0 {
                    ready.push(Reverse(target));
                }
            }
        }
        order
    }

    /// A transient texture must be written or cleared before it is read
    fn check_initialized(&self) -> Result<()> {
        let mut seen: HashSet<ResourceHandle> = HashSet::new();
        for &pass_idx in &self.execution_order {
            let pass = &self.passes[pass_idx];
            for &texture in &pass.reads {
                if seen.contains(&texture) {
                    continue;
                }
                let entry = self.texture(texture)?;
                if !entry.imported && entry.desc.clear.is_none() {
                    return Err(Error::Graph(format!(
                        "Pass '{}' reads transient texture '{}' before anything writes it",
                        pass.name, entry.desc.name
                    )));
                }
            }
            seen.extend(pass.reads.iter().chain(&pass.writes).copied());
        }
        Ok(())
    }

    fn compute_resource_lifetimes(&mut self) {
        let mut usage: HashMap<ResourceHandle, (usize, usize)> = HashMap::new();

        for (exec_idx, &pass_idx) in self.execution_order.iter().enumerate() {
            let pass = &self.passes[pass_idx];
            for &texture in pass.reads.iter().chain(&pass.writes) {
                usage
                    .entry(texture)
                    .and_modify(|(first, last)| {
                        *first = (*first).min(exec_idx);
                        *last = (*last).max(exec_idx);
                    })
                    .or_insert((exec_idx, exec_idx));
            }
        }

        self.lifetimes = usage
            .into_iter()
            .filter(|(texture, _)| !self.is_imported(*texture))
            .collect();
    }

    fn collect_globals(&mut self) {
        self.globals.clear();
        for &pass_idx in &self.execution_order {
            let pass = &self.passes[pass_idx];
            for (name, texture) in &pass.publishes {
                if let Some(previous) = self.globals.insert(name.clone(), *texture) {
                    log::warn!(
                        "Global texture '{}' published more than once this frame ({:?} replaced by {:?} from '{}')",
                        name,
                        previous,
                        texture,
                        pass.name
                    );
                }
            }
        }
    }

    /// Names of the passes that will execute, in order
    pub fn execution_order(&self) -> Vec<&str> {
        self.execution_order
            .iter()
            .map(|&i| self.passes[i].name.as_str())
            .collect()
    }

    pub fn is_culled(&self, pass: PassId) -> bool {
        self.culled.get(pass.0).copied().unwrap_or(false)
    }

    /// First and last execution slot using a transient texture
    pub fn texture_lifetime(&self, texture: ResourceHandle) -> Option<(usize, usize)> {
        self.lifetimes.get(&texture).copied()
    }

    fn load_op(&self, texture: ResourceHandle, access: AccessFlags, first_use: bool) -> Result<LoadOp> {
        let entry = self.texture(texture)?;
        if first_use && !entry.imported {
            return Ok(entry.desc.clear.map_or(LoadOp::DontCare, LoadOp::Clear));
        }
        if access.contains(AccessFlags::DISCARD) {
            return Ok(LoadOp::DontCare);
        }
        Ok(LoadOp::Load)
    }

    /// Run every surviving pass once and return the recorded commands
    pub fn execute(mut self) -> Result<CommandBuffer> {
        self.compile()?;
        log::trace!("Executing render graph ({} passes)", self.execution_order.len());

        let mut cmd = CommandBuffer::new();
        let mut touched: HashSet<ResourceHandle> = HashSet::new();
        let execution_order = self.execution_order.clone();

        for (exec_idx, &pass_idx) in execution_order.iter().enumerate() {
            for (texture, &(first, _)) in &self.lifetimes {
                if first == exec_idx {
                    log::trace!("    Allocating transient texture {:?}", texture);
                }
            }

            let func = self.passes[pass_idx].render_func.take().ok_or_else(|| {
                Error::Graph(format!(
                    "Pass '{}' has already executed",
                    self.passes[pass_idx].name
                ))
            })?;
            let pass = &self.passes[pass_idx];
            log::trace!("  Executing pass: {}", pass.name);

            let color = pass
                .color
                .iter()
                .map(|a| {
                    Ok(ColorTarget {
                        index: a.index,
                        texture: a.texture,
                        access: a.access,
                        load: self.load_op(a.texture, a.access, !touched.contains(&a.texture))?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let depth = pass
                .depth
                .map(|a| {
                    Ok::<_, Error>(DepthTarget {
                        texture: a.texture,
                        access: a.access,
                        load: self.load_op(a.texture, a.access, !touched.contains(&a.texture))?,
                    })
                })
                .transpose()?;
            touched.extend(pass.reads.iter().chain(&pass.writes).copied());

            cmd.push(Command::BeginRasterPass {
                name: pass.name.clone(),
                color,
                depth,
            });
            {
                let mut ctx = RasterContext::new(&pass.name, &mut cmd, &self.draw_lists, &pass.draw_lists);
                func(&mut ctx)?;
            }
            for (name, texture) in &pass.publishes {
                cmd.push(Command::SetGlobalTexture {
                    name: name.clone(),
                    texture: *texture,
                });
            }
            cmd.push(Command::EndRasterPass);

            for (texture, &(_, last)) in &self.lifetimes {
                if last == exec_idx {
                    log::trace!("    Releasing transient texture {:?}", texture);
                }
            }
        }

        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Color;
    use rstest::rstest;

    fn targets() -> FrameTargets {
        FrameTargets::new(640, 480)
    }

    fn noop(_: &mut RasterContext<'_>) -> Result<()> {
        Ok(())
    }

    #[test]
    fn passes_keep_declaration_order() {
        let mut graph = RenderGraph::new(&targets());
        let data = graph.resource_data();
        for name in ["first", "second", "third"] {
            graph
                .add_raster_pass(name, |pass| {
                    pass.set_color_attachment(data.active_color, 0, AccessFlags::WRITE)?;
                    pass.set_render_func(noop);
                    Ok(())
                })
                .unwrap();
        }
        graph.compile().unwrap();
        assert_eq!(graph.execution_order(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unobserved_transient_writer_is_culled() {
        let mut graph = RenderGraph::new(&targets());
        let data = graph.resource_data();
        let scratch = graph.create_texture(TextureDesc::new("scratch", 64, 64, TextureFormat::Rgba8Unorm));

        let dead = graph
            .add_raster_pass("dead", |pass| {
                pass.set_color_attachment(scratch, 0, AccessFlags::WRITE)?;
                pass.set_render_func(noop);
                Ok(())
            })
            .unwrap();
        graph
            .add_raster_pass("live", |pass| {
                pass.set_color_attachment(data.active_color, 0, AccessFlags::WRITE)?;
                pass.set_render_func(noop);
                Ok(())
            })
            .unwrap();

        graph.compile().unwrap();
        assert!(graph.is_culled(dead));
        assert_eq!(graph.execution_order(), vec!["live"]);
    }

    #[test]
    fn producer_of_a_consumed_texture_survives() {
        let mut graph = RenderGraph::new(&targets());
        let data = graph.resource_data();
        let mask = graph.create_texture(TextureDesc::new("mask", 64, 64, TextureFormat::Rgba8Unorm));

        graph
            .add_raster_pass("produce", |pass| {
                pass.set_color_attachment(mask, 0, AccessFlags::WRITE_ALL)?;
                pass.set_render_func(noop);
                Ok(())
            })
            .unwrap();
        graph
            .add_raster_pass("consume", |pass| {
                pass.use_texture(mask, AccessFlags::READ)?;
                pass.set_color_attachment(data.active_color, 0, AccessFlags::WRITE)?;
                pass.set_render_func(noop);
                Ok(())
            })
            .unwrap();

        graph.compile().unwrap();
        assert_eq!(graph.execution_order(), vec!["produce", "consume"]);
        assert_eq!(graph.texture_lifetime(mask), Some((0, 1)));
        assert_eq!(graph.texture_lifetime(data.active_color), None);
    }

    #[test]
    fn reading_uninitialized_transient_fails() {
        let mut graph = RenderGraph::new(&targets());
        let data = graph.resource_data();
        let garbage = graph.create_texture(TextureDesc::new("garbage", 64, 64, TextureFormat::Rgba8Unorm));
        graph
            .add_raster_pass("reader", |pass| {
                pass.use_texture(garbage, AccessFlags::READ)?;
                pass.set_color_attachment(data.active_color, 0, AccessFlags::WRITE)?;
                pass.set_render_func(noop);
                Ok(())
            })
            .unwrap();
        assert!(matches!(graph.compile(), Err(Error::Graph(_))));
    }

    #[rstest]
    #[case::colour_write(false, AccessFlags::WRITE, true)]
    #[case::colour_read_write(false, AccessFlags::READ_WRITE, true)]
    #[case::colour_write_all(false, AccessFlags::WRITE_ALL, true)]
    #[case::colour_read_only(false, AccessFlags::READ, false)]
    #[case::colour_no_access(false, AccessFlags::empty(), false)]
    #[case::depth_read(true, AccessFlags::READ, true)]
    #[case::depth_write(true, AccessFlags::WRITE, true)]
    #[case::depth_read_write(true, AccessFlags::READ_WRITE, true)]
    #[case::depth_discard_only(true, AccessFlags::DISCARD, false)]
    #[case::depth_no_access(true, AccessFlags::empty(), false)]
    fn attachment_access(#[case] depth: bool, #[case] access: AccessFlags, #[case] accepted: bool) {
        let mut graph = RenderGraph::new(&targets());
        let data = graph.resource_data();
        let result = graph.add_raster_pass("pass", |pass| {
            if depth {
                pass.set_color_attachment(data.active_color, 0, AccessFlags::WRITE)?;
                pass.set_depth_attachment(data.active_depth, access)?;
            } else {
                pass.set_color_attachment(data.active_color, 0, access)?;
            }
            pass.set_render_func(noop);
            Ok(())
        });
        assert_eq!(result.is_ok(), accepted, "{:?}", access);
        assert_eq!(graph.pass_count(), usize::from(accepted));
    }

    #[test]
    fn attachment_format_and_completeness() {
        let mut graph = RenderGraph::new(&targets());
        let data = graph.resource_data();

        let depth_as_color = graph.add_raster_pass("bad", |pass| {
            pass.set_color_attachment(data.active_depth, 0, AccessFlags::WRITE)?;
            pass.set_render_func(noop);
            Ok(())
        });
        assert!(matches!(depth_as_color, Err(Error::Graph(_))));

        let color_as_depth = graph.add_raster_pass("bad", |pass| {
            pass.set_depth_attachment(data.active_color, AccessFlags::READ)?;
            pass.set_render_func(noop);
            Ok(())
        });
        assert!(matches!(color_as_depth, Err(Error::Graph(_))));

        let duplicate_index = graph.add_raster_pass("bad", |pass| {
            pass.set_color_attachment(data.active_color, 0, AccessFlags::WRITE)?;
            pass.set_color_attachment(data.active_color, 0, AccessFlags::WRITE)?;
            pass.set_render_func(noop);
            Ok(())
        });
        assert!(matches!(duplicate_index, Err(Error::Graph(_))));

        let no_func = graph.add_raster_pass("bad", |pass| {
            pass.set_color_attachment(data.active_color, 0, AccessFlags::WRITE)
        });
        assert!(no_func.is_err());
        assert_eq!(graph.pass_count(), 0);
    }

    #[test]
    fn publishing_requires_global_state_permission() {
        let mut graph = RenderGraph::new(&targets());
        let data = graph.resource_data();
        let result = graph.add_raster_pass("publisher", |pass| {
            pass.set_color_attachment(data.active_color, 0, AccessFlags::WRITE)?;
            pass.publish_global_texture(data.active_color, "_Scene")?;
            pass.set_render_func(noop);
            Ok(())
        });
        assert!(matches!(result, Err(Error::Graph(_))));
    }

    #[test]
    fn duplicate_global_last_publisher_wins() {
        let mut graph = RenderGraph::new(&targets());
        let data = graph.resource_data();
        let mut handles = Vec::new();
        for name in ["a", "b"] {
            let texture = graph.create_texture(
                TextureDesc::new(name, 8, 8, TextureFormat::Rgba8Unorm).with_clear(Color::BLACK),
            );
            handles.push(texture);
            graph
                .add_raster_pass(name, |pass| {
                    pass.set_color_attachment(texture, 0, AccessFlags::WRITE)?;
                    pass.set_depth_attachment(data.active_depth, AccessFlags::READ)?;
                    pass.allow_global_state_modification(true);
                    pass.publish_global_texture(texture, "_Shared")?;
                    pass.set_render_func(noop);
                    Ok(())
                })
                .unwrap();
        }
        graph.compile().unwrap();
        assert_eq!(graph.global_texture("_Shared"), Some(handles[1]));
    }

    #[test]
    fn execute_records_load_ops() {
        let mut graph = RenderGraph::new(&targets());
        let data = graph.resource_data();
        let rt = graph.create_texture(
            TextureDesc::new("rt", 8, 8, TextureFormat::Rgba8Unorm).with_clear(Color::BLACK),
        );
        graph
            .add_raster_pass("solid", |pass| {
                pass.set_color_attachment(rt, 0, AccessFlags::WRITE)?;
                pass.set_depth_attachment(data.active_depth, AccessFlags::READ_WRITE)?;
                pass.allow_global_state_modification(true);
                pass.publish_global_texture(rt, "_Solid")?;
                pass.set_render_func(noop);
                Ok(())
            })
            .unwrap();

        let cmd = graph.execute().unwrap();
        match &cmd.commands()[0] {
            Command::BeginRasterPass { color, depth, .. } => {
                assert_eq!(color[0].load, LoadOp::Clear(Color::BLACK));
                assert_eq!(depth.as_ref().map(|d| d.load), Some(LoadOp::Load));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(cmd.global_textures().collect::<Vec<_>>(), vec![("_Solid", rt)]);
        assert_eq!(cmd.commands().last(), Some(&Command::EndRasterPass));
    }

    #[test]
    fn undeclared_draw_list_is_rejected() {
        let mut graph = RenderGraph::new(&targets());
        let data = graph.resource_data();
        graph
            .add_raster_pass("sneaky", |pass| {
                pass.set_color_attachment(data.active_color, 0, AccessFlags::WRITE)?;
                pass.set_render_func(|ctx| ctx.draw_renderer_list(DrawListHandle(0)));
                Ok(())
            })
            .unwrap();
        assert!(matches!(graph.execute(), Err(Error::Graph(_))));
    }
}
