//! Construction, per-frame update and disposal of the product viewer.
//!
//! The viewer owns every handle it creates through its [`GraphicsBackend`]
//! and hands each one back exactly once when disposed. Frame callbacks are
//! requested through a [`FrameScheduler`] so disposal can cancel the pending
//! one; a callback that still fires afterwards finds the viewer disposed and
//! does nothing.

use super::mesh::MeshData;
use super::orbit::{OrbitControls, OrbitParams};
use super::scene::{rgb, LightDesc, LightKind, MaterialDesc, SceneDesc};
use crate::constants::*;
use crate::easing::Ease;
use crate::error::ViewerError;
use crate::host::{FrameHandle, FrameScheduler};
use crate::material::Material;
use crate::tween::{Property, TargetId, TweenEngine, TweenSpec};
use glam::{EulerRot, Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerState {
    Uninitialized,
    Constructing,
    Running,
    Disposed,
    /// Construction aborted; everything it created has been released.
    Failed,
}

impl ViewerState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewerState::Uninitialized => "uninitialized",
            ViewerState::Constructing => "constructing",
            ViewerState::Running => "running",
            ViewerState::Disposed => "disposed",
            ViewerState::Failed => "failed",
        }
    }
}

/// One mesh to draw this frame.
pub struct DrawItem<'a, G, M> {
    pub geometry: &'a G,
    pub material: &'a M,
    pub model: Mat4,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

/// Everything the backend needs to render one frame.
pub struct FrameView<'a, G, M> {
    pub view_proj: Mat4,
    pub eye: Vec3,
    /// Orthographic view-projection of the shadow-casting light.
    pub shadow_view_proj: Option<Mat4>,
    pub background: Vec3,
    pub fog_density: f32,
    pub lights: &'a [LightDesc],
    pub items: Vec<DrawItem<'a, G, M>>,
}

/// Renderer the viewer drives. Handles are owned by the viewer between
/// creation and release.
pub trait GraphicsBackend {
    type Geometry;
    type Material;

    fn create_geometry(&mut self, mesh: &MeshData) -> Result<Self::Geometry, ViewerError>;
    fn create_material(&mut self, desc: &MaterialDesc) -> Result<Self::Material, ViewerError>;
    fn update_material(&mut self, material: &Self::Material, desc: &MaterialDesc);
    /// New drawing-buffer size in physical pixels.
    fn resize(&mut self, width: u32, height: u32);
    fn render(
        &mut self,
        frame: &FrameView<'_, Self::Geometry, Self::Material>,
    ) -> Result<(), ViewerError>;

    fn release_geometry(&mut self, geometry: Self::Geometry);
    fn release_material(&mut self, material: Self::Material);
    /// Detach camera-control input listeners.
    fn release_controls(&mut self);
    fn release_renderer(&mut self);
    /// Remove the output canvas from its container.
    fn detach_surface(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerCommand {
    RotateLeft,
    RotateRight,
    ZoomIn,
    ZoomOut,
}

impl ViewerCommand {
    pub const ALL: [ViewerCommand; 4] = [
        ViewerCommand::RotateLeft,
        ViewerCommand::RotateRight,
        ViewerCommand::ZoomIn,
        ViewerCommand::ZoomOut,
    ];

    /// Class marking the control button for this command.
    pub fn class_name(&self) -> &'static str {
        match self {
            ViewerCommand::RotateLeft => "rotate-left",
            ViewerCommand::RotateRight => "rotate-right",
            ViewerCommand::ZoomIn => "zoom-in",
            ViewerCommand::ZoomOut => "zoom-out",
        }
    }

    /// First command whose class appears in `classes`.
    pub fn from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let classes: Vec<&str> = classes.into_iter().collect();
        Self::ALL
            .into_iter()
            .find(|cmd| classes.contains(&cmd.class_name()))
    }
}

/// Tween target for the orbit camera; props use their index.
pub const CAMERA_TARGET: TargetId = TargetId(u32::MAX);

fn prop_target(index: usize) -> TargetId {
    TargetId(index as u32)
}

pub struct Viewer<B: GraphicsBackend, S: FrameScheduler> {
    backend: B,
    scheduler: S,
    scene: SceneDesc,
    orbit_params: OrbitParams,
    state: ViewerState,
    geometries: Vec<B::Geometry>,
    materials: Vec<B::Material>,
    orbit: Option<OrbitControls>,
    tweens: TweenEngine,
    pending_frame: Option<FrameHandle>,
    width: u32,
    height: u32,
}

impl<B: GraphicsBackend, S: FrameScheduler> Viewer<B, S> {
    pub fn new(backend: B, scheduler: S, scene: SceneDesc, orbit_params: OrbitParams) -> Self {
        Self {
            backend,
            scheduler,
            scene,
            orbit_params,
            state: ViewerState::Uninitialized,
            geometries: Vec::new(),
            materials: Vec::new(),
            orbit: None,
            tweens: TweenEngine::new(),
            pending_frame: None,
            width: 1,
            height: 1,
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ViewerState::Running
    }

    pub fn scene(&self) -> &SceneDesc {
        &self.scene
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    /// Orbit controls while running, for forwarding pointer input.
    pub fn controls(&mut self) -> Option<&mut OrbitControls> {
        match self.state {
            ViewerState::Running => self.orbit.as_mut(),
            _ => None,
        }
    }

    /// Current y rotation of prop `index`, in radians.
    pub fn prop_rotation_y(&self, index: usize) -> f32 {
        self.tweens.value(prop_target(index), Property::RotationY) as f32
    }

    pub fn camera_distance(&self) -> Option<f32> {
        self.orbit.as_ref().map(OrbitControls::distance)
    }

    /// Create every geometry and material handle and the orbit controls.
    ///
    /// On failure all handles created so far are released, the renderer and
    /// its surface are torn down, and the viewer ends up `Failed`.
    pub fn construct(&mut self, width: u32, height: u32) -> Result<(), ViewerError> {
        if self.state != ViewerState::Uninitialized {
            return Err(ViewerError::InvalidState(
                self.state.name(),
                ViewerState::Uninitialized.name(),
            ));
        }
        self.state = ViewerState::Constructing;
        if let Err(e) = self.create_resources() {
            log::error!("[viewer] construction failed: {}", e);
            self.release_resources();
            self.backend.release_controls();
            self.backend.release_renderer();
            self.backend.detach_surface();
            self.state = ViewerState::Failed;
            return Err(e);
        }

        for (i, prop) in self.scene.props.iter().enumerate() {
            self.tweens.set(prop_target(i), Property::RotationY, prop.rotation.y as f64);
        }
        let cam = &self.scene.camera;
        self.orbit = Some(OrbitControls::new(
            cam.position,
            cam.target,
            self.orbit_params,
        ));
        self.resize(width, height);
        self.state = ViewerState::Running;
        log::info!(
            "[viewer] constructed: {} geometries, {} materials, {} props",
            self.geometries.len(),
            self.materials.len(),
            self.scene.props.len()
        );
        Ok(())
    }

    fn create_resources(&mut self) -> Result<(), ViewerError> {
        for g in &self.scene.geometries {
            let handle = self.backend.create_geometry(&g.build())?;
            self.geometries.push(handle);
        }
        for m in &self.scene.materials {
            let handle = self.backend.create_material(m)?;
            self.materials.push(handle);
        }
        Ok(())
    }

    fn release_resources(&mut self) {
        for g in self.geometries.drain(..) {
            self.backend.release_geometry(g);
        }
        for m in self.materials.drain(..) {
            self.backend.release_material(m);
        }
    }

    /// Schedule the first frame. No-op unless running with nothing pending.
    pub fn start(&mut self) -> bool {
        if self.state != ViewerState::Running || self.pending_frame.is_some() {
            return false;
        }
        self.pending_frame = self.scheduler.request_frame();
        self.pending_frame.is_some()
    }

    /// Frame callback body. Updates controls and tweens, renders, and
    /// schedules the next frame. Returns false (and does nothing) unless
    /// running.
    pub fn frame(&mut self, dt_sec: f64) -> bool {
        if self.state != ViewerState::Running {
            return false;
        }
        self.pending_frame = None;

        self.tweens.tick(dt_sec);
        let dirty = self.tweens.drain_dirty();
        if let Some(orbit) = self.orbit.as_mut() {
            if dirty.contains(&CAMERA_TARGET) {
                orbit.set_distance(self.tweens.value(CAMERA_TARGET, Property::Distance) as f32);
            }
            orbit.update(dt_sec as f32);
        }

        let aspect = self.width as f32 / self.height.max(1) as f32;
        if let Some(orbit) = self.orbit.as_ref() {
            let view = build_frame(
                &self.scene,
                &self.geometries,
                &self.materials,
                &self.tweens,
                orbit,
                aspect,
            );
            if let Err(e) = self.backend.render(&view) {
                log::warn!("[viewer] {}", e);
            }
        }

        self.pending_frame = self.scheduler.request_frame();
        true
    }

    /// Start the tweens for a control button press.
    pub fn command(&mut self, command: ViewerCommand) -> bool {
        if self.state != ViewerState::Running {
            return false;
        }
        match command {
            ViewerCommand::RotateLeft | ViewerCommand::RotateRight => {
                let step = f64::from(if command == ViewerCommand::RotateLeft {
                    -VIEWER_ROTATE_STEP_RAD
                } else {
                    VIEWER_ROTATE_STEP_RAD
                });
                for (i, prop) in self.scene.props.iter().enumerate() {
                    if !prop.kind.rotatable() {
                        continue;
                    }
                    let target = prop_target(i);
                    let current = self.tweens.value(target, Property::RotationY);
                    self.tweens.to(
                        target,
                        Property::RotationY,
                        TweenSpec::to(current + step, VIEWER_ROTATE_SEC).ease(Ease::Power2Out),
                    );
                }
            }
            ViewerCommand::ZoomIn | ViewerCommand::ZoomOut => {
                let step = f64::from(if command == ViewerCommand::ZoomIn {
                    -VIEWER_ZOOM_STEP
                } else {
                    VIEWER_ZOOM_STEP
                });
                let Some(orbit) = self.orbit.as_ref() else {
                    return false;
                };
                // wheel zoom moves the orbit outside the tween; resync first
                if !self.tweens.is_active(CAMERA_TARGET, Property::Distance) {
                    self.tweens.set(CAMERA_TARGET, Property::Distance, orbit.distance() as f64);
                }
                let current = self.tweens.value(CAMERA_TARGET, Property::Distance);
                self.tweens.to(
                    CAMERA_TARGET,
                    Property::Distance,
                    TweenSpec::to(current + step, VIEWER_ZOOM_SEC).ease(Ease::Power2InOut),
                );
            }
        }
        true
    }

    /// Drawing-buffer size changed (already scaled by the pixel ratio).
    pub fn resize(&mut self, width: u32, height: u32) {
        if matches!(self.state, ViewerState::Disposed | ViewerState::Failed) {
            return;
        }
        self.width = width.max(1);
        self.height = height.max(1);
        self.backend.resize(self.width, self.height);
    }

    /// Recolour the wooden parts (table top and legs).
    pub fn set_material(&mut self, material: Material) -> bool {
        if self.state != ViewerState::Running {
            return false;
        }
        let color = rgb(material.rgb_hex());
        let mut wood: Vec<usize> = self
            .scene
            .props
            .iter()
            .filter(|p| p.kind.is_wood())
            .map(|p| p.material)
            .collect();
        wood.sort_unstable();
        wood.dedup();
        for idx in wood {
            let (Some(desc), Some(handle)) =
                (self.scene.materials.get_mut(idx), self.materials.get(idx))
            else {
                continue;
            };
            desc.color = color;
            self.backend.update_material(handle, desc);
        }
        log::debug!("[viewer] material -> {}", material.id());
        true
    }

    /// Tear everything down. Each step happens at most once over the
    /// viewer's life; returns false when already disposed.
    pub fn dispose(&mut self) -> bool {
        match self.state {
            ViewerState::Disposed => return false,
            ViewerState::Running => {
                if let Some(handle) = self.pending_frame.take() {
                    self.scheduler.cancel_frame(handle);
                }
                self.release_resources();
                if let Some(orbit) = self.orbit.as_mut() {
                    orbit.dispose();
                }
                self.backend.release_controls();
                self.backend.release_renderer();
                self.backend.detach_surface();
                log::info!("[viewer] disposed");
            }
            // nothing was built, or a failed construction already cleaned up
            _ => {}
        }
        self.pending_frame = None;
        self.state = ViewerState::Disposed;
        true
    }
}

fn build_frame<'a, G, M>(
    scene: &'a SceneDesc,
    geometries: &'a [G],
    materials: &'a [M],
    tweens: &TweenEngine,
    orbit: &OrbitControls,
    aspect: f32,
) -> FrameView<'a, G, M> {
    let cam = &scene.camera;
    let eye = orbit.position();
    let proj = Mat4::perspective_rh(cam.fov_y_deg.to_radians(), aspect, cam.near, cam.far);
    let view = Mat4::look_at_rh(eye, orbit.target(), Vec3::Y);

    let items = scene
        .props
        .iter()
        .enumerate()
        .filter_map(|(i, prop)| {
            let geometry = geometries.get(prop.geometry)?;
            let material = materials.get(prop.material)?;
            let ry = tweens.value(prop_target(i), Property::RotationY) as f32;
            let rotation = Quat::from_euler(EulerRot::XYZ, prop.rotation.x, ry, prop.rotation.z);
            Some(DrawItem {
                geometry,
                material,
                model: Mat4::from_rotation_translation(rotation, prop.position),
                cast_shadow: prop.cast_shadow,
                receive_shadow: prop.receive_shadow,
            })
        })
        .take(VIEWER_MAX_DRAW_ITEMS)
        .collect();

    FrameView {
        view_proj: proj * view,
        eye,
        shadow_view_proj: scene.shadow_light().and_then(shadow_view_proj),
        background: scene.background,
        fog_density: scene.fog_density,
        lights: &scene.lights,
        items,
    }
}

const SHADOW_EXTENT: f32 = 8.0;

fn shadow_view_proj(light: &LightDesc) -> Option<Mat4> {
    let LightKind::Directional { position, .. } = light.kind else {
        return None;
    };
    let far = position.length() * 2.0 + SHADOW_EXTENT;
    let proj = Mat4::orthographic_rh(
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        0.5,
        far,
    );
    Some(proj * Mat4::look_at_rh(position, Vec3::ZERO, Vec3::Y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_from_class_list() {
        assert_eq!(
            ViewerCommand::from_classes(["control-btn", "zoom-in"]),
            Some(ViewerCommand::ZoomIn)
        );
        assert_eq!(
            ViewerCommand::from_classes("control-btn rotate-left".split_whitespace()),
            Some(ViewerCommand::RotateLeft)
        );
        assert_eq!(ViewerCommand::from_classes(["control-btn"]), None);
    }

    #[test]
    fn shadow_projection_covers_origin() {
        let scene = SceneDesc::showcase();
        let m = scene.shadow_light().and_then(shadow_view_proj);
        let Some(m) = m else {
            panic!("showcase scene has a shadow light");
        };
        let p = m.project_point3(Vec3::ZERO);
        assert!(p.x.abs() < 1e-4 && p.y.abs() < 1e-4);
        assert!(p.z > 0.0 && p.z < 1.0);
    }
}
