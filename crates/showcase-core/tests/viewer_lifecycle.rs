use showcase_core::material::Material;
use showcase_core::viewer::*;
use showcase_core::{FrameHandle, FrameScheduler, ViewerError};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

#[derive(Default)]
struct FakeBackend {
    next_id: u32,
    live_geometries: BTreeSet<u32>,
    live_materials: BTreeSet<u32>,
    geometry_releases: Vec<u32>,
    material_releases: Vec<u32>,
    material_updates: Vec<(u32, [f32; 3])>,
    renders: usize,
    last_items: usize,
    controls_released: usize,
    renderer_released: usize,
    surface_detached: usize,
    resized_to: Option<(u32, u32)>,
    fail_material_after: Option<usize>,
}

impl GraphicsBackend for FakeBackend {
    type Geometry = u32;
    type Material = u32;

    fn create_geometry(&mut self, mesh: &MeshData) -> Result<u32, ViewerError> {
        assert!(!mesh.indices.is_empty());
        self.next_id += 1;
        self.live_geometries.insert(self.next_id);
        Ok(self.next_id)
    }

    fn create_material(&mut self, _desc: &MaterialDesc) -> Result<u32, ViewerError> {
        if let Some(n) = self.fail_material_after {
            if self.live_materials.len() >= n {
                return Err(ViewerError::Resource {
                    what: "material",
                    reason: "out of memory".into(),
                });
            }
        }
        self.next_id += 1;
        self.live_materials.insert(self.next_id);
        Ok(self.next_id)
    }

    fn update_material(&mut self, material: &u32, desc: &MaterialDesc) {
        self.material_updates
            .push((*material, desc.color.to_array()));
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.resized_to = Some((width, height));
    }

    fn render(&mut self, frame: &FrameView<'_, u32, u32>) -> Result<(), ViewerError> {
        self.renders += 1;
        self.last_items = frame.items.len();
        Ok(())
    }

    fn release_geometry(&mut self, geometry: u32) {
        self.live_geometries.remove(&geometry);
        self.geometry_releases.push(geometry);
    }

    fn release_material(&mut self, material: u32) {
        self.live_materials.remove(&material);
        self.material_releases.push(material);
    }

    fn release_controls(&mut self) {
        self.controls_released += 1;
    }

    fn release_renderer(&mut self) {
        self.renderer_released += 1;
    }

    fn detach_surface(&mut self) {
        self.surface_detached += 1;
    }
}

#[derive(Default)]
struct Frames {
    next: i32,
    outstanding: BTreeSet<i32>,
    cancelled: Vec<i32>,
}

/// Shares its bookkeeping with the test so it can play the host's part.
#[derive(Clone, Default)]
struct FakeScheduler(Rc<RefCell<Frames>>);

impl FrameScheduler for FakeScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let mut f = self.0.borrow_mut();
        f.next += 1;
        let id = f.next;
        f.outstanding.insert(id);
        Some(FrameHandle(id))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut f = self.0.borrow_mut();
        f.outstanding.remove(&handle.0);
        f.cancelled.push(handle.0);
    }
}

fn running_viewer() -> (Viewer<FakeBackend, FakeScheduler>, Rc<RefCell<Frames>>) {
    let scheduler = FakeScheduler::default();
    let frames = scheduler.0.clone();
    let mut v = Viewer::new(
        FakeBackend::default(),
        scheduler,
        SceneDesc::showcase(),
        OrbitParams::default(),
    );
    v.construct(800, 600).expect("construct");
    assert!(v.start());
    (v, frames)
}

/// Play the host: fire the pending frame callback.
fn pump(v: &mut Viewer<FakeBackend, FakeScheduler>, frames: &Rc<RefCell<Frames>>, dt: f64) -> bool {
    if let Some(h) = v.pending_frame() {
        frames.borrow_mut().outstanding.remove(&h.0);
    }
    v.frame(dt)
}

#[test]
fn construction_creates_shared_handles_and_starts_running() {
    let (v, _frames) = running_viewer();
    assert_eq!(v.state(), ViewerState::Running);
    let b = v.backend();
    assert_eq!(b.live_geometries.len(), 5);
    assert_eq!(b.live_materials.len(), 5);
    assert_eq!(b.resized_to, Some((800, 600)));
    assert!(v.pending_frame().is_some());
}

#[test]
fn frames_render_every_prop_and_reschedule() {
    let (mut v, frames) = running_viewer();
    for _ in 0..3 {
        assert!(pump(&mut v, &frames, 1.0 / 60.0));
    }
    assert_eq!(v.backend().renders, 3);
    assert_eq!(v.backend().last_items, 9);
    assert!(v.pending_frame().is_some());
}

#[test]
fn dispose_releases_every_handle_exactly_once() {
    let (mut v, frames) = running_viewer();
    pump(&mut v, &frames, 0.016);
    assert!(v.dispose());
    assert!(!v.dispose());

    let b = v.backend();
    assert!(b.live_geometries.is_empty());
    assert!(b.live_materials.is_empty());
    let mut g = b.geometry_releases.clone();
    g.dedup();
    assert_eq!(g.len(), 5);
    assert_eq!(b.geometry_releases.len(), 5);
    assert_eq!(b.material_releases.len(), 5);
    assert_eq!(b.controls_released, 1);
    assert_eq!(b.renderer_released, 1);
    assert_eq!(b.surface_detached, 1);
    assert_eq!(v.state(), ViewerState::Disposed);
}

#[test]
fn dispose_leaves_no_outstanding_frame() {
    let (mut v, frames) = running_viewer();
    pump(&mut v, &frames, 0.016);
    pump(&mut v, &frames, 0.016);
    assert_eq!(frames.borrow().outstanding.len(), 1);
    v.dispose();
    assert!(v.pending_frame().is_none());
    assert!(frames.borrow().outstanding.is_empty());
    assert_eq!(frames.borrow().cancelled.len(), 1);
}

#[test]
fn stale_frame_after_dispose_renders_nothing() {
    let (mut v, frames) = running_viewer();
    v.dispose();
    let renders = v.backend().renders;
    let requested = frames.borrow().next;
    assert!(!v.frame(0.016));
    assert_eq!(v.backend().renders, renders);
    assert_eq!(frames.borrow().next, requested);
    assert!(frames.borrow().outstanding.is_empty());
    assert!(v.pending_frame().is_none());
}

#[test]
fn failed_construction_releases_partial_resources() {
    let backend = FakeBackend {
        fail_material_after: Some(2),
        ..FakeBackend::default()
    };
    let mut v = Viewer::new(
        backend,
        FakeScheduler::default(),
        SceneDesc::showcase(),
        OrbitParams::default(),
    );
    let err = v.construct(800, 600);
    assert!(matches!(err, Err(ViewerError::Resource { .. })));
    assert_eq!(v.state(), ViewerState::Failed);
    let b = v.backend();
    assert!(b.live_geometries.is_empty());
    assert!(b.live_materials.is_empty());
    assert_eq!(b.material_releases.len(), 2);
    assert_eq!(b.renderer_released, 1);
    assert_eq!(b.controls_released, 1);
    assert_eq!(b.surface_detached, 1);

    assert!(!v.start());
    assert!(!v.frame(0.016));
    assert!(v.dispose());
    // nothing released twice
    assert_eq!(v.backend().renderer_released, 1);
    assert_eq!(v.backend().controls_released, 1);
    assert_eq!(v.backend().material_releases.len(), 2);
}

#[test]
fn construct_twice_is_rejected() {
    let (mut v, _frames) = running_viewer();
    assert_eq!(
        v.construct(10, 10),
        Err(ViewerError::InvalidState("running", "uninitialized"))
    );
}

#[test]
fn rotate_buttons_turn_everything_but_the_ground() {
    let (mut v, frames) = running_viewer();
    let ground = v
        .scene()
        .props
        .iter()
        .position(|p| p.kind == PropKind::Ground)
        .unwrap_or_default();
    let block = v
        .scene()
        .props
        .iter()
        .position(|p| p.kind == PropKind::Block)
        .unwrap_or_default();
    let block_start = v.prop_rotation_y(block);

    assert!(v.command(ViewerCommand::RotateRight));
    for _ in 0..70 {
        pump(&mut v, &frames, 1.0 / 60.0);
    }
    let quarter = std::f32::consts::FRAC_PI_4;
    assert!((v.prop_rotation_y(0) - quarter).abs() < 1e-5);
    assert!((v.prop_rotation_y(block) - (block_start + quarter)).abs() < 1e-5);
    assert_eq!(v.prop_rotation_y(ground), 0.0);

    // two quick presses stack from the current value
    v.command(ViewerCommand::RotateLeft);
    v.command(ViewerCommand::RotateLeft);
    for _ in 0..70 {
        pump(&mut v, &frames, 1.0 / 60.0);
    }
    assert!(v.prop_rotation_y(0) < quarter);
}

#[test]
fn zoom_buttons_move_the_camera() {
    let (mut v, frames) = running_viewer();
    let start = v.camera_distance().unwrap_or_default();
    v.command(ViewerCommand::ZoomIn);
    for _ in 0..40 {
        pump(&mut v, &frames, 1.0 / 60.0);
    }
    let d = v.camera_distance().unwrap_or_default();
    assert!((d - (start - 0.5)).abs() < 1e-3, "distance {d}");

    v.command(ViewerCommand::ZoomOut);
    for _ in 0..40 {
        pump(&mut v, &frames, 1.0 / 60.0);
    }
    let d = v.camera_distance().unwrap_or_default();
    assert!((d - start).abs() < 1e-3);
}

#[test]
fn material_swatch_recolours_wood_only() {
    let (mut v, _frames) = running_viewer();
    assert!(v.set_material(Material::Oak));
    let updates = &v.backend().material_updates;
    // table and legs have one material each
    assert_eq!(updates.len(), 2);
    let oak = [200.0 / 255.0, 161.0 / 255.0, 101.0 / 255.0];
    for (_, c) in updates {
        for i in 0..3 {
            assert!((c[i] - oak[i]).abs() < 1e-6);
        }
    }
}

#[test]
fn commands_are_ignored_once_disposed() {
    let (mut v, _frames) = running_viewer();
    v.dispose();
    assert!(!v.command(ViewerCommand::ZoomIn));
    assert!(!v.set_material(Material::Maple));
    assert!(v.controls().is_none());
    v.resize(100, 100);
    assert_eq!(v.backend().resized_to, Some((800, 600)));
}
