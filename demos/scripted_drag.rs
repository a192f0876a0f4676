//! Replays a scripted mouse session against an in-memory scene.
//!
//! Run with `RUST_LOG=debug cargo run --example scripted_drag` to see the
//! gizmo and camera state transitions.

use anyhow::{Context, Result};
use dragcam::gfx::geometry::generate_cube;
use dragcam::prelude::*;
use log::info;

const VIEW: ViewId = ViewId(0);
const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let camera = ViewportCamera::looking_at(Vector3::new(0.0, 2.0, 10.0), Vector3::zero(), (WIDTH, HEIGHT));
    let mut scene = Scene::with_camera(camera);
    let part = scene.create_node(None, NodeDesc::new("part").geometry(generate_cube()))?;

    let mut views = ViewportRegistry::new();
    views.open(&mut scene, VIEW, &ViewportConfig::default())?;

    let binding = SelectionBinding::new(ElementId(1), DocId(0), "Model", part);
    views.handle_message(&mut scene, VIEW, &ViewMessage::HighlightElement(binding));

    // Walk right from the pivot until the X arrow is under the cursor
    let (cx, cy) = (WIDTH as i32 / 2, HEIGHT as i32 / 2);
    let gizmo = views.get(VIEW).context("viewport closed")?.gizmo();
    let (hx, hy) = (cx..WIDTH as i32)
        .flat_map(|x| (cy - 40..cy + 40).map(move |y| (x, y)))
        .find(|&(x, y)| gizmo.pick_handle_at(&scene, x, y) == Some(HandleId::translate(Axis::X)))
        .context("X arrow not found on screen")?;
    info!("X arrow under the cursor at ({hx}, {hy})");

    let script = [
        (MouseAction::LeftDown, hx, hy, ModifierFlags::LBUTTON),
        (MouseAction::Move, hx + 25, hy, ModifierFlags::LBUTTON),
        (MouseAction::Move, hx + 50, hy, ModifierFlags::LBUTTON),
        (MouseAction::Move, hx + 50, hy, ModifierFlags::LBUTTON),
        (MouseAction::LeftUp, hx + 50, hy, ModifierFlags::NONE),
        (MouseAction::Wheel(120), hx, hy, ModifierFlags::NONE),
        (MouseAction::MiddleDown, 100, 100, ModifierFlags::MBUTTON),
        (MouseAction::Move, 160, 110, ModifierFlags::MBUTTON),
        (MouseAction::MiddleUp, 160, 110, ModifierFlags::NONE),
    ];

    for (action, x, y, flags) in script {
        let result = views.handle_mouse(&mut scene, &MouseEvent::new(VIEW, action, x, y, flags));
        info!("{action:?} at ({x}, {y}): {result:?}");
        for notification in views.drain_notifications() {
            info!("  -> {notification:?}");
        }
    }

    let moved = scene.local_transform(part)?;
    info!("part translation after drag: {:?}", moved.translation);
    let camera = scene.camera().context("scene lost its camera")?;
    info!("camera at {:?}, fovy {:?}", camera.position, Deg::from(camera.projection.fovy));

    views.close(&mut scene, VIEW)?;
    Ok(())
}
