//! Scripted mouse sessions against a TransformGizmo bound to a scene element

#[cfg(test)]
mod tests {
    use super::super::dragger::{ElementKind, GizmoState, SelectionBinding, TransformGizmo};
    use super::super::handle::{Axis, DraggerFilters, HandleId};
    use crate::config::DraggerSettings;
    use crate::gfx::camera::ViewportCamera;
    use crate::gfx::geometry::generate_cube;
    use crate::gfx::scene::{NodeDesc, NodeId, NodeTransform, Scene, SceneAccess};
    use crate::input::{
        DocId, ElementId, EventResult, ModifierFlags, MouseAction, MouseEvent, Notification,
        ViewId, ViewMessage,
    };
    use cgmath::{InnerSpace, Rotation, Vector3, Vector4, Zero};

    const VIEW: ViewId = ViewId(3);

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Camera on +Z looking at the origin, a unit box at the origin, gizmo bound to it.
    fn bound_scene() -> (Scene, NodeId, TransformGizmo) {
        init_logger();
        let camera = ViewportCamera::looking_at(Vector3::new(0.0, 0.0, 10.0), Vector3::zero(), (800, 600));
        let mut scene = Scene::with_camera(camera);
        let target = scene
            .create_node(None, NodeDesc::new("target").geometry(generate_cube()))
            .unwrap();

        let mut gizmo = TransformGizmo::new(VIEW, DraggerSettings::default());
        gizmo.register(&mut scene).unwrap();
        let binding = SelectionBinding::new(ElementId(11), DocId(2), "Model", target);
        assert!(gizmo
            .handle_message(&mut scene, &ViewMessage::HighlightElement(binding))
            .handled);
        (scene, target, gizmo)
    }

    fn event(action: MouseAction, x: i32, y: i32, flags: ModifierFlags) -> MouseEvent {
        MouseEvent::new(VIEW, action, x, y, flags)
    }

    /// Pixel position of a point given in the overlay (view) frame.
    fn project(scene: &Scene, view_point: Vector3<f32>) -> (i32, i32) {
        let camera = scene.camera().unwrap();
        let clip = camera.projection_matrix() * Vector4::new(view_point.x, view_point.y, view_point.z, 1.0);
        let (width, height) = camera.viewport_size();
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        (
            ((ndc_x + 1.0) * 0.5 * width).round() as i32,
            ((1.0 - ndc_y) * 0.5 * height).round() as i32,
        )
    }

    fn moved_count(notifications: &[Notification]) -> usize {
        notifications
            .iter()
            .filter(|n| matches!(n, Notification::ElementMoved { .. }))
            .count()
    }

    #[test]
    fn test_scenario_drag_x_handle() {
        let (mut scene, target, mut gizmo) = bound_scene();
        let scale = gizmo.gizmo_scale();

        // Middle of the X shaft
        let (x, y) = project(&scene, Vector3::new(60.0 * scale, 0.0, -10.0));
        assert_eq!(gizmo.pick_handle_at(&scene, x, y), Some(HandleId::translate(Axis::X)));

        let down = gizmo.handle_mouse(&mut scene, &event(MouseAction::LeftDown, x, y, ModifierFlags::LBUTTON));
        assert!(down.handled);
        assert_eq!(gizmo.state(), GizmoState::Armed);

        let moved = gizmo.handle_mouse(&mut scene, &event(MouseAction::Move, x + 50, y, ModifierFlags::LBUTTON));
        assert_eq!(moved, EventResult::REPAINT);
        let still = gizmo.handle_mouse(&mut scene, &event(MouseAction::Move, x + 50, y, ModifierFlags::LBUTTON));
        assert_eq!(still, EventResult::HANDLED);
        gizmo.handle_mouse(&mut scene, &event(MouseAction::LeftUp, x + 50, y, ModifierFlags::NONE));
        assert_eq!(gizmo.state(), GizmoState::Attached);

        let transform = scene.local_transform(target).unwrap();
        assert!(transform.translation.x > 0.0);
        assert!((transform.translation.x - 50.0 * scale).abs() < 1e-5);
        assert_eq!(transform.translation.y, 0.0);
        assert_eq!(transform.translation.z, 0.0);

        let notifications = gizmo.take_notifications();
        assert_eq!(
            notifications,
            vec![Notification::ElementMoved {
                view: VIEW,
                element_id: ElementId(11),
                doc_id: DocId(2),
            }]
        );

        // Gizmo followed the element
        let root = gizmo.handles().unwrap().root();
        let placed = scene.local_transform(root).unwrap();
        assert!((placed.translation.x - 50.0 * scale).abs() < 1e-4);
    }

    #[test]
    fn test_view_pick_then_left_down_keeps_session() {
        let (mut scene, target, mut gizmo) = bound_scene();
        let scale = gizmo.gizmo_scale();
        let (x, y) = project(&scene, Vector3::new(60.0 * scale, 0.0, -10.0));

        let pick = ViewMessage::ViewPick { handle: 0, pre_pick: false };
        assert!(gizmo.handle_message(&mut scene, &pick).handled);
        let down = gizmo.handle_mouse(&mut scene, &event(MouseAction::LeftDown, x, y, ModifierFlags::LBUTTON));
        assert!(down.handled);
        assert_eq!(gizmo.session().unwrap().handle, HandleId::translate(Axis::X));
        assert_eq!(gizmo.state(), GizmoState::Armed);

        gizmo.handle_mouse(&mut scene, &event(MouseAction::Move, x + 50, y, ModifierFlags::LBUTTON));
        let transform = scene.local_transform(target).unwrap();
        assert!((transform.translation.x - 50.0 * scale).abs() < 1e-5);
        assert_eq!(moved_count(&gizmo.take_notifications()), 1);
    }

    #[test]
    fn test_section_plane_ignores_translate_pick() {
        let (mut scene, target, mut gizmo) = bound_scene();
        let section = SelectionBinding::new(ElementId(11), DocId(2), "Section", target)
            .with_kind(ElementKind::SectionPlane);
        gizmo.on_selection_changed(&mut scene, section);

        let pick = ViewMessage::ViewPick { handle: 0, pre_pick: false };
        assert_eq!(gizmo.handle_message(&mut scene, &pick), EventResult::IGNORED);
        let ring_z = ViewMessage::ViewPick { handle: 5, pre_pick: false };
        assert_eq!(gizmo.handle_message(&mut scene, &ring_z), EventResult::IGNORED);
        assert!(gizmo.session().is_none());

        gizmo.on_mouse_move(&mut scene, 100, 100, ModifierFlags::LBUTTON);
        gizmo.on_mouse_move(&mut scene, 150, 100, ModifierFlags::LBUTTON);
        assert_eq!(scene.local_transform(target).unwrap(), NodeTransform::identity());
        assert!(gizmo.take_notifications().is_empty());
    }

    #[test]
    fn test_filtered_group_does_not_drag() {
        let (mut scene, target, mut gizmo) = bound_scene();
        gizmo.set_filters(&mut scene, DraggerFilters::from_bits(DraggerFilters::ROTATE_BIT));

        let pick = ViewMessage::ViewPick { handle: 0, pre_pick: false };
        assert_eq!(gizmo.handle_message(&mut scene, &pick), EventResult::IGNORED);
        gizmo.on_mouse_move(&mut scene, 100, 100, ModifierFlags::LBUTTON);
        gizmo.on_mouse_move(&mut scene, 150, 100, ModifierFlags::LBUTTON);
        assert_eq!(scene.local_transform(target).unwrap(), NodeTransform::identity());
    }

    #[test]
    fn test_translate_round_trip() {
        let (mut scene, target, mut gizmo) = bound_scene();
        let start = scene.local_transform(target).unwrap();

        // In-plane axes keep the pivot depth, and with it the gizmo scale
        for axis in [Axis::X, Axis::Y] {
            gizmo.on_pick(HandleId::translate(axis));
            gizmo.on_mouse_move(&mut scene, 200, 200, ModifierFlags::LBUTTON);
            gizmo.on_mouse_move(&mut scene, 237, 181, ModifierFlags::LBUTTON);
            gizmo.on_mouse_move(&mut scene, 200, 200, ModifierFlags::LBUTTON);
            gizmo.on_left_up();
        }

        let end = scene.local_transform(target).unwrap();
        assert!((end.translation - start.translation).magnitude() < 1e-4);
        assert_eq!(end.orientation, start.orientation);
        assert_eq!(moved_count(&gizmo.take_notifications()), 4);
    }

    #[test]
    fn test_pick_same_handle_twice_disarms() {
        let (mut scene, target, mut gizmo) = bound_scene();
        let x = HandleId::translate(Axis::X);
        gizmo.on_pick(x);
        gizmo.on_pick(x);
        assert!(gizmo.session().is_none());

        assert_eq!(
            gizmo.on_mouse_move(&mut scene, 10, 10, ModifierFlags::LBUTTON),
            EventResult::IGNORED
        );
        gizmo.on_mouse_move(&mut scene, 60, 10, ModifierFlags::LBUTTON);
        assert_eq!(scene.local_transform(target).unwrap(), NodeTransform::identity());
        assert!(gizmo.take_notifications().is_empty());
    }

    #[test]
    fn test_pick_other_handle_rearms() {
        let (mut scene, target, mut gizmo) = bound_scene();
        gizmo.on_pick(HandleId::translate(Axis::X));
        gizmo.on_pick(HandleId::translate(Axis::Y));
        assert_eq!(gizmo.session().unwrap().handle, HandleId::translate(Axis::Y));

        gizmo.on_mouse_move(&mut scene, 100, 100, ModifierFlags::LBUTTON);
        gizmo.on_mouse_move(&mut scene, 100, 80, ModifierFlags::LBUTTON);
        let transform = scene.local_transform(target).unwrap();
        assert_eq!(transform.translation.x, 0.0);
        // Dragging up moves along +Y when +Y points up on screen
        assert!(transform.translation.y > 0.0);
    }

    #[test]
    fn test_first_move_only_sets_baseline() {
        let (mut scene, target, mut gizmo) = bound_scene();
        gizmo.on_pick(HandleId::SCALE);
        assert!(!gizmo.is_dragging());
        assert_eq!(
            gizmo.on_mouse_move(&mut scene, 300, 300, ModifierFlags::NONE),
            EventResult::HANDLED
        );
        assert!(gizmo.is_dragging());
        assert_eq!(scene.local_transform(target).unwrap(), NodeTransform::identity());
    }

    #[test]
    fn test_move_without_button_disarms() {
        let (mut scene, target, mut gizmo) = bound_scene();
        gizmo.on_pick(HandleId::translate(Axis::X));
        gizmo.on_mouse_move(&mut scene, 100, 100, ModifierFlags::LBUTTON);
        assert_eq!(
            gizmo.on_mouse_move(&mut scene, 140, 100, ModifierFlags::NONE),
            EventResult::IGNORED
        );
        assert!(gizmo.session().is_none());
        assert_eq!(scene.local_transform(target).unwrap(), NodeTransform::identity());
    }

    #[test]
    fn test_rotate_keeps_translation() {
        let (mut scene, target, mut gizmo) = bound_scene();
        let start = NodeTransform::from_translation(Vector3::new(0.5, -0.25, 0.0));
        scene.set_local_transform(target, start).unwrap();
        gizmo.refresh_placement(&mut scene);

        gizmo.on_pick(HandleId::rotate(Axis::Y));
        gizmo.on_mouse_move(&mut scene, 400, 300, ModifierFlags::LBUTTON);
        gizmo.on_mouse_move(&mut scene, 420, 300, ModifierFlags::LBUTTON);

        let turned = scene.local_transform(target).unwrap();
        assert_eq!(turned.translation, start.translation);
        assert_eq!(turned.scale, start.scale);
        assert!((turned.orientation.magnitude() - 1.0).abs() < 1e-5);
        // Only Y stays put under a turn about Y
        let y = turned.orientation.rotate_vector(Vector3::unit_y());
        assert!((y - Vector3::unit_y()).magnitude() < 1e-5);
        let x = turned.orientation.rotate_vector(Vector3::unit_x());
        assert!((x - Vector3::unit_x()).magnitude() > 1e-3);
    }

    #[test]
    fn test_scale_clamp_through_gizmo() {
        let (mut scene, target, mut gizmo) = bound_scene();
        gizmo.on_pick(HandleId::SCALE);
        gizmo.on_mouse_move(&mut scene, 500, 500, ModifierFlags::LBUTTON);

        let mut cursor = 500;
        for _ in 0..2000 {
            cursor -= 250;
            gizmo.on_mouse_move(&mut scene, cursor, 500, ModifierFlags::LBUTTON);
            let scale = scene.local_transform(target).unwrap().scale;
            assert!(scale.x > 0.01 && scale.y > 0.01 && scale.z > 0.01);
            assert_eq!(scale.x, scale.y);
        }
        // Shrinking stopped right above the floor
        assert!(scene.local_transform(target).unwrap().scale.x < 0.011);
    }

    #[test]
    fn test_gizmo_size_tracks_distance() {
        let (mut scene, _, mut gizmo) = bound_scene();
        let near = gizmo.gizmo_scale();

        scene.camera_mut().unwrap().position = Vector3::new(0.0, 0.0, 40.0);
        gizmo.handle_message(&mut scene, &ViewMessage::CameraChanged);
        let far = gizmo.gizmo_scale();

        assert!(far >= near * 4.0 - 1e-6);
        assert!((far / near - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_pre_pick_ignored_while_dragging() {
        let (mut scene, _, mut gizmo) = bound_scene();
        gizmo.on_pick(HandleId::translate(Axis::Z));
        gizmo.on_mouse_move(&mut scene, 50, 50, ModifierFlags::LBUTTON);

        let hover = ViewMessage::ViewPick { handle: 6, pre_pick: true };
        assert_eq!(gizmo.handle_message(&mut scene, &hover), EventResult::IGNORED);
        assert!(gizmo.pre_picked().is_none());

        gizmo.on_left_up();
        assert_eq!(gizmo.handle_message(&mut scene, &hover), EventResult::REPAINT);
        assert_eq!(gizmo.pre_picked(), Some(HandleId::SCALE));

        assert_eq!(
            gizmo.handle_message(&mut scene, &ViewMessage::PreHighlightChanged),
            EventResult::REPAINT
        );
        assert!(gizmo.pre_picked().is_none());
    }

    #[test]
    fn test_hover_highlights_handle_under_cursor() {
        let (mut scene, _, mut gizmo) = bound_scene();
        let scale = gizmo.gizmo_scale();
        let (x, y) = project(&scene, Vector3::new(60.0 * scale, 0.0, -10.0));

        let hover = gizmo.handle_mouse(&mut scene, &event(MouseAction::Move, x, y, ModifierFlags::NONE));
        assert!(!hover.handled);
        assert!(hover.requires_repaint);
        assert_eq!(gizmo.pre_picked(), Some(HandleId::translate(Axis::X)));

        // Far corner of the viewport: nothing there
        gizmo.handle_mouse(&mut scene, &event(MouseAction::Move, 5, 5, ModifierFlags::NONE));
        assert!(gizmo.pre_picked().is_none());
    }

    #[test]
    fn test_target_removed_mid_drag() {
        let (mut scene, target, mut gizmo) = bound_scene();
        gizmo.on_pick(HandleId::translate(Axis::X));
        gizmo.on_mouse_move(&mut scene, 100, 100, ModifierFlags::LBUTTON);

        scene.remove_node(target).unwrap();
        assert_eq!(
            gizmo.on_mouse_move(&mut scene, 150, 100, ModifierFlags::LBUTTON),
            EventResult::IGNORED
        );
        assert!(gizmo.session().is_none());
        assert_eq!(
            gizmo.on_mouse_move(&mut scene, 200, 100, ModifierFlags::LBUTTON),
            EventResult::IGNORED
        );
        assert!(gizmo.take_notifications().is_empty());
    }

    #[test]
    fn test_selection_change_mid_drag_drops_session() {
        let (mut scene, target, mut gizmo) = bound_scene();
        let other = scene
            .create_node(None, NodeDesc::new("other").geometry(generate_cube()))
            .unwrap();
        gizmo.on_pick(HandleId::translate(Axis::X));
        gizmo.on_mouse_move(&mut scene, 100, 100, ModifierFlags::LBUTTON);

        let binding = SelectionBinding::new(ElementId(12), DocId(2), "Model", other);
        gizmo.on_selection_changed(&mut scene, binding);
        assert_eq!(gizmo.state(), GizmoState::Attached);

        gizmo.on_mouse_move(&mut scene, 150, 100, ModifierFlags::LBUTTON);
        assert_eq!(scene.local_transform(target).unwrap(), NodeTransform::identity());
        assert_eq!(scene.local_transform(other).unwrap(), NodeTransform::identity());
    }

    #[test]
    fn test_element_moved_elsewhere_replaces_gizmo() {
        let (mut scene, target, mut gizmo) = bound_scene();
        scene
            .set_local_transform(target, NodeTransform::from_translation(Vector3::new(0.0, 1.0, 0.0)))
            .unwrap();
        let result = gizmo.handle_message(&mut scene, &ViewMessage::ElementMoved);
        assert!(result.requires_repaint);

        let root = gizmo.handles().unwrap().root();
        let placed = scene.local_transform(root).unwrap();
        assert!((placed.translation - Vector3::new(0.0, 1.0, -10.0)).magnitude() < 1e-4);
    }
}
