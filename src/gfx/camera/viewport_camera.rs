use cgmath::*;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fovy: Rad<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fovy: Deg(45.0).into(),
            aspect: 4.0 / 3.0,
            znear: 0.1,
            zfar: 10_000.0,
        }
    }
}

/// The camera of one viewport.
///
/// The camera looks down its local -Z with local +Y up; `orientation` maps
/// camera space to world space. `pivot` is the point orbits turn around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportCamera {
    pub position: Vector3<f32>,
    pub orientation: Quaternion<f32>,
    pub pivot: Vector3<f32>,
    pub projection: Projection,
    viewport: (u32, u32),
}

impl ViewportCamera {
    pub fn new(
        position: Vector3<f32>,
        orientation: Quaternion<f32>,
        pivot: Vector3<f32>,
        viewport: (u32, u32),
    ) -> Self {
        let mut camera = Self {
            position,
            orientation: orientation.normalize(),
            pivot,
            projection: Projection::default(),
            viewport: (1, 1),
        };
        camera.resize_projection(viewport.0, viewport.1);
        camera
    }

    /// Camera at `position` looking at `target`, with world +Y kept up.
    pub fn looking_at(position: Vector3<f32>, target: Vector3<f32>, viewport: (u32, u32)) -> Self {
        let orientation = look_orientation(target - position);
        Self::new(position, orientation, target, viewport)
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
        self.projection.aspect = self.viewport.0 as f32 / self.viewport.1 as f32;
    }

    pub fn viewport_size(&self) -> (f32, f32) {
        (self.viewport.0 as f32, self.viewport.1 as f32)
    }

    pub fn right(&self) -> Vector3<f32> {
        self.orientation.rotate_vector(Vector3::unit_x())
    }

    pub fn up(&self) -> Vector3<f32> {
        self.orientation.rotate_vector(Vector3::unit_y())
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.orientation.rotate_vector(-Vector3::unit_z())
    }

    /// Rotation taking world directions into camera space.
    pub fn world_to_view_rotation(&self) -> Quaternion<f32> {
        self.orientation.conjugate()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::from(self.world_to_view_rotation()) * Matrix4::from_translation(-self.position)
    }

    pub fn view_to_world_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from(self.orientation)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection.matrix()
    }

    pub fn inverse_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix()
            .invert()
            .unwrap_or_else(Matrix4::identity)
    }

    /// Transforms a world point into camera space.
    pub fn world_to_view(&self, point: Vector3<f32>) -> Vector3<f32> {
        (self.view_matrix() * point.extend(1.0)).truncate()
    }

    /// Distance from the camera to the pivot along the view axis.
    pub fn pivot_depth(&self) -> f32 {
        -self.world_to_view(self.pivot).z
    }

    pub fn pivot_distance(&self) -> f32 {
        (self.pivot - self.position).magnitude()
    }

    /// Re-places the pivot `distance` units in front of the camera.
    pub fn set_pivot_ahead(&mut self, distance: f32) {
        self.pivot = self.position + self.forward() * distance;
    }

    /// Turns the camera around the pivot: `yaw` about world +Y, then `pitch`
    /// about the camera's right axis. Pitch that would bring the view direction
    /// closer than `pitch_limit` to straight up or down is dropped.
    pub fn orbit(&mut self, yaw: f32, pitch: f32, pitch_limit: f32) {
        let offset = self.position - self.pivot;
        let (orientation, offset) = self.turned(offset, yaw, pitch, pitch_limit);
        self.orientation = orientation;
        self.position = self.pivot + offset;
    }

    /// Turns the camera in place, keeping the pivot at the same distance ahead.
    pub fn rotate_in_place(&mut self, yaw: f32, pitch: f32, pitch_limit: f32) {
        let distance = self.pivot_distance();
        let (orientation, _) = self.turned(Vector3::zero(), yaw, pitch, pitch_limit);
        self.orientation = orientation;
        self.set_pivot_ahead(distance);
    }

    /// Moves camera and pivot together by a world-space offset.
    pub fn pan(&mut self, offset: Vector3<f32>) {
        self.position += offset;
        self.pivot += offset;
    }

    /// Moves camera and pivot along the view direction.
    pub fn advance(&mut self, distance: f32) {
        let offset = self.forward() * distance;
        self.pan(offset);
    }

    /// Multiplies the vertical field of view by `factor`, within the bounds.
    /// Returns whether the field of view changed.
    pub fn zoom_fov(&mut self, factor: f32, min: Rad<f32>, max: Rad<f32>) -> bool {
        let before = self.projection.fovy;
        let fovy = (before.0 * factor).clamp(min.0, max.0);
        self.projection.fovy = Rad(fovy);
        (fovy - before.0).abs() > f32::EPSILON
    }

    fn turned(
        &self,
        offset: Vector3<f32>,
        yaw: f32,
        pitch: f32,
        pitch_limit: f32,
    ) -> (Quaternion<f32>, Vector3<f32>) {
        let yaw_rotation = Quaternion::from_axis_angle(Vector3::unit_y(), Rad(yaw));
        let mut orientation = yaw_rotation * self.orientation;
        let mut offset = yaw_rotation.rotate_vector(offset);

        let right = orientation.rotate_vector(Vector3::unit_x());
        let pitch_rotation = Quaternion::from_axis_angle(right.normalize(), Rad(pitch));
        let pitched = pitch_rotation * orientation;
        let forward = pitched.rotate_vector(-Vector3::unit_z());
        if forward.y.abs() < pitch_limit {
            orientation = pitched;
            offset = pitch_rotation.rotate_vector(offset);
        }

        (orientation.normalize(), offset)
    }
}

/// Orientation looking along `direction` with world +Y up.
fn look_orientation(direction: Vector3<f32>) -> Quaternion<f32> {
    if direction.magnitude2() <= f32::EPSILON {
        return Quaternion::one();
    }
    let forward = direction.normalize();
    let mut right = forward.cross(Vector3::unit_y());
    if right.magnitude2() <= 1e-8 {
        // Looking straight up or down
        right = Vector3::unit_x();
    }
    let right = right.normalize();
    let up = right.cross(forward);
    Quaternion::from(Matrix3::from_cols(right, up, -forward)).normalize()
}
