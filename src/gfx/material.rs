//! Surface appearance of scene nodes.
//!
//! Gizmo handles swap between a dimmed normal material and a full-strength
//! highlight material as the cursor hovers or picks them.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub specular_exponent: f32,
    pub emissive: [f32; 3],
    pub opacity: f32,
}

impl Material {
    pub fn new(diffuse: [f32; 3]) -> Self {
        Self {
            ambient: [0.2, 0.2, 0.2],
            diffuse,
            specular: [0.5, 0.5, 0.5],
            specular_exponent: 15.0,
            emissive: [0.0, 0.0, 0.0],
            opacity: 1.0,
        }
    }

    /// Resting look of a solid handle: the axis color at 75%.
    pub fn handle(color: [f32; 3]) -> Self {
        Self::new(scale_color(color, 0.75))
    }

    /// Resting look of a ring or the scale ball: dimmed, glowing and translucent.
    pub fn translucent_handle(color: [f32; 3]) -> Self {
        Self {
            specular_exponent: 10.0,
            emissive: [0.3, 0.3, 0.3],
            opacity: 0.3,
            ..Self::handle(color)
        }
    }

    /// Hovered or picked handle: full color, opaque, sharper highlight.
    pub fn handle_highlight(color: [f32; 3]) -> Self {
        Self {
            specular: [1.0, 1.0, 1.0],
            specular_exponent: 25.0,
            ..Self::new(color)
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new([0.8, 0.8, 0.8])
    }
}

fn scale_color(color: [f32; 3], factor: f32) -> [f32; 3] {
    [color[0] * factor, color[1] * factor, color[2] * factor]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_materials() {
        let red = [1.0, 0.0, 0.0];
        assert_eq!(Material::handle(red).diffuse, [0.75, 0.0, 0.0]);
        assert_eq!(Material::handle_highlight(red).diffuse, red);
        assert_eq!(Material::translucent_handle(red).opacity, 0.3);
        assert_ne!(Material::handle(red), Material::handle_highlight(red));
    }
}
