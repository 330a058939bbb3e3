use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Screen-space camera: world units are pixels, origin top-left, y down.
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
    pub viewport: (u32, u32),
}

impl Camera2D {
    /// Centered on the viewport so that (0, 0) is the top-left corner.
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            position: Vec2::new(viewport_width as f32 * 0.5, viewport_height as f32 * 0.5),
            zoom: 1.0,
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let half_w = (self.viewport.0 as f32) / (2.0 * self.zoom);
        let half_h = (self.viewport.1 as f32) / (2.0 * self.zoom);

        // bottom/top swapped relative to a y-up projection.
        let proj = Mat4::orthographic_rh(
            self.position.x - half_w,
            self.position.x + half_w,
            self.position.y + half_h,
            self.position.y - half_h,
            -1.0,
            1.0,
        );

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec4;

    fn project(camera: &Camera2D, x: f32, y: f32) -> Vec4 {
        let m = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);
        m * Vec4::new(x, y, 0.0, 1.0)
    }

    #[test]
    fn top_left_pixel_maps_to_top_left_of_clip_space() {
        let camera = Camera2D::new(640, 480);
        let clip = project(&camera, 0.0, 0.0);
        assert_relative_eq!(clip.x, -1.0);
        assert_relative_eq!(clip.y, 1.0);
    }

    #[test]
    fn bottom_right_pixel_maps_to_bottom_right_of_clip_space() {
        let camera = Camera2D::new(640, 480);
        let clip = project(&camera, 640.0, 480.0);
        assert_relative_eq!(clip.x, 1.0);
        assert_relative_eq!(clip.y, -1.0);
    }

    #[test]
    fn center_maps_to_origin() {
        let camera = Camera2D::new(640, 480);
        let clip = project(&camera, 320.0, 240.0);
        assert_relative_eq!(clip.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(clip.y, 0.0, epsilon = 1e-6);
    }
}
