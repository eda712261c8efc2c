//! Projection matrices for the lessons that use `u_MVP`.

/// Orthographic projection that keeps a square a square in a `width` x `height` window.
///
/// The shorter axis spans `[-1, 1]`, the longer one is stretched to match the aspect.
pub fn ortho_for_window(width: u32, height: u32) -> glm::Mat4 {
    let width = width.max(1) as f32;
    let height = height.max(1) as f32;
    let (half_w, half_h) = if width >= height {
        (width / height, 1.0)
    } else {
        (1.0, height / width)
    };
    glm::ortho(-half_w, half_w, -half_h, half_h, -1.0, 1.0)
}

/// Model-view-projection for a flat scene: a model translation and no camera movement.
pub fn mvp(projection: &glm::Mat4, model_offset: glm::Vec3) -> glm::Mat4 {
    let view = glm::Mat4::identity();
    let model = glm::translate(&glm::Mat4::identity(), &model_offset);
    projection * view * model
}
