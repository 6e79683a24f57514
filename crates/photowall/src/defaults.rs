//! Built-in shader pair used when the command line supplies none.
//!
//! The vertex stage consumes the per-draw `QuadParams` block (placement
//! matrix, distortion matrix, time, pointer) and adds a gentle time-driven
//! ripple along x. The fragment stage samples the image texture bound at
//! group 1. Together they define the uniform interface any replacement pair
//! must also honour.

pub const DEFAULT_VERTEX: &str = r"#version 450

layout(location = 0) in vec2 a_position;
layout(location = 1) in vec2 a_tex_coord;

layout(location = 0) out vec2 v_tex_coord;

layout(std140, set = 0, binding = 0) uniform QuadParams {
    mat4 u_matrix;
    mat4 u_perspective;
    float u_time;
    vec2 u_mouse;
} params;

void main() {
    v_tex_coord = a_tex_coord;
    vec2 pos = a_position;
    pos.y += sin(params.u_time * 1.2 + a_position.x * 3.0) * 0.015;
    gl_Position = params.u_perspective * params.u_matrix * vec4(pos, 0.0, 1.0);
}
";

pub const DEFAULT_FRAGMENT: &str = r"#version 450

layout(location = 0) in vec2 v_tex_coord;

layout(location = 0) out vec4 out_color;

layout(set = 1, binding = 0) uniform texture2D t_image;
layout(set = 1, binding = 1) uniform sampler s_image;

void main() {
    out_color = texture(sampler2D(t_image, s_image), v_tex_coord);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_shaders_declare_the_uniform_interface() {
        assert!(DEFAULT_VERTEX.contains("uniform QuadParams"));
        assert!(DEFAULT_VERTEX.contains("u_perspective"));
        assert!(DEFAULT_FRAGMENT.contains("set = 1, binding = 0"));
        assert!(DEFAULT_FRAGMENT.contains("set = 1, binding = 1"));
    }
}
