//! A cube seen through a free camera.
//!
//! W/S/A/D/Q/E move the camera, the arrow keys and Z/X rotate it.  Escape
//! quits.

use std::process::ExitCode;

use anyhow::{anyhow, Context as _};
use glam::{EulerRot, Mat4, Quat, Vec3};
use lumen_app::{close_on_quit_key, App, AppContext, KeyCode, KeyInput, LumenApp};
use lumen_demos::{run_demo, shader_path};
use lumen_gl::glow::{self, HasContext};
use lumen_gl::{create_shader_program, Program, ProgramSources};

const MOVE_STEP: f32 = 0.1;
const ROTATE_STEP_DEG: f32 = 1.0;

#[rustfmt::skip]
const CUBE: [f32; 108] = [
    -1.0,  1.0, -1.0,  -1.0, -1.0, -1.0,   1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,   1.0,  1.0, -1.0,  -1.0,  1.0, -1.0,
     1.0, -1.0, -1.0,   1.0, -1.0,  1.0,   1.0,  1.0, -1.0,
     1.0, -1.0,  1.0,   1.0,  1.0,  1.0,   1.0,  1.0, -1.0,
     1.0, -1.0,  1.0,  -1.0, -1.0,  1.0,   1.0,  1.0,  1.0,
    -1.0, -1.0,  1.0,  -1.0,  1.0,  1.0,   1.0,  1.0,  1.0,
    -1.0, -1.0,  1.0,  -1.0, -1.0, -1.0,  -1.0,  1.0,  1.0,
    -1.0, -1.0, -1.0,  -1.0,  1.0, -1.0,  -1.0,  1.0,  1.0,
    -1.0, -1.0,  1.0,   1.0, -1.0,  1.0,   1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,  -1.0, -1.0, -1.0,  -1.0, -1.0,  1.0,
    -1.0,  1.0, -1.0,   1.0,  1.0, -1.0,   1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,  -1.0,  1.0,  1.0,  -1.0,  1.0, -1.0,
];

/// Position plus pitch/yaw/roll in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Camera {
    position: Vec3,
    rotation: Vec3,
}

impl Camera {
    fn view(&self) -> Mat4 {
        let orientation = Quat::from_euler(
            EulerRot::ZYX,
            self.rotation.z,
            self.rotation.y,
            self.rotation.x,
        );
        // inverse of the camera transform: undo translation, then rotation
        Mat4::from_quat(orientation).transpose() * Mat4::from_translation(-self.position)
    }

    /// Apply one key step.  Returns false for keys the camera ignores.
    fn steer(&mut self, key: KeyCode) -> bool {
        let rot = ROTATE_STEP_DEG.to_radians();
        match key {
            KeyCode::KeyW => self.position.z -= MOVE_STEP,
            KeyCode::KeyS => self.position.z += MOVE_STEP,
            KeyCode::KeyA => self.position.x -= MOVE_STEP,
            KeyCode::KeyD => self.position.x += MOVE_STEP,
            KeyCode::KeyQ => self.position.y -= MOVE_STEP,
            KeyCode::KeyE => self.position.y += MOVE_STEP,
            KeyCode::ArrowUp => self.rotation.x += rot,
            KeyCode::ArrowDown => self.rotation.x -= rot,
            KeyCode::ArrowLeft => self.rotation.y += rot,
            KeyCode::ArrowRight => self.rotation.y -= rot,
            KeyCode::KeyZ => self.rotation.z += rot,
            KeyCode::KeyX => self.rotation.z -= rot,
            _ => return false,
        }
        true
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 8.0),
            rotation: Vec3::ZERO,
        }
    }
}

fn projection(aspect: f32) -> Mat4 {
    Mat4::perspective_rh_gl(60f32.to_radians(), aspect, 0.1, 1000.0)
}

struct Cube {
    program: Program<glow::Program>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    mv_location: Option<glow::UniformLocation>,
    p_location: Option<glow::UniformLocation>,
    camera: Camera,
    position: Vec3,
}

impl Cube {
    fn new(gl: &glow::Context) -> anyhow::Result<Self> {
        let sources = ProgramSources::new(
            shader_path("cube.vert.glsl"),
            shader_path("cube.frag.glsl"),
        );
        let program = create_shader_program(gl, &sources).context("cube program")?;

        // SAFETY: the shell made this context current on the calling thread.
        let (vao, vbo, mv_location, p_location) = unsafe {
            let vao = gl.create_vertex_array().map_err(|e| anyhow!(e))?;
            let vbo = gl.create_buffer().map_err(|e| anyhow!(e))?;
            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&CUBE),
                glow::STATIC_DRAW,
            );
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, 0, 0);
            gl.enable_vertex_attrib_array(0);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LEQUAL);

            let mv = gl.get_uniform_location(program.raw(), "mv_matrix");
            let p = gl.get_uniform_location(program.raw(), "p_matrix");
            (vao, vbo, mv, p)
        };
        if mv_location.is_none() || p_location.is_none() {
            log::warn!(target: "lumen::shader", "cube program is missing a matrix uniform");
        }

        Ok(Self {
            program,
            vao,
            vbo,
            mv_location,
            p_location,
            camera: Camera::default(),
            position: Vec3::new(0.0, -2.0, 0.0),
        })
    }

    fn destroy(self, gl: &glow::Context) {
        // SAFETY: same context as `new`.
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
        }
        self.program.delete(gl);
    }
}

impl LumenApp for Cube {
    fn render(&mut self, ctx: &mut AppContext) {
        let mv = self.camera.view() * Mat4::from_translation(self.position);
        let p = projection(ctx.aspect());

        let gl = ctx.gl;
        // SAFETY: hooks run on the thread that owns the current context.
        unsafe {
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.use_program(Some(self.program.raw()));
            gl.uniform_matrix_4_f32_slice(self.mv_location.as_ref(), false, &mv.to_cols_array());
            gl.uniform_matrix_4_f32_slice(self.p_location.as_ref(), false, &p.to_cols_array());

            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(glow::TRIANGLES, 0, 36);
        }
    }

    fn on_key(&mut self, ctx: &mut AppContext, input: KeyInput) {
        if input.action.is_down() && self.camera.steer(input.key) {
            log::debug!(
                target: "lumen::window",
                "camera at {:?}, rotation {:?}",
                self.camera.position,
                self.camera.rotation
            );
        }
        close_on_quit_key(ctx, &input);
    }
}

fn main() -> ExitCode {
    run_demo(|| {
        let mut shell = App::new().with_title("Cube").with_size(640, 480).build()?;
        let mut cube = Cube::new(shell.gl())?;
        shell.run(&mut cube);
        cube.destroy(shell.gl());
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_looks_down_negative_z() {
        let view = Camera::default().view();
        let cube = view.transform_point3(Vec3::new(0.0, -2.0, 0.0));
        assert!((cube - Vec3::new(0.0, -2.0, -8.0)).length() < 1e-5);
    }

    #[test]
    fn movement_keys_step_the_camera() {
        let mut camera = Camera::default();
        assert!(camera.steer(KeyCode::KeyW));
        assert!(camera.steer(KeyCode::KeyD));
        assert!(camera.steer(KeyCode::KeyQ));
        assert!((camera.position - Vec3::new(0.1, -0.1, 7.9)).length() < 1e-5);
        assert!(!camera.steer(KeyCode::KeyP));
    }

    #[test]
    fn rotation_keys_step_by_one_degree() {
        let mut camera = Camera::default();
        camera.steer(KeyCode::ArrowLeft);
        camera.steer(KeyCode::ArrowLeft);
        camera.steer(KeyCode::KeyX);
        assert!((camera.rotation.y - 2f32.to_radians()).abs() < 1e-6);
        assert!((camera.rotation.z + 1f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn projection_maps_near_plane_to_minus_one() {
        let p = projection(640.0 / 480.0);
        let ndc = p.project_point3(Vec3::new(0.0, 0.0, -0.1));
        assert!((ndc.z + 1.0).abs() < 1e-4);
    }
}
