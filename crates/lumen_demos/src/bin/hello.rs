//! A colored triangle that follows the cursor.
//!
//! Escape or Q quits.

use std::process::ExitCode;

use anyhow::{anyhow, Context as _};
use bytemuck::{Pod, Zeroable};
use lumen_app::{close_on_quit_key, App, AppContext, KeyCode, KeyInput, LumenApp};
use lumen_demos::{run_demo, shader_path};
use lumen_gl::glow::{self, HasContext};
use lumen_gl::{create_shader_program, Program, ProgramSources};

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
}

const TRIANGLE: [Vertex; 3] = [
    Vertex { position: [0.0, 0.5, 0.0], color: [1.0, 0.0, 0.0] },
    Vertex { position: [-0.5, -0.5, 0.0], color: [0.0, 1.0, 0.0] },
    Vertex { position: [0.5, -0.5, 0.0], color: [0.0, 0.0, 1.0] },
];

/// [`TRIANGLE`]'s colors on a triangle centred on `(x, y)` in NDC.
fn triangle_at(x: f32, y: f32) -> [Vertex; 3] {
    let [top, left, right] = TRIANGLE;
    [
        Vertex { position: [x, y + 0.5, 0.0], ..top },
        Vertex { position: [x - 0.25, y - 0.5, 0.0], ..left },
        Vertex { position: [x + 0.25, y - 0.5, 0.0], ..right },
    ]
}

struct Hello {
    program: Program<glow::Program>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertices: [Vertex; 3],
    // vertex buffer is behind `vertices`
    dirty: bool,
}

impl Hello {
    fn new(gl: &glow::Context) -> anyhow::Result<Self> {
        let sources = ProgramSources::new(
            shader_path("hello.vert.glsl"),
            shader_path("hello.frag.glsl"),
        );
        let program = create_shader_program(gl, &sources).context("triangle program")?;

        let stride = std::mem::size_of::<Vertex>() as i32;
        // SAFETY: the shell made this context current on the calling thread.
        let (vao, vbo) = unsafe {
            let vao = gl.create_vertex_array().map_err(|e| anyhow!(e))?;
            let vbo = gl.create_buffer().map_err(|e| anyhow!(e))?;
            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&TRIANGLE),
                glow::DYNAMIC_DRAW,
            );
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
            gl.enable_vertex_attrib_array(1);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_vertex_array(None);
            (vao, vbo)
        };

        Ok(Self {
            program,
            vao,
            vbo,
            vertices: TRIANGLE,
            dirty: false,
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

impl LumenApp for Hello {
    fn render(&mut self, ctx: &mut AppContext) {
        let gl = ctx.gl;
        // SAFETY: hooks run on the thread that owns the current context.
        unsafe {
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT);

            if self.dirty {
                gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
                gl.buffer_sub_data_u8_slice(
                    glow::ARRAY_BUFFER,
                    0,
                    bytemuck::cast_slice(&self.vertices),
                );
                gl.bind_buffer(glow::ARRAY_BUFFER, None);
                self.dirty = false;
            }

            gl.use_program(Some(self.program.raw()));
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(glow::TRIANGLES, 0, 3);
        }
    }

    fn on_key(&mut self, ctx: &mut AppContext, input: KeyInput) {
        if input.pressed(KeyCode::KeyQ) {
            ctx.request_close();
        }
        close_on_quit_key(ctx, &input);
    }

    fn on_cursor_pos(&mut self, ctx: &mut AppContext, x: f64, y: f64) {
        if ctx.width() == 0 || ctx.height() == 0 {
            return;
        }
        let ndc_x = (2.0 * x / f64::from(ctx.width()) - 1.0) as f32;
        let ndc_y = (1.0 - 2.0 * y / f64::from(ctx.height())) as f32;
        self.vertices = triangle_at(ndc_x, ndc_y);
        self.dirty = true;
    }
}

fn main() -> ExitCode {
    run_demo(|| {
        let mut shell = App::new()
            .with_title("Hello World")
            .with_size(640, 480)
            .with_gl_version(3, 3)
            .build()?;
        let mut hello = Hello::new(shell.gl())?;
        shell.run(&mut hello);
        hello.destroy(shell.gl());
        Ok(())
    })
}
