use cloth_core::driver::FrameDriver;
use cloth_core::presets::MethodPreset;
use cloth_core::render::{line_indices, write_vertices, ClothVertex, DrawMode};
use cloth_core::{BendingLevel, Cloth, ClothConfig, ClothError, Impulse, Method};
use glam::{DVec2, DVec3};
use wasm_bindgen::prelude::*;

fn to_js(err: ClothError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct ClothWorld {
    cloth: Cloth,
    driver: FrameDriver,
    vertices: Vec<ClothVertex>,
    indices: Vec<u32>,
}

#[wasm_bindgen]
impl ClothWorld {
    #[wasm_bindgen(constructor)]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        nodes_in_width: usize,
        nodes_in_height: usize,
        width: f64,
        height: f64,
        method: u8,
        iterations: u32,
        bending_level: u8,
        time_step: f64,
    ) -> Result<ClothWorld, JsValue> {
        let config = ClothConfig::new()
            .with_nodes(nodes_in_width, nodes_in_height)
            .with_extent(DVec2::new(width, height))
            .with_method(Method::from_code(method).map_err(to_js)?)
            .with_iterations(iterations)
            .with_bending_level(BendingLevel::from_code(bending_level).map_err(to_js)?)
            .with_time_step(time_step);
        let cloth = Cloth::new(config).map_err(to_js)?;

        web_sys::console::log_1(
            &format!(
                "WASM ClothWorld created: {} nodes, {} constraints, {} springs ({})",
                cloth.particles().count,
                cloth.constraints().len(),
                cloth.springs().len(),
                cloth.method().name()
            )
            .into(),
        );

        let driver = FrameDriver::new(time_step);
        let mut world = ClothWorld {
            cloth,
            driver,
            vertices: Vec::new(),
            indices: Vec::new(),
        };
        world.cloth.compute_normals();
        world.write_output();
        world.write_indices();
        Ok(world)
    }

    /// Advance one frame of `dt` seconds (if not paused) and refresh the
    /// vertex buffer. A non-positive `dt` keeps the previous frame length.
    /// Returns the elapsed wall time in milliseconds.
    #[wasm_bindgen]
    pub fn step(&mut self, dt: f64) -> f32 {
        let start = js_sys::Date::now();
        if dt > 0.0 && dt.is_finite() {
            self.driver.frame_dt = dt;
        }
        if let Some(stats) = self.driver.advance(&mut self.cloth) {
            if !stats.finite {
                web_sys::console::warn_1(
                    &format!("{} produced non-finite positions", stats.method.name()).into(),
                );
            }
            self.write_output();
        }
        let elapsed = js_sys::Date::now() - start;
        elapsed as f32
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.driver.reset(&mut self.cloth);
        self.cloth.compute_normals();
        self.write_output();
    }

    #[wasm_bindgen]
    pub fn toggle_pause(&mut self) {
        self.driver.toggle_pause();
    }

    #[wasm_bindgen]
    pub fn request_step(&mut self) {
        self.driver.request_step();
    }

    #[wasm_bindgen]
    pub fn is_paused(&self) -> bool {
        self.driver.is_paused()
    }

    /// Direction codes: 0 up, 1 down, 2 front, 3 back, 4 left-up, 5 right-up.
    #[wasm_bindgen]
    pub fn apply_impulse(&mut self, direction: u8) -> Result<(), JsValue> {
        let impulse = Impulse::from_code(direction).map_err(to_js)?;
        self.cloth.apply_impulse(impulse, None);
        Ok(())
    }

    /// Switch method, keeping the grid; iterations follow the method's preset.
    #[wasm_bindgen]
    pub fn set_method(&mut self, method: u8) -> Result<(), JsValue> {
        let method = Method::from_code(method).map_err(to_js)?;
        self.cloth.set_method(method);
        self.cloth.compute_normals();
        self.write_output();
        Ok(())
    }

    /// Switch to the full preset of a method: iterations, grid size and
    /// bending level.
    #[wasm_bindgen]
    pub fn apply_preset(&mut self, method: u8) -> Result<(), JsValue> {
        let method = Method::from_code(method).map_err(to_js)?;
        self.cloth.apply_preset(MethodPreset::for_method(method));
        self.cloth.compute_normals();
        self.write_output();
        self.write_indices();
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_iterations(&mut self, iterations: u32) {
        self.cloth.set_iterations(iterations);
    }

    /// Draw mode codes: 0 nodes, 1 lines, 2 faces.
    #[wasm_bindgen]
    pub fn set_draw_mode(&mut self, mode: u8) -> Result<(), JsValue> {
        let mode = DrawMode::from_code(mode).map_err(to_js)?;
        self.cloth.set_draw_mode(mode);
        self.write_indices();
        Ok(())
    }

    #[wasm_bindgen]
    pub fn draw_mode(&self) -> u8 {
        self.cloth.draw_mode() as u8
    }

    /// Moves the render offset only; the simulation keeps running from
    /// its current state.
    #[wasm_bindgen]
    pub fn set_origin(&mut self, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        self.cloth.set_origin(DVec3::new(x, y, z)).map_err(to_js)?;
        self.write_output();
        Ok(())
    }

    #[wasm_bindgen]
    pub fn get_vertex_buffer_ptr(&self) -> *const f32 {
        self.vertices.as_ptr() as *const f32
    }

    #[wasm_bindgen]
    pub fn get_vertex_buffer_byte_length(&self) -> usize {
        bytemuck::cast_slice::<ClothVertex, u8>(&self.vertices).len()
    }

    #[wasm_bindgen]
    pub fn get_index_buffer_ptr(&self) -> *const u32 {
        self.indices.as_ptr()
    }

    #[wasm_bindgen]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[wasm_bindgen]
    pub fn node_count(&self) -> usize {
        self.cloth.particles().count
    }

    #[wasm_bindgen]
    pub fn method_name(&self) -> String {
        self.cloth.method().name().to_string()
    }
}

impl ClothWorld {
    fn write_output(&mut self) {
        write_vertices(&self.cloth, &mut self.vertices);
    }

    fn write_indices(&mut self) {
        self.indices = match self.cloth.draw_mode() {
            DrawMode::Nodes => (0..self.cloth.particles().count as u32).collect(),
            DrawMode::Lines => line_indices(self.cloth.faces()),
            DrawMode::Faces => self.cloth.faces().to_vec(),
        };
    }
}
