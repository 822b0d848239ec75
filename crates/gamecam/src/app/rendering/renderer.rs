use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::Scene;
use crate::Color;

use super::{Frame, Viewport};

/// Owns the window's pixel surface and hands it to scenes as a [`Frame`].
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            self.viewport = Viewport { width, height };
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width.max(1), height.max(1), window);
        Pixels::new(width.max(1), height.max(1), surface)
    }

    pub(crate) fn render_scene(
        &mut self,
        scene: &mut dyn Scene,
        clear_color: Color,
    ) -> Result<(), Error> {
        if self.viewport.is_empty() {
            return Ok(());
        }

        let mut frame = Frame::new(
            self.pixels.frame_mut(),
            self.viewport.width,
            self.viewport.height,
        );
        frame.clear(clear_color);
        scene.render(&mut frame);

        self.pixels.render()
    }
}

