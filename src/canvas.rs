//! Software drawing surface rendered to the terminal with half-block cells.
//!
//! Pixels are addressed in "canvas" coordinates: one column per terminal
//! column, two rows per terminal row. Shapes are sampled at pixel centres
//! through the inverse of the current transform and blended source-over with
//! the current global alpha.

use std::io::{self, Write};

pub type Rgb = (u8, u8, u8);

pub const BLACK: Rgb = (0, 0, 0);
pub const WHITE: Rgb = (255, 255, 255);

#[derive(Clone, Copy, Debug, PartialEq)]
struct DrawState {
    alpha: f32,
    tx: f32,
    ty: f32,
    rotation: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            tx: 0.0,
            ty: 0.0,
            rotation: 0.0,
        }
    }
}

pub struct Canvas {
    width: usize,
    height: usize,
    background: Rgb,
    pixels: Vec<[f32; 3]>,
    state: DrawState,
    stack: Vec<DrawState>,
    output_buf: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: Rgb) -> Self {
        Self {
            width,
            height,
            background,
            pixels: vec![to_linear(background); width * height],
            state: DrawState::default(),
            stack: Vec::new(),
            output_buf: Vec::with_capacity(width * height * 25),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Resizing discards the bitmap and resets the drawing state.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![to_linear(self.background); width * height];
        self.state = DrawState::default();
        self.stack.clear();
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(to_rgb(self.pixels[y * self.width + x]))
        } else {
            None
        }
    }

    pub fn alpha(&self) -> f32 {
        self.state.alpha
    }

    pub fn save(&mut self) {
        self.stack.push(self.state);
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    /// Runs `f` between a `save` and a `restore`.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Canvas) -> R) -> R {
        self.save();
        let result = f(self);
        self.restore();
        result
    }

    /// Out-of-range values are clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        let (s, c) = self.state.rotation.sin_cos();
        self.state.tx += c * dx - s * dy;
        self.state.ty += s * dx + c * dy;
    }

    pub fn rotate(&mut self, angle: f32) {
        self.state.rotation += angle;
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.fill_shape((x, y, x + w, y + h), |lx, ly| {
            (lx >= x && lx < x + w && ly >= y && ly < y + h).then_some(color)
        });
    }

    /// Fills a disc whose colour follows `stops` (offset in `[0, 1]`, colour)
    /// from the centre outwards.
    pub fn fill_radial_disc(&mut self, cx: f32, cy: f32, radius: f32, stops: &[(f32, Rgb)]) {
        self.fill_shape(
            (cx - radius, cy - radius, cx + radius, cy + radius),
            |lx, ly| {
                let dist = ((lx - cx).powi(2) + (ly - cy).powi(2)).sqrt();
                (dist <= radius).then(|| gradient_at(stops, dist / radius))
            },
        );
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, line_width: f32, color: Rgb) {
        let half = line_width / 2.0;
        let outer = radius + half;
        self.fill_shape(
            (cx - outer, cy - outer, cx + outer, cy + outer),
            |lx, ly| {
                let dist = ((lx - cx).powi(2) + (ly - cy).powi(2)).sqrt();
                ((dist - radius).abs() <= half).then_some(color)
            },
        );
    }

    /// Paints `color` at `alpha` over the whole surface, ignoring the
    /// current transform.
    pub fn fade(&mut self, color: Rgb, alpha: f32) {
        let src = to_linear(color);
        let a = alpha.clamp(0.0, 1.0);
        for p in &mut self.pixels {
            blend(p, src, a);
        }
    }

    fn fill_shape(&mut self, bounds: (f32, f32, f32, f32), shader: impl Fn(f32, f32) -> Option<Rgb>) {
        let alpha = self.state.alpha;
        if alpha <= 0.0 || self.width == 0 || self.height == 0 {
            return;
        }

        let (x0, y0, x1, y1) = bounds;
        let corners = [
            self.to_device(x0, y0),
            self.to_device(x1, y0),
            self.to_device(x0, y1),
            self.to_device(x1, y1),
        ];
        let min_x = corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|c| c.0).fold(f32::NEG_INFINITY, f32::max);
        let min_y = corners.iter().map(|c| c.1).fold(f32::INFINITY, f32::min);
        let max_y = corners.iter().map(|c| c.1).fold(f32::NEG_INFINITY, f32::max);

        if max_x < 0.0 || max_y < 0.0 || min_x >= self.width as f32 || min_y >= self.height as f32 {
            return;
        }

        let px0 = min_x.floor().max(0.0) as usize;
        let py0 = min_y.floor().max(0.0) as usize;
        let px1 = (max_x.ceil() as usize).min(self.width - 1);
        let py1 = (max_y.ceil() as usize).min(self.height - 1);

        for py in py0..=py1 {
            for px in px0..=px1 {
                let (lx, ly) = self.to_local(px as f32 + 0.5, py as f32 + 0.5);
                if let Some(color) = shader(lx, ly) {
                    let idx = py * self.width + px;
                    blend(&mut self.pixels[idx], to_linear(color), alpha);
                }
            }
        }
    }

    fn to_device(&self, lx: f32, ly: f32) -> (f32, f32) {
        let (s, c) = self.state.rotation.sin_cos();
        (self.state.tx + c * lx - s * ly, self.state.ty + s * lx + c * ly)
    }

    fn to_local(&self, px: f32, py: f32) -> (f32, f32) {
        let (s, c) = self.state.rotation.sin_cos();
        let dx = px - self.state.tx;
        let dy = py - self.state.ty;
        (c * dx + s * dy, -s * dx + c * dy)
    }

    /// Encodes the surface as rows of `▄` cells: background colour for the
    /// upper pixel, foreground colour for the lower one.
    pub fn present<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top_color: Option<Rgb> = None;
        let mut prev_bot_color: Option<Rgb> = None;

        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top_idx = y * self.width + x;
                let bot_idx = if y + 1 < self.height {
                    (y + 1) * self.width + x
                } else {
                    top_idx
                };

                let top_color = to_rgb(self.pixels[top_idx]);
                let bot_color = to_rgb(self.pixels[bot_idx]);

                if prev_top_color != Some(top_color) {
                    write!(
                        self.output_buf,
                        "\x1b[48;2;{};{};{}m",
                        top_color.0, top_color.1, top_color.2
                    )?;
                    prev_top_color = Some(top_color);
                }
                if prev_bot_color != Some(bot_color) {
                    write!(
                        self.output_buf,
                        "\x1b[38;2;{};{};{}m",
                        bot_color.0, bot_color.1, bot_color.2
                    )?;
                    prev_bot_color = Some(bot_color);
                }

                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top_color = None;
            prev_bot_color = None;
            if y + 2 < self.height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)
    }
}

fn to_linear(color: Rgb) -> [f32; 3] {
    [color.0 as f32, color.1 as f32, color.2 as f32]
}

fn to_rgb(p: [f32; 3]) -> Rgb {
    (
        p[0].round().clamp(0.0, 255.0) as u8,
        p[1].round().clamp(0.0, 255.0) as u8,
        p[2].round().clamp(0.0, 255.0) as u8,
    )
}

fn blend(dst: &mut [f32; 3], src: [f32; 3], alpha: f32) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d = *d * (1.0 - alpha) + s * alpha;
    }
}

fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    (
        (a.0 as f32 * (1.0 - t) + b.0 as f32 * t) as u8,
        (a.1 as f32 * (1.0 - t) + b.1 as f32 * t) as u8,
        (a.2 as f32 * (1.0 - t) + b.2 as f32 * t) as u8,
    )
}

fn gradient_at(stops: &[(f32, Rgb)], t: f32) -> Rgb {
    let Some(&(first_offset, first_color)) = stops.first() else {
        return BLACK;
    };
    if t <= first_offset {
        return first_color;
    }
    for pair in stops.windows(2) {
        let (o0, c0) = pair[0];
        let (o1, c1) = pair[1];
        if t <= o1 {
            let span = o1 - o0;
            let local = if span > 0.0 { (t - o0) / span } else { 1.0 };
            return lerp(c0, c1, local);
        }
    }
    stops[stops.len() - 1].1
}
