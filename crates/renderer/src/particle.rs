use bytemuck::{Pod, Zeroable};
use rand::Rng;

/// Half-width of the symmetric uniform range each velocity component is
/// drawn from at initialisation (NDC units per frame).
pub const VELOCITY_RANGE: f32 = 0.01;

/// Per-frame probability that a particle's color is rerolled.
pub const GLITCH_PROBABILITY: f64 = 0.5;

/// One simulated point sourced from one avatar pixel.
///
/// The struct layout is the GPU vertex layout: the particle vector is
/// uploaded as-is each frame. Velocity rides along in the buffer even though
/// the shader never reads it; splitting it out would buy 8 bytes per particle
/// at the cost of a second upload per frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Particle {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub color: [f32; 4],
}

impl Particle {
    const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    /// Vertex buffer layout matching the attribute locations in
    /// `shaders/particle.wgsl`.
    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Particle>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Fixed-size particle collection, one particle per avatar pixel.
///
/// The collection length is decided once from the avatar dimensions and never
/// changes afterwards; `step` mutates the particles in place. Insertion order
/// is a row-major scan of the source image and doubles as the draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: u32,
    height: u32,
}

impl ParticleField {
    /// Builds the field for a `width x height` avatar.
    ///
    /// Pixel `(x, y)` maps to the normalized device coordinate
    /// `(2x/W - 1, 2y/H - 1)`; velocity is sampled per axis from
    /// `±VELOCITY_RANGE`; every particle starts opaque white.
    pub fn from_avatar<R: Rng>(width: u32, height: u32, rng: &mut R) -> Self {
        let mut particles = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let position = [
                    x as f32 / width as f32 * 2.0 - 1.0,
                    y as f32 / height as f32 * 2.0 - 1.0,
                ];
                let velocity = [
                    rng.gen_range(-VELOCITY_RANGE..=VELOCITY_RANGE),
                    rng.gen_range(-VELOCITY_RANGE..=VELOCITY_RANGE),
                ];
                particles.push(Particle {
                    position,
                    velocity,
                    color: [1.0, 1.0, 1.0, 1.0],
                });
            }
        }
        Self {
            particles,
            width,
            height,
        }
    }

    /// Advances every particle by one frame.
    ///
    /// Position integrates velocity without clamping; particles drift out of
    /// the visible range over long sessions, which is the intended look. Each
    /// particle independently rerolls its color with `GLITCH_PROBABILITY`.
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        for particle in &mut self.particles {
            particle.position[0] += particle.velocity[0];
            particle.position[1] += particle.velocity[1];

            if rng.gen_bool(GLITCH_PROBABILITY) {
                particle.color = [rng.gen(), rng.gen(), rng.gen(), 1.0];
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn field_covers_every_pixel_in_row_major_order() {
        let mut rng = seeded();
        let field = ParticleField::from_avatar(3, 2, &mut rng);
        assert_eq!(field.len(), 6);

        for y in 0..2u32 {
            for x in 0..3u32 {
                let particle = field.particles()[(y * 3 + x) as usize];
                let expected = [
                    x as f32 / 3.0 * 2.0 - 1.0,
                    y as f32 / 2.0 * 2.0 - 1.0,
                ];
                assert_eq!(particle.position, expected);
                assert_eq!(particle.color, [1.0, 1.0, 1.0, 1.0]);
                assert!(particle.velocity[0].abs() <= VELOCITY_RANGE);
                assert!(particle.velocity[1].abs() <= VELOCITY_RANGE);
            }
        }
    }

    #[test]
    fn two_by_two_grid_positions() {
        let mut rng = seeded();
        let field = ParticleField::from_avatar(2, 2, &mut rng);
        let positions: Vec<[f32; 2]> = field
            .particles()
            .iter()
            .map(|particle| particle.position)
            .collect();
        assert_eq!(
            positions,
            vec![[-1.0, -1.0], [0.0, -1.0], [-1.0, 0.0], [0.0, 0.0]]
        );
    }

    #[test]
    fn step_adds_velocity_componentwise() {
        let mut rng = seeded();
        let mut field = ParticleField::from_avatar(8, 8, &mut rng);
        let before = field.clone();

        field.step(&mut rng);

        for (after, before) in field.particles().iter().zip(before.particles()) {
            assert_eq!(after.position[0], before.position[0] + before.velocity[0]);
            assert_eq!(after.position[1], before.position[1] + before.velocity[1]);
            assert_eq!(after.velocity, before.velocity);
        }
    }

    #[test]
    fn positions_drift_outside_ndc_without_clamping() {
        let mut rng = seeded();
        let mut field = ParticleField::from_avatar(16, 16, &mut rng);
        for _ in 0..500 {
            field.step(&mut rng);
        }

        let escaped = field
            .particles()
            .iter()
            .any(|particle| particle.position[0].abs() > 1.0 || particle.position[1].abs() > 1.0);
        assert!(escaped, "expected at least one particle past the NDC range");
    }

    #[test]
    fn glitch_rerolls_about_half_the_colors() {
        let mut rng = seeded();
        let mut field = ParticleField::from_avatar(100, 100, &mut rng);
        field.step(&mut rng);

        let changed = field
            .particles()
            .iter()
            .filter(|particle| particle.color != [1.0, 1.0, 1.0, 1.0])
            .count();
        assert!(
            (4500..=5500).contains(&changed),
            "expected ~50% of 10000 colors rerolled, got {changed}"
        );
    }

    #[test]
    fn rerolled_colors_are_opaque_and_in_range() {
        let mut rng = seeded();
        let mut field = ParticleField::from_avatar(64, 64, &mut rng);
        field.step(&mut rng);

        for particle in field.particles() {
            let [r, g, b, a] = particle.color;
            assert_eq!(a, 1.0);
            for channel in [r, g, b] {
                assert!((0.0..=1.0).contains(&channel));
            }
        }
    }

    #[test]
    fn zero_dimension_yields_empty_field() {
        let mut rng = seeded();
        assert!(ParticleField::from_avatar(0, 7, &mut rng).is_empty());
        assert!(ParticleField::from_avatar(7, 0, &mut rng).is_empty());
        assert!(ParticleField::from_avatar(0, 0, &mut rng).is_empty());
    }

    #[test]
    fn same_seed_reproduces_field_and_step() {
        let mut first = ParticleField::from_avatar(10, 10, &mut seeded());
        let mut second = ParticleField::from_avatar(10, 10, &mut seeded());
        assert_eq!(first, second);

        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        first.step(&mut rng_a);
        second.step(&mut rng_b);
        assert_eq!(first, second);
    }

    #[test]
    fn vertex_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<Particle>(), 32);

        let layout = Particle::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes.len(), 3);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[1].offset, 8);
        assert_eq!(layout.attributes[2].offset, 16);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[1].shader_location, 1);
        assert_eq!(layout.attributes[2].shader_location, 2);
    }
}
