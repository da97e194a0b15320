use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// RGBA8 image kept on the CPU until the renderer uploads it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Color([f32; 3]),
    /// Wrapped around the view as an equirectangular panorama.
    Equirect(TextureData),
}

impl Background {
    pub const WHITE: Self = Background::Color([1.0, 1.0, 1.0]);
}

/// Radial gradient settings for the showcase backdrop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientConfig {
    pub size: u32,
    pub center: [u8; 3],
    pub edge: [u8; 3],
    /// Uniform brightness noise in `[-amplitude, amplitude)` per pixel.
    pub noise_amplitude: f32,
    pub seed: u64,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            size: 512,
            center: [0xde, 0xe2, 0xe6],
            edge: [0xff, 0xff, 0xff],
            noise_amplitude: 5.0,
            seed: 0x5eed,
        }
    }
}

/// Square radial gradient from `center` (at the middle) to `edge` (at half
/// the width and beyond), with the same noise added to all three channels.
pub fn gradient_texture(config: &GradientConfig) -> TextureData {
    let size = config.size.max(1);
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);

    let half = size as f32 / 2.0;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - half;
            let dy = y as f32 + 0.5 - half;
            let t = ((dx * dx + dy * dy).sqrt() / half).min(1.0);

            let noise = if config.noise_amplitude > 0.0 {
                rng.random_range(-config.noise_amplitude..config.noise_amplitude)
            } else {
                0.0
            };

            for channel in 0..3 {
                let c = f32::from(config.center[channel]);
                let e = f32::from(config.edge[channel]);
                let value = c + (e - c) * t + noise;
                rgba.push(value.round().clamp(0.0, 255.0) as u8);
            }
            rgba.push(255);
        }
    }

    TextureData {
        width: size,
        height: size,
        rgba,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> GradientConfig {
        GradientConfig {
            size: 64,
            noise_amplitude: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn center_is_grey_and_corners_white() {
        let texture = gradient_texture(&quiet());
        assert_eq!(texture.rgba.len(), 64 * 64 * 4);

        let [r, g, b, a] = texture.pixel(32, 32);
        assert!(r <= 0xdf && g <= 0xe3 && b <= 0xe7);
        assert_eq!(a, 255);
        assert_eq!(texture.pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(texture.pixel(63, 63), [255, 255, 255, 255]);
    }

    #[test]
    fn noise_stays_within_amplitude() {
        let clean = gradient_texture(&quiet());
        let noisy = gradient_texture(&GradientConfig {
            noise_amplitude: 5.0,
            ..quiet()
        });
        for (a, b) in clean.rgba.iter().zip(&noisy.rgba) {
            assert!((i16::from(*a) - i16::from(*b)).abs() <= 5);
        }
        assert_ne!(clean, noisy);
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let config = GradientConfig {
            size: 16,
            ..Default::default()
        };
        assert_eq!(gradient_texture(&config), gradient_texture(&config));
    }
}
