use std::path::Path;

use glow::HasContext;
use log::info;

/// GPU texture handle plus its current pixel dimensions.
///
/// Starts life as a 1x1 opaque-blue placeholder so an actor can be drawn
/// before (or without) a real image; [`Texture::open`] replaces the pixels
/// and the recorded size in place.
#[derive(Debug, Clone, Copy)]
pub struct Texture {
    pub handle: glow::NativeTexture,
    pub width: u32,
    pub height: u32,
}

const PLACEHOLDER_PIXEL: [u8; 4] = [0, 0, 255, 255];

impl Texture {
    /// Allocates a texture holding the single placeholder pixel.
    pub fn placeholder(gl: &glow::Context) -> Result<Self, String> {
        unsafe {
            let handle = gl.create_texture()?;
            gl.bind_texture(glow::TEXTURE_2D, Some(handle));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                1,
                1,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(&PLACEHOLDER_PIXEL),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);
            Ok(Self {
                handle,
                width: 1,
                height: 1,
            })
        }
    }

    /// Decodes an image file and uploads it over this texture's pixels.
    ///
    /// Power-of-two images get mipmaps; anything else is clamped and
    /// linearly filtered, which is all a non-power-of-two texture supports
    /// on small GL profiles.
    pub fn open(&mut self, gl: &glow::Context, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let image = image::open(path)?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        info!("loaded texture {} ({width}x{height})", path.display());

        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(self.handle));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(rgba.as_raw()),
            );
            if is_power_of_two(width) && is_power_of_two(height) {
                gl.generate_mipmap(glow::TEXTURE_2D);
            } else {
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_WRAP_S,
                    glow::CLAMP_TO_EDGE as i32,
                );
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_WRAP_T,
                    glow::CLAMP_TO_EDGE as i32,
                );
            }
            // The placeholder pinned NEAREST; real pixels get a filter that
            // actually samples the mipmaps when they exist.
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                min_filter_for(width, height) as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        self.width = width;
        self.height = height;
        Ok(())
    }
}

fn is_power_of_two(value: u32) -> bool {
    value != 0 && value & (value - 1) == 0
}

/// Minification filter for a freshly uploaded image: mipmap-aware when
/// mipmaps were generated, plain linear otherwise.
fn min_filter_for(width: u32, height: u32) -> u32 {
    if is_power_of_two(width) && is_power_of_two(height) {
        glow::LINEAR_MIPMAP_LINEAR
    } else {
        glow::LINEAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_two_check() {
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(256));
        assert!(!is_power_of_two(0));
        assert!(!is_power_of_two(640));
    }

    #[test]
    fn mipmapped_images_get_a_mipmap_sampling_filter() {
        assert_eq!(min_filter_for(256, 256), glow::LINEAR_MIPMAP_LINEAR);
        assert_eq!(min_filter_for(64, 128), glow::LINEAR_MIPMAP_LINEAR);
        assert_eq!(min_filter_for(640, 480), glow::LINEAR);
        assert_eq!(min_filter_for(256, 100), glow::LINEAR);
    }
}
