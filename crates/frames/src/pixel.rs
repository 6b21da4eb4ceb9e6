//! Raster to RGBA8 conversion.

use drift_core::color::{to_byte, Rgba, Srgb};
use drift_core::raster::Raster;

/// Composites every raster pixel over `background` and packs the result as
/// `[r, g, b, 255]` bytes, row-major. The buffer length is
/// `width * height * 4`.
pub fn raster_to_rgba(raster: &Raster, background: Srgb) -> Vec<u8> {
    let bg = Rgba::from(background);
    raster
        .pixels()
        .iter()
        .flat_map(|&px| {
            let c = px.over(bg);
            [to_byte(c.r), to_byte(c.g), to_byte(c.b), 255u8]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::surface::{RadialGradient, Surface};

    #[test]
    fn raster_to_rgba_correct_length() {
        let raster = Raster::new(8, 4).unwrap();
        assert_eq!(raster_to_rgba(&raster, Srgb::BLACK).len(), 8 * 4 * 4);
    }

    #[test]
    fn empty_raster_is_background() {
        let raster = Raster::new(2, 2).unwrap();
        let bg = Srgb::from_hex("#102030").unwrap();
        let buf = raster_to_rgba(&raster, bg);
        for px in buf.chunks_exact(4) {
            assert_eq!(px, [0x10, 0x20, 0x30, 255]);
        }
    }

    #[test]
    fn half_white_over_black_is_mid_gray() {
        let mut raster = Raster::new(4, 4).unwrap();
        let g = RadialGradient::new(2.0, 2.0, 10.0).with_stop(0.0, Rgba::white(0.5));
        raster.fill_circle(2.0, 2.0, 10.0, &g).unwrap();
        let buf = raster_to_rgba(&raster, Srgb::BLACK);
        // 0.5 * 255 = 127.5 rounds up.
        assert_eq!(&buf[0..4], &[128, 128, 128, 255]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn output_is_always_opaque(
                w in 1_usize..12,
                h in 1_usize..12,
                cx in -5.0_f64..15.0,
                cy in -5.0_f64..15.0,
                r in 0.0_f64..10.0,
                a in 0.0_f64..1.0,
            ) {
                let mut raster = Raster::new(w, h).unwrap();
                let g = RadialGradient::new(cx, cy, r)
                    .with_stop(0.0, Rgba::white(a))
                    .with_stop(1.0, Rgba::TRANSPARENT);
                raster.fill_circle(cx, cy, r, &g).unwrap();
                let buf = raster_to_rgba(&raster, Srgb::BLACK);
                prop_assert_eq!(buf.len(), w * h * 4);
                prop_assert!(buf.chunks_exact(4).all(|px| px[3] == 255));
            }
        }
    }
}
