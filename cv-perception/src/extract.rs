use crate::PerceptionError;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis, Zip};

/// Color and depth images of one object, with every pixel outside its mask set to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedRgbd {
    pub color: Array3<u8>,
    pub depth: Array2<f32>,
}

/// Copies the color and depth images, zeroing all channels of every pixel where `mask` is false.
///
/// Pixels inside the mask are copied unchanged.
pub fn mask_rgbd(
    rgb: ArrayView3<'_, u8>,
    depth: ArrayView2<'_, f32>,
    mask: ArrayView2<'_, bool>,
) -> Result<MaskedRgbd, PerceptionError> {
    let (height, width, channels) = rgb.dim();
    if channels != 3 || depth.dim() != (height, width) || mask.dim() != (height, width) {
        return Err(PerceptionError::ShapeMismatch {
            rgb: rgb.dim(),
            depth: depth.dim(),
            segmentation: mask.dim(),
        });
    }

    let mut color = rgb.to_owned();
    Zip::from(color.lanes_mut(Axis(2)))
        .and(mask)
        .for_each(|mut pixel, &inside| {
            if !inside {
                pixel.fill(0);
            }
        });

    let mut depth = depth.to_owned();
    Zip::from(&mut depth).and(mask).for_each(|d, &inside| {
        if !inside {
            *d = 0.0;
        }
    });

    Ok(MaskedRgbd { color, depth })
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;

    #[test]
    fn masked_pixels_are_exact_copies() {
        let rgb = Array3::from_shape_fn((3, 4, 3), |(r, c, ch)| (r * 40 + c * 10 + ch + 1) as u8);
        let depth = Array2::from_shape_fn((3, 4), |(r, c)| 0.5 + r as f32 * 0.25 + c as f32 * 0.125);
        let mask = Array2::from_shape_fn((3, 4), |(r, c)| (r + c) % 2 == 0);

        let masked = mask_rgbd(rgb.view(), depth.view(), mask.view()).unwrap();
        assert_eq!(masked.color.dim(), rgb.dim());
        assert_eq!(masked.depth.dim(), depth.dim());

        for (r, c) in iproduct!(0..3, 0..4) {
            if mask[[r, c]] {
                assert_eq!(masked.depth[[r, c]].to_bits(), depth[[r, c]].to_bits());
                for ch in 0..3 {
                    assert_eq!(masked.color[[r, c, ch]], rgb[[r, c, ch]]);
                }
            } else {
                assert_eq!(masked.depth[[r, c]], 0.0);
                assert!((0..3).all(|ch| masked.color[[r, c, ch]] == 0));
            }
        }
    }

    #[test]
    fn mismatched_mask_is_rejected() {
        let result = mask_rgbd(
            Array3::<u8>::zeros((2, 2, 3)).view(),
            Array2::<f32>::zeros((2, 2)).view(),
            Array2::from_elem((2, 3), true).view(),
        );
        assert!(matches!(result, Err(PerceptionError::ShapeMismatch { .. })));
    }
}
