use crate::PerceptionError;
use itertools::Itertools;
use ndarray::{Array2, ArrayView2};

/// The distinct object ids in a segmentation image, ascending, without background ids (`<= 0`).
pub fn object_ids(segmentation: ArrayView2<'_, i32>) -> Vec<i32> {
    segmentation
        .iter()
        .copied()
        .filter(|&id| id > 0)
        .sorted_unstable()
        .dedup()
        .collect()
}

/// A mask that is `true` exactly where the segmentation equals `object_id`.
///
/// Fails with [`PerceptionError::EmptyMask`] if no pixel matches.
pub fn object_mask(
    segmentation: ArrayView2<'_, i32>,
    object_id: i32,
) -> Result<Array2<bool>, PerceptionError> {
    let mask = segmentation.mapv(|id| id == object_id);
    if mask.iter().any(|&m| m) {
        Ok(mask)
    } else {
        Err(PerceptionError::EmptyMask { object_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn ids_skip_background() {
        let segmentation = array![[0, -1, 3], [7, 3, 0], [-1, 7, 2]];
        assert_eq!(object_ids(segmentation.view()), vec![2, 3, 7]);
        assert!(object_ids(Array2::<i32>::zeros((2, 2)).view()).is_empty());
    }

    #[test]
    fn masks_partition_the_foreground() {
        let segmentation = array![[0, 1, 1, 4], [2, 2, -1, 4], [0, 1, 2, 4]];
        let mut coverage = Array2::<u32>::zeros(segmentation.dim());
        for id in object_ids(segmentation.view()) {
            let mask = object_mask(segmentation.view(), id).unwrap();
            coverage.zip_mut_with(&mask, |c, &m| *c += m as u32);
        }
        let foreground = segmentation.mapv(|id| (id > 0) as u32);
        assert_eq!(coverage, foreground);
    }

    #[test]
    fn absent_id_is_empty_mask() {
        let segmentation = array![[0, 1], [1, 0]];
        assert!(matches!(
            object_mask(segmentation.view(), 9),
            Err(PerceptionError::EmptyMask { object_id: 9 })
        ));
    }
}
