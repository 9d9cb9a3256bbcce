use crate::{
    cloud_to_world, estimate_pose, filter_cloud, mask_rgbd, object_color, object_ids, object_mask,
    reconstruct_cloud, visualize, CameraPose, FrameInputs, FrameResult, ObjectPoseRecord,
    PerceptionError, PerceptionSettings, VisualGeometry,
};
use cv_core::nalgebra::Point3;
use cv_core::{CameraToWorld, Pose, WorldToCamera};
use cv_geom::{OrientedBoundingBox, PrincipalAxisBoxFitter};
use cv_pinhole::CameraIntrinsics;
use cv_pointclouds::{CloudError, PointCloud};
use log::*;
use std::collections::BTreeMap;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Everything produced for one object that made it through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectObservation {
    pub record: ObjectPoseRecord,
    /// The filtered cloud in the world frame, painted with the object's color.
    pub world_cloud: PointCloud,
    /// The fitted box moved to the world frame, absent if no box could be fitted.
    pub world_box: Option<OrientedBoundingBox>,
}

/// The outcome of one perception pass.
#[derive(Debug)]
pub struct FrameReport {
    pub poses: FrameResult,
    /// Why each object missing from `poses` was skipped.
    pub failures: BTreeMap<i32, PerceptionError>,
    /// A world origin frame followed by the cloud, frame and box of every object with a fitted box.
    pub geometries: Vec<VisualGeometry>,
}

/// Turns RGB, depth and segmentation renders into per-object world poses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    intrinsics: CameraIntrinsics,
    settings: PerceptionSettings,
    box_fitter: PrincipalAxisBoxFitter,
}

impl Perception {
    /// Fails with [`PerceptionError::InvalidIntrinsics`] unless both focal lengths are finite and positive.
    pub fn new(
        intrinsics: CameraIntrinsics,
        settings: PerceptionSettings,
    ) -> Result<Self, PerceptionError> {
        if !intrinsics.is_valid() {
            return Err(PerceptionError::InvalidIntrinsics {
                fx: intrinsics.focals.x,
                fy: intrinsics.focals.y,
            });
        }
        Ok(Self {
            intrinsics,
            settings,
            box_fitter: PrincipalAxisBoxFitter::new()
                .planarity_epsilon(settings.obb_planarity_epsilon),
        })
    }

    /// Reads the intrinsics from a row-major projection matrix at the configured resolution.
    pub fn from_projection_matrix(
        projection: &[f64; 16],
        settings: PerceptionSettings,
    ) -> Result<Self, PerceptionError> {
        let intrinsics =
            CameraIntrinsics::from_projection_matrix(projection, settings.width, settings.height);
        info!(
            "intrinsics for {}x{}: focals {:?} principal point {:?}",
            intrinsics.width, intrinsics.height, intrinsics.focals, intrinsics.principal_point
        );
        Self::new(intrinsics, settings)
    }

    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    pub fn settings(&self) -> &PerceptionSettings {
        &self.settings
    }

    /// Masks out one object and back-projects it into an unfiltered camera-frame cloud.
    ///
    /// Fails if the object has no pixels or reconstructs to fewer than `minimum_points` points.
    pub fn reconstruct_object(
        &self,
        frame: &FrameInputs,
        object_id: i32,
    ) -> Result<PointCloud, PerceptionError> {
        let mask = object_mask(frame.segmentation(), object_id)?;
        let masked = mask_rgbd(frame.rgb(), frame.depth(), mask.view())?;
        let cloud = reconstruct_cloud(
            &masked,
            &self.intrinsics,
            self.settings.depth_scale,
            self.settings.depth_trunc,
        );
        if cloud.len() < self.settings.minimum_points {
            return Err(PerceptionError::InsufficientPoints {
                object_id,
                points: cloud.len(),
                minimum: self.settings.minimum_points,
            });
        }
        Ok(cloud)
    }

    /// Runs one object through reconstruction, filtering, pose estimation and the world transform.
    ///
    /// A failed box fit is not an error: the record then has the identity orientation and no dimensions.
    pub fn process_object(
        &self,
        frame: &FrameInputs,
        object_id: i32,
        camera_to_world: CameraToWorld,
    ) -> Result<ObjectObservation, PerceptionError> {
        let cloud = self.reconstruct_object(frame, object_id)?;
        let filtered = filter_cloud(&cloud, &self.settings)
            .map_err(|source| PerceptionError::FilterFailed { object_id, source })?;
        debug!(
            "object {} filtered from {} to {} points",
            object_id,
            cloud.len(),
            filtered.len()
        );
        let pose: CameraPose =
            estimate_pose(&filtered, &self.box_fitter).ok_or(PerceptionError::FilterFailed {
                object_id,
                source: CloudError::EmptyResult,
            })?;
        if let Err(source) = pose.bounding_box {
            warn!(
                "{}, using identity orientation",
                PerceptionError::ObbFittingFailed { object_id, source }
            );
        }

        let record = ObjectPoseRecord::from_camera_pose(object_id, &pose, camera_to_world);
        let mut world_cloud = cloud_to_world(&filtered, camera_to_world);
        world_cloud.paint_uniform_color(object_color(object_id));
        let world_box = record.dimensions.map(|extent| {
            visualize::world_box(record.position_world, &record.orientation_world, extent)
        });
        Ok(ObjectObservation {
            record,
            world_cloud,
            world_box,
        })
    }

    /// Runs every object in the frame through the pipeline.
    ///
    /// `view_matrix` is the row-major camera-from-world matrix. Only a view matrix that cannot be
    /// inverted fails the whole frame. Per-object failures end up in [`FrameReport::failures`].
    pub fn process_frame(
        &self,
        frame: &FrameInputs,
        view_matrix: &[f64; 16],
    ) -> Result<FrameReport, PerceptionError> {
        let camera_to_world = WorldToCamera::from_view_matrix(view_matrix)
            .inverse()
            .ok_or(PerceptionError::SingularViewMatrix)?;

        let ids = object_ids(frame.segmentation());
        info!("found {} objects: {:?}", ids.len(), ids);

        #[cfg(feature = "rayon")]
        let outcomes: Vec<_> = ids
            .par_iter()
            .map(|&id| (id, self.process_object(frame, id, camera_to_world)))
            .collect();
        #[cfg(not(feature = "rayon"))]
        let outcomes: Vec<_> = ids
            .iter()
            .map(|&id| (id, self.process_object(frame, id, camera_to_world)))
            .collect();

        let mut report = FrameReport {
            poses: FrameResult::new(),
            failures: BTreeMap::new(),
            geometries: vec![VisualGeometry::CoordinateFrame {
                origin: Point3::origin(),
                size: self.settings.world_frame_size,
            }],
        };
        for (object_id, outcome) in outcomes {
            match outcome {
                Ok(observation) => {
                    let record = observation.record;
                    info!(
                        "object {} at {:?} in the world, dimensions {:?}",
                        object_id, record.position_world, record.dimensions
                    );
                    if let Some(world_box) = observation.world_box {
                        report.geometries.extend([
                            VisualGeometry::PointCloud {
                                points: observation.world_cloud.points().to_vec(),
                                color: object_color(object_id),
                            },
                            VisualGeometry::CoordinateFrame {
                                origin: record.position_world,
                                size: self.settings.object_frame_size,
                            },
                            VisualGeometry::OrientedBox(world_box),
                        ]);
                    }
                    report.poses.insert(object_id, record);
                }
                Err(error) => {
                    warn!("skipping object {}: {}", object_id, error);
                    report.failures.insert(object_id, error);
                }
            }
        }
        info!(
            "estimated {} poses, skipped {} objects",
            report.poses.len(),
            report.failures.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::nalgebra::Point2;
    use ndarray::{Array2, Array3};

    #[rustfmt::skip]
    const IDENTITY: [f64; 16] = [
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ];

    fn perception() -> Perception {
        Perception::new(
            CameraIntrinsics::identity(4, 4)
                .focal(500.0)
                .principal_point(Point2::new(2.0, 2.0)),
            PerceptionSettings::default(),
        )
        .unwrap()
    }

    /// A 10x10 render at depth 1.0 where object 2 covers the first `pixels` pixels of a block five
    /// columns wide, filled row by row.
    fn partial_frame(pixels: usize) -> (CameraIntrinsics, FrameInputs) {
        let intrinsics = CameraIntrinsics::identity(10, 10)
            .focal(50.0)
            .principal_point(Point2::new(4.5, 4.5));
        let segmentation = Array2::from_shape_fn((10, 10), |(row, column)| {
            (column < 5 && row * 5 + column < pixels) as i32 * 2
        });
        let frame = FrameInputs::new(
            Array3::from_elem((10, 10, 3), 60),
            Array2::from_elem((10, 10), 1.0),
            segmentation,
        )
        .unwrap();
        (intrinsics, frame)
    }

    fn small_frame() -> FrameInputs {
        let mut segmentation = Array2::zeros((4, 4));
        segmentation
            .slice_mut(ndarray::s![1..3, 1..3])
            .fill(5);
        FrameInputs::new(
            Array3::from_elem((4, 4, 3), 128),
            Array2::from_elem((4, 4), 2.0),
            segmentation,
        )
        .unwrap()
    }

    #[test]
    fn small_object_is_insufficient() {
        let error = perception().reconstruct_object(&small_frame(), 5).unwrap_err();
        assert!(matches!(
            error,
            PerceptionError::InsufficientPoints {
                object_id: 5,
                points: 4,
                minimum: 10
            }
        ));
    }

    #[test]
    fn singular_view_aborts_frame() {
        let result = perception().process_frame(&small_frame(), &[0.0; 16]);
        assert!(matches!(result, Err(PerceptionError::SingularViewMatrix)));
    }

    #[test]
    fn frame_without_objects_only_has_world_frame() {
        let frame = FrameInputs::new(
            Array3::zeros((4, 4, 3)),
            Array2::zeros((4, 4)),
            Array2::zeros((4, 4)),
        )
        .unwrap();
        let report = perception().process_frame(&frame, &IDENTITY).unwrap();
        assert!(report.poses.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(report.geometries.len(), 1);
    }

    #[test]
    fn box_fitter_uses_settings() {
        let settings = PerceptionSettings {
            obb_planarity_epsilon: 0.25,
            ..PerceptionSettings::default()
        };
        let perception = Perception::new(CameraIntrinsics::identity(4, 4), settings).unwrap();
        assert_eq!(
            perception.box_fitter,
            PrincipalAxisBoxFitter::new().planarity_epsilon(0.25)
        );
    }

    #[test]
    fn one_point_short_of_minimum_is_insufficient() {
        let (intrinsics, frame) = partial_frame(9);
        let perception = Perception::new(intrinsics, PerceptionSettings::default()).unwrap();
        assert!(matches!(
            perception.reconstruct_object(&frame, 2),
            Err(PerceptionError::InsufficientPoints {
                object_id: 2,
                points: 9,
                minimum: 10
            })
        ));
        let report = perception.process_frame(&frame, &IDENTITY).unwrap();
        assert!(report.poses.is_empty());
    }

    #[test]
    fn exactly_minimum_points_reach_filtering() {
        let (intrinsics, frame) = partial_frame(10);
        let perception = Perception::new(intrinsics, PerceptionSettings::default()).unwrap();
        assert_eq!(perception.reconstruct_object(&frame, 2).unwrap().len(), 10);
        let report = perception.process_frame(&frame, &IDENTITY).unwrap();
        assert!(report.failures.is_empty());
        assert!(report.poses.contains_key(&2));
    }

    #[test]
    fn minimum_points_follows_settings() {
        let (intrinsics, frame) = partial_frame(10);
        let strict = PerceptionSettings {
            minimum_points: 11,
            ..PerceptionSettings::default()
        };
        let strict = Perception::new(intrinsics, strict).unwrap();
        assert!(matches!(
            strict.reconstruct_object(&frame, 2),
            Err(PerceptionError::InsufficientPoints {
                points: 10,
                minimum: 11,
                ..
            })
        ));

        let lenient = PerceptionSettings {
            minimum_points: 4,
            ..PerceptionSettings::default()
        };
        let lenient = Perception::new(*perception().intrinsics(), lenient).unwrap();
        assert_eq!(lenient.reconstruct_object(&small_frame(), 5).unwrap().len(), 4);
    }

    #[test]
    fn non_positive_focals_are_rejected() {
        let intrinsics = CameraIntrinsics::identity(4, 4).focal(0.0);
        assert!(matches!(
            Perception::new(intrinsics, PerceptionSettings::default()),
            Err(PerceptionError::InvalidIntrinsics { fx, fy }) if fx == 0.0 && fy == 0.0
        ));
        let projection = [0.0; 16];
        assert!(matches!(
            Perception::from_projection_matrix(&projection, PerceptionSettings::default()),
            Err(PerceptionError::InvalidIntrinsics { .. })
        ));
    }
}
