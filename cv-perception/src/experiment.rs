use crate::{
    ExperimentSettings, FrameInputs, FrameKey, Perception, PerceptionError, PerceptionSettings,
    RunResult, VisualGeometry,
};
use log::*;

/// The simulated world that renders frames for the perception pass.
pub trait Simulation {
    /// The names of the scenes to run, in order.
    fn scenes(&self) -> Vec<String>;
    /// Loads a scene from scratch.
    fn reset(&mut self, scene: &str);
    /// Advances the simulation by one step.
    fn step(&mut self);
    /// The row-major projection matrix. It is only queried once per run.
    fn projection_matrix(&self) -> [f64; 16];
    /// The row-major camera-from-world matrix of the current step.
    fn view_matrix(&self) -> [f64; 16];
    fn static_renders(&mut self) -> FrameInputs;
}

/// Runs every scene for the configured number of trials and steps, perceiving every
/// `perception_interval` steps.
///
/// `on_frame` receives the visualization geometry of every successful perception pass.
/// A frame whose view matrix cannot be inverted is logged and left out of the result.
/// Fails before stepping anything if the projection matrix yields unusable intrinsics.
pub fn run_experiment<S: Simulation>(
    simulation: &mut S,
    perception_settings: PerceptionSettings,
    experiment_settings: &ExperimentSettings,
    mut on_frame: impl FnMut(&FrameKey, &[VisualGeometry]),
) -> Result<RunResult, PerceptionError> {
    let perception =
        Perception::from_projection_matrix(&simulation.projection_matrix(), perception_settings)?;
    let interval = experiment_settings.perception_interval.max(1);
    let mut run = RunResult::new();

    for scene in simulation.scenes() {
        for trial in 0..experiment_settings.trials {
            info!("starting trial {} of scene {}", trial, scene);
            simulation.reset(&scene);
            for step in 0..experiment_settings.steps {
                simulation.step();
                if step % interval != 0 {
                    continue;
                }
                let key = FrameKey::new(scene.as_str(), trial, step);
                let frame = simulation.static_renders();
                match perception.process_frame(&frame, &simulation.view_matrix()) {
                    Ok(report) => {
                        on_frame(&key, &report.geometries);
                        run.insert(key, report.poses);
                    }
                    Err(error) => error!("frame {} skipped: {}", key, error),
                }
            }
        }
    }
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    #[rustfmt::skip]
    const IDENTITY: [f64; 16] = [
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ];

    #[derive(Default)]
    struct Counting {
        resets: Vec<String>,
        steps: usize,
        renders: usize,
        singular_after: Option<usize>,
        flat_projection: bool,
    }

    impl Simulation for Counting {
        fn scenes(&self) -> Vec<String> {
            vec!["a".into(), "b".into()]
        }

        fn reset(&mut self, scene: &str) {
            self.resets.push(scene.into());
        }

        fn step(&mut self) {
            self.steps += 1;
        }

        fn projection_matrix(&self) -> [f64; 16] {
            if self.flat_projection {
                [0.0; 16]
            } else {
                IDENTITY
            }
        }

        fn view_matrix(&self) -> [f64; 16] {
            match self.singular_after {
                Some(renders) if self.renders > renders => [0.0; 16],
                _ => IDENTITY,
            }
        }

        fn static_renders(&mut self) -> FrameInputs {
            self.renders += 1;
            FrameInputs::new(
                Array3::zeros((2, 2, 3)),
                Array2::zeros((2, 2)),
                Array2::zeros((2, 2)),
            )
            .unwrap()
        }
    }

    fn schedule() -> ExperimentSettings {
        ExperimentSettings {
            trials: 2,
            steps: 10,
            perception_interval: 4,
        }
    }

    #[test]
    fn schedule_is_followed() {
        let mut simulation = Counting::default();
        let mut seen = vec![];
        let run = run_experiment(
            &mut simulation,
            PerceptionSettings::default(),
            &schedule(),
            |key, geometries| {
                assert_eq!(geometries.len(), 1);
                seen.push(key.to_string());
            },
        )
        .unwrap();
        assert_eq!(simulation.resets, ["a", "a", "b", "b"]);
        assert_eq!(simulation.steps, 40);
        assert_eq!(simulation.renders, 12);
        assert_eq!(run.len(), 12);
        assert_eq!(&seen[..3], ["a_0_0", "a_0_4", "a_0_8"]);
        assert!(run.get(&FrameKey::new("b", 1, 8)).unwrap().is_empty());
    }

    #[test]
    fn singular_frames_are_skipped() {
        let mut simulation = Counting {
            singular_after: Some(3),
            ..Counting::default()
        };
        let run = run_experiment(
            &mut simulation,
            PerceptionSettings::default(),
            &schedule(),
            |_, _| {},
        )
        .unwrap();
        assert_eq!(simulation.renders, 12);
        assert_eq!(run.len(), 3);
    }

    #[test]
    fn zero_interval_perceives_every_step() {
        let mut simulation = Counting::default();
        let settings = ExperimentSettings {
            trials: 1,
            steps: 3,
            perception_interval: 0,
        };
        let run =
            run_experiment(&mut simulation, PerceptionSettings::default(), &settings, |_, _| {})
                .unwrap();
        assert_eq!(run.len(), 6);
    }

    #[test]
    fn unusable_projection_stops_before_stepping() {
        let mut simulation = Counting {
            flat_projection: true,
            ..Counting::default()
        };
        let result =
            run_experiment(&mut simulation, PerceptionSettings::default(), &schedule(), |_, _| {});
        assert!(matches!(result, Err(PerceptionError::InvalidIntrinsics { .. })));
        assert_eq!(simulation.steps, 0);
        assert!(simulation.resets.is_empty());
    }
}
