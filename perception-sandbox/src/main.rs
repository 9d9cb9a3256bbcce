mod recording;

use cv::perception::{to_ply_geometry, Perception, PerceptionSettings, RunResult};
use cv::pointclouds::CloudError;
use log::*;
use recording::RecordedFrame;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Clone)]
#[structopt(
    name = "perception-sandbox",
    about = "A tool for replaying recorded frames through object pose estimation"
)]
struct Opt {
    /// The file where settings are specified.
    ///
    /// This is in the format of `cv_perception::PerceptionSettings`.
    #[structopt(short, long, default_value = "perception-settings.json")]
    settings: PathBuf,
    /// Output JSON file to deposit the poses of every frame
    #[structopt(short, long, default_value = "poses.json")]
    output: PathBuf,
    /// Directory to deposit a PLY file of the visualization geometry of each frame
    #[structopt(long)]
    ply_dir: Option<PathBuf>,
    /// List of recorded frame files
    #[structopt(parse(from_os_str))]
    frames: Vec<PathBuf>,
}

fn main() {
    pretty_env_logger::init_timed();
    let opt = Opt::from_args();

    let settings = File::open(&opt.settings)
        .ok()
        .and_then(|file| serde_json::from_reader(file).ok());
    if settings.is_some() {
        info!("loaded existing settings");
    } else {
        info!("used default settings");
    }
    let settings: PerceptionSettings = settings.unwrap_or_default();

    if let Some(dir) = &opt.ply_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            error!("unable to create PLY directory {}: {}", dir.display(), e);
            return;
        }
    }

    let mut pipeline: Option<(Perception, [f64; 16])> = None;
    let mut run = RunResult::new();
    for path in &opt.frames {
        let recorded = match RecordedFrame::load(path) {
            Ok(recorded) => recorded,
            Err(e) => {
                error!("skipping {}: {}", path.display(), e);
                continue;
            }
        };

        // The intrinsics are taken from the first frame.
        let projection = recorded.projection_matrix;
        if pipeline.is_none() {
            match Perception::from_projection_matrix(&projection, settings) {
                Ok(perception) => pipeline = Some((perception, projection)),
                Err(e) => {
                    error!("unusable projection matrix in {}: {}", path.display(), e);
                    return;
                }
            }
        }
        let (perception, first_projection) = match &pipeline {
            Some(pipeline) => pipeline,
            None => continue,
        };
        if *first_projection != projection {
            warn!(
                "{} has a different projection matrix, keeping the intrinsics of the first frame",
                path.display()
            );
        }

        let (key, view_matrix, inputs) = match recorded.into_inputs() {
            Ok(parts) => parts,
            Err(e) => {
                error!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        info!("perceiving frame {}", key);
        let report = match perception.process_frame(&inputs, &view_matrix) {
            Ok(report) => report,
            Err(e) => {
                error!("frame {} skipped: {}", key, e);
                continue;
            }
        };

        if let Some(dir) = &opt.ply_dir {
            let ply_path = dir.join(format!("{}.ply", key));
            let written = File::create(&ply_path)
                .map_err(CloudError::from)
                .and_then(|file| to_ply_geometry(&report.geometries).write(BufWriter::new(file)));
            if let Err(e) = written {
                error!("unable to export {}: {}", ply_path.display(), e);
            }
        }
        run.insert(key, report.poses);
    }

    info!("saving poses of {} frames", run.len());
    match File::create(&opt.output) {
        Ok(file) => {
            if let Err(e) = serde_json::to_writer_pretty(BufWriter::new(file), &run) {
                error!("unable to save poses: {}", e);
            }
        }
        Err(e) => error!("unable to create {}: {}", opt.output.display(), e),
    }
}
