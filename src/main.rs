use glam::Vec3;
use mr_solvers::host::{FixedClock, PoseSlot};
use mr_solvers::math::angles;
use mr_solvers::solver::{MomentumPreset, MomentumSolver, OrbitalPreset, OrbitalSolver, SolverHandler};
use mr_solvers::Pose;

const FRAME_TIME: f32 = 1.0 / 60.0;
const DURATION: f32 = 4.0;
const HEAD_HEIGHT: f32 = 1.6;

const DEFAULT_PRESET: &str = r#"
update_linked_transform = true
smoothing = false
orientation_mode = "face_tracked"
local_offset = [0.0, -0.3, -1.5]
use_angle_stepping = true
tether_angle_steps = 8
"#;

const FOLLOWER_PRESET: &str = r#"
move_lerp_time = 0.0
rotate_lerp_time = 0.2
springiness = 4.0
"#;

struct App {
    head: PoseSlot,
    object: Pose,
    handler: SolverHandler,
    time: f32,
}

impl App {
    fn new(preset: &OrbitalPreset) -> Self {
        let head = PoseSlot::new(Self::head_pose(0.0));
        let object = Pose::IDENTITY;

        let follower = MomentumPreset::from_toml_str(FOLLOWER_PRESET)
            .expect("built-in follower preset is valid");

        let handler = SolverHandler::builder()
            .clock(FixedClock(FRAME_TIME))
            .target(head.clone())
            .viewer(head.clone())
            .add_solver(OrbitalSolver::from_preset(preset))
            .add_solver(MomentumSolver::from_preset(&follower))
            .build(&object);

        Self {
            head,
            object,
            handler,
            time: 0.0,
        }
    }

    /// A head that sweeps 180 degrees left and back over the run.
    fn head_pose(time: f32) -> Pose {
        let yaw = 90.0 - 90.0 * (time / DURATION * std::f32::consts::TAU).cos();
        Pose::from_position_rotation(
            Vec3::new(0.0, HEAD_HEIGHT, 0.0),
            angles::from_yaw_degrees(yaw),
        )
    }

    fn update(&mut self) {
        self.time += FRAME_TIME;
        self.head.set(Self::head_pose(self.time));
        self.handler.update(&mut self.object);
    }

    fn report(&self) {
        let head_yaw = self.head.get().map_or(0.0, |p| angles::yaw_degrees(p.rotation));
        log::info!(
            "t={:.2}s head_yaw={:6.1} goal=({:6.2}, {:5.2}, {:6.2}) object=({:6.2}, {:5.2}, {:6.2}) object_yaw={:6.1}",
            self.time,
            head_yaw,
            self.handler.goal().position.x,
            self.handler.goal().position.y,
            self.handler.goal().position.z,
            self.object.position.x,
            self.object.position.y,
            self.object.position.z,
            angles::yaw_degrees(self.object.rotation),
        );
    }
}

fn load_preset() -> OrbitalPreset {
    let Some(path) = std::env::args().nth(1) else {
        return OrbitalPreset::from_toml_str(DEFAULT_PRESET)
            .expect("built-in orbital preset is valid");
    };

    match std::fs::read_to_string(&path) {
        Ok(source) => match OrbitalPreset::from_toml_str(&source) {
            Ok(preset) => preset,
            Err(e) => {
                log::error!("Invalid preset {}: {}", path, e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            log::error!("Cannot read preset {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let preset = load_preset();
    let mut app = App::new(&preset);

    let frames = (DURATION / FRAME_TIME).round() as u32;
    for frame in 0..frames {
        app.update();
        if frame % 30 == 0 {
            app.report();
        }
    }
    app.report();
}
