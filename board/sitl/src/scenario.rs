use hal::{Vector2f, Vector3d};
use optical_flow::backend::{SimFault, SimTruth};

/// What the simulated world looks like at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioStep {
    pub truth: SimTruth,
    pub body_rate: Vector3d,
    pub fault: Option<SimFault>,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    until_s: f32,
    velocity: (f32, f32),
    height_m: f32,
    quality: u8,
    fault: Option<SimFault>,
}

/// Scripted flight used by the SITL run
///
/// Hover, fly forward, lose the bus, drift sideways, lose data, land.
pub struct Scenario {
    segments: Vec<Segment>,
    /// Amplitude of the rocking added to roll and pitch (rad/s)
    wobble: f32,
}

impl Default for Scenario {
    fn default() -> Self {
        let segment = |until_s: f32,
                       velocity: (f32, f32),
                       height_m: f32,
                       quality: u8,
                       fault: Option<SimFault>| Segment {
            until_s,
            velocity,
            height_m,
            quality,
            fault,
        };
        Self {
            segments: vec![
                segment(2.0, (0.0, 0.0), 1.0, 200, None),
                segment(6.0, (1.5, 0.0), 2.0, 180, None),
                segment(7.0, (1.5, 0.0), 2.0, 180, Some(SimFault::Bus)),
                segment(10.0, (0.0, 0.5), 2.0, 160, None),
                segment(11.0, (0.0, 0.5), 2.0, 160, Some(SimFault::NoData)),
                segment(12.0, (0.0, 0.0), 0.0, 0, None),
            ],
            wobble: 0.05,
        }
    }
}

impl Scenario {
    /// Length of the run in seconds
    pub fn duration_s(&self) -> f32 {
        self.segments.last().map_or(0.0, |s| s.until_s)
    }

    /// World state at `t_s` seconds into the run
    pub fn at(&self, t_s: f32) -> ScenarioStep {
        let segment = self
            .segments
            .iter()
            .find(|s| t_s < s.until_s)
            .or_else(|| self.segments.last())
            .copied()
            .unwrap_or(Segment {
                until_s: 0.0,
                velocity: (0.0, 0.0),
                height_m: 0.0,
                quality: 0,
                fault: None,
            });

        let phase = t_s * core::f32::consts::TAU * 0.5;
        ScenarioStep {
            truth: SimTruth {
                velocity: Vector2f::new(segment.velocity.0, segment.velocity.1),
                height_m: segment.height_m,
                quality: segment.quality,
            },
            body_rate: Vector3d::new(self.wobble * phase.sin(), self.wobble * phase.cos(), 0.0),
            fault: segment.fault,
        }
    }
}
