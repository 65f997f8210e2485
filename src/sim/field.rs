//! Field geometry
//!
//! All field parts are placed at one anchor point; the asset's local
//! geometry provides each part's offset, so only the lateral (x) positions
//! and two x-scales ever change. Originals are captured at placement and
//! never touched again.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Lateral positions and scales that escalation can change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundaries {
    pub left_puck_wall_x: f32,
    pub right_puck_wall_x: f32,
    pub left_striker_wall_x: f32,
    pub right_striker_wall_x: f32,
    pub left_prop_x: f32,
    pub right_prop_x: f32,
    pub floor_x: f32,
    pub floor_scale_x: f32,
    /// Visual prop behind the attacker boundary
    pub attacker_prop_scale_x: f32,
}

/// Scales the field asset ships with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldTemplate {
    pub floor_scale_x: f32,
    pub attacker_prop_scale_x: f32,
}

impl Default for FieldTemplate {
    fn default() -> Self {
        Self {
            floor_scale_x: 1.0,
            attacker_prop_scale_x: 1.0,
        }
    }
}

/// The two sliding obstacles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleSlot {
    /// Slides toward +x (shutter and left gate)
    Primary,
    /// Slides toward -x (right gate)
    Secondary,
}

impl ObstacleSlot {
    fn index(self) -> usize {
        match self {
            ObstacleSlot::Primary => 0,
            ObstacleSlot::Secondary => 1,
        }
    }

    fn direction(self) -> f32 {
        match self {
            ObstacleSlot::Primary => 1.0,
            ObstacleSlot::Secondary => -1.0,
        }
    }
}

/// Lateral slide in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Slide {
    start_x: f32,
    distance: f32,
    elapsed: f32,
    duration: f32,
}

/// A sliding obstacle. Parked out of play behind the attacker boundary
/// until deployed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Parked position (original x, pushed back in z)
    home: Vec3,
    position: Vec3,
    slide: Option<Slide>,
    deployed: bool,
}

impl Obstacle {
    fn parked(anchor: Vec3, depth: f32) -> Self {
        let home = anchor + Vec3::new(0.0, 0.0, depth);
        Self {
            home,
            position: home,
            slide: None,
            deployed: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_deployed(&self) -> bool {
        self.deployed
    }

    pub fn is_sliding(&self) -> bool {
        self.slide.is_some()
    }
}

/// Current and original field geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGeometry {
    anchor: Vec3,
    original: Boundaries,
    current: Boundaries,
    widen_steps: u32,
    widen_step: f32,
    widen_scale_step: f32,
    park_depth: f32,
    obstacles: [Obstacle; 2],
}

impl FieldGeometry {
    /// Place every part at `anchor` and capture the originals
    pub fn place(anchor: Vec3, template: FieldTemplate, tuning: &Tuning) -> Self {
        let original = Boundaries {
            left_puck_wall_x: anchor.x,
            right_puck_wall_x: anchor.x,
            left_striker_wall_x: anchor.x,
            right_striker_wall_x: anchor.x,
            left_prop_x: anchor.x,
            right_prop_x: anchor.x,
            floor_x: anchor.x,
            floor_scale_x: template.floor_scale_x,
            attacker_prop_scale_x: template.attacker_prop_scale_x,
        };
        let obstacle = Obstacle::parked(anchor, tuning.obstacle_park_depth);
        log::info!("Field placed at {:?}", anchor);
        Self {
            anchor,
            original,
            current: original,
            widen_steps: 0,
            widen_step: tuning.widen_step,
            widen_scale_step: tuning.widen_scale_step,
            park_depth: tuning.obstacle_park_depth,
            obstacles: [obstacle; 2],
        }
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn original(&self) -> &Boundaries {
        &self.original
    }

    pub fn current(&self) -> &Boundaries {
        &self.current
    }

    pub fn widen_steps(&self) -> u32 {
        self.widen_steps
    }

    /// Where the puck is (re)spawned: on the attacker boundary
    pub fn puck_spawn(&self) -> Vec3 {
        self.anchor
    }

    /// Restore every current value to its original, and park both obstacles
    pub fn reset_to_original(&mut self) {
        self.current = self.original;
        self.widen_steps = 0;
        self.retract_obstacle(ObstacleSlot::Primary);
        self.retract_obstacle(ObstacleSlot::Secondary);
    }

    /// Push the side walls and props one step outward and scale the floor
    /// and far prop to match
    pub fn apply_widen_step(&mut self) {
        self.widen_steps += 1;
        let steps = self.widen_steps as f32;
        let shift = self.widen_step * steps;
        let scale = self.widen_scale_step * steps;
        let o = &self.original;
        self.current = Boundaries {
            left_puck_wall_x: o.left_puck_wall_x - shift,
            right_puck_wall_x: o.right_puck_wall_x + shift,
            left_striker_wall_x: o.left_striker_wall_x - shift,
            right_striker_wall_x: o.right_striker_wall_x + shift,
            left_prop_x: o.left_prop_x - shift,
            right_prop_x: o.right_prop_x + shift,
            floor_x: o.floor_x,
            floor_scale_x: o.floor_scale_x + scale,
            attacker_prop_scale_x: o.attacker_prop_scale_x + scale,
        };
    }

    pub fn obstacle(&self, slot: ObstacleSlot) -> &Obstacle {
        &self.obstacles[slot.index()]
    }

    /// Bring an obstacle onto the attacker boundary plane and start sliding
    /// it across the field
    pub fn deploy_obstacle(&mut self, slot: ObstacleSlot, distance: f32, duration: f32) {
        let obstacle = &mut self.obstacles[slot.index()];
        obstacle.position = obstacle.home - Vec3::new(0.0, 0.0, self.park_depth);
        obstacle.slide = Some(Slide {
            start_x: obstacle.position.x,
            distance: distance * slot.direction(),
            elapsed: 0.0,
            duration,
        });
        obstacle.deployed = true;
    }

    /// Stop any slide and park the obstacle at its original x
    pub fn retract_obstacle(&mut self, slot: ObstacleSlot) {
        let obstacle = &mut self.obstacles[slot.index()];
        obstacle.slide = None;
        obstacle.position = obstacle.home;
        obstacle.deployed = false;
    }

    /// Advance obstacle slides. Returns the slots whose slide finished.
    pub fn advance(&mut self, dt: f32) -> Vec<ObstacleSlot> {
        let mut finished = Vec::new();
        for slot in [ObstacleSlot::Primary, ObstacleSlot::Secondary] {
            let obstacle = &mut self.obstacles[slot.index()];
            if let Some(slide) = obstacle.slide.as_mut() {
                slide.elapsed = (slide.elapsed + dt).min(slide.duration);
                let t = slide.elapsed / slide.duration;
                obstacle.position.x = slide.start_x + slide.distance * t;
                if slide.elapsed >= slide.duration {
                    obstacle.slide = None;
                    finished.push(slot);
                }
            }
        }
        finished
    }
}
