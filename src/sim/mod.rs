//! Gameplay core
//!
//! Everything that decides what happens in a game lives here:
//! - contacts are classified by body role, then debounced by the rally machine
//! - scoring and lives live in `MatchState`
//! - score milestones escalate difficulty through the field geometry
//! - tilt samples become striker forces
//!
//! No physics, rendering or platform code. The engine emits `Output`s that
//! the host applies; randomness goes through `Dice`.

pub mod body;
pub mod collision;
pub mod dice;
pub mod engine;
pub mod escalation;
pub mod events;
pub mod field;
pub mod rally;
pub mod session;
pub mod state;
pub mod tilt;

pub use body::BodyRole;
pub use collision::{CollisionEvent, ContactPhase, classify, classify_named};
pub use dice::{Dice, RngDice, ScriptedDice};
pub use engine::Engine;
pub use escalation::{ActiveEffect, Escalation, Feature, MilestoneReport, WallSide};
pub use events::{DisplayUpdate, GeometryUpdate, Haptic, Outbox, Output, PhysicsCommand};
pub use field::{Boundaries, FieldGeometry, FieldTemplate, Obstacle, ObstacleSlot};
pub use rally::{LastTouch, Rally, RallyOutcome, RallyPhase};
pub use session::{Input, InputSender, Session};
pub use state::{GamePhase, MatchState};
pub use tilt::{TiltPipeline, striker_force};
