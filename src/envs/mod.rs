pub mod grid;
pub mod interop;
pub mod rewards;

pub use grid::{GridConfig, GridEnvironment};
pub use rewards::{GOAL_REWARD, RewardMatrix, STEP_REWARD};
