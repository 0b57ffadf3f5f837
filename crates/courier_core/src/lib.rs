pub mod actions;
pub mod ai;
pub mod city;
pub mod clock;
pub mod context;
pub mod ecs;
pub mod jobs;
pub mod orders;
pub mod reputation;
pub mod runner;
pub mod scenario;
pub mod snapshot;
pub mod speed;
pub mod stamina;
pub mod systems;
pub mod telemetry;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod weather;
