pub mod agent_decision;
pub mod startup;
pub mod tick;
pub mod weather_advance;
