pub mod commands;
pub mod emission;
pub mod pipeline;
