pub mod actors;
pub mod challenge;
pub mod collision;
pub mod compute;
pub mod config;
pub mod constants;
pub mod entities;
pub mod input;
pub mod render;
pub mod spawner;
