pub mod hud;
pub mod incrementer;
