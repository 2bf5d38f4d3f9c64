pub mod clock_face;
pub mod hud;
