pub mod buttons;
pub mod combat;
pub mod event;
pub mod level;
pub mod movement;
pub mod physics;
pub mod script;
pub mod step;
pub mod world;
