pub mod entity;
pub mod events;
pub mod level;
pub mod neighbor;
pub mod room;
pub mod rules;
pub mod tile;
