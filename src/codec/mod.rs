pub mod bits;
pub mod decode;
pub mod generate;
pub mod record;
pub mod text;
