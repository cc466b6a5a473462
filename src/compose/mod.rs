/// Ordered, timeout-bounded rendering of the board into a PNG
pub mod engine;
/// Grid geometry for a given slot count
pub mod layout;
/// RGBA drawing surface and bitmap text
pub mod surface;
