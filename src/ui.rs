pub mod layout;
pub mod preview;
pub mod theme;

pub use layout::draw;
