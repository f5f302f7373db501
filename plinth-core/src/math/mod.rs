mod bounds;
pub use self::bounds::*;

mod point;
pub use self::point::*;
