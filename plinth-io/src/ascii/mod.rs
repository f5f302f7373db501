mod format_util;
pub(crate) use self::format_util::*;

mod xyz;
pub use self::xyz::*;

mod obj;
pub use self::obj::*;

mod mask;
pub use self::mask::*;
