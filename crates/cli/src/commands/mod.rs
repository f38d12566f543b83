pub mod check;
pub mod compare;
pub mod init;
pub mod sections;
pub mod util;

pub use check::*;
pub use compare::*;
pub use init::*;
pub use sections::*;
pub use util::*;
