pub mod check;

pub use check::{compare_groups, CheckError, CheckRunner};
