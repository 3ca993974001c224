pub mod columns;
pub mod core;
pub mod export;
pub mod marks;
pub mod students;
