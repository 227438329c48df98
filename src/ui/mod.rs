pub mod columns;
pub mod layout;
pub mod palette;
