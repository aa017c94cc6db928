#![allow(dead_code)]

mod builders;
mod mock_handlers;

pub use builders::*;
pub use mock_handlers::*;
