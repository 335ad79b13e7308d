//! Engine shared by every dialect driver.
//!
//! - [`parse`]: statement loop and CREATE TABLE walk behind [`ParseHooks`]
//! - [`render`]: schema walk and column/constraint rendering behind [`RenderHooks`]
//!
//! A driver is a pair of small hook implementations; everything that is
//! the same across dialects lives here once.

pub mod parse;
pub mod render;

pub use parse::{parse_script, ParseHooks};
pub use render::{
    body_is_block, comment_on_statements, generate_script, single_row_event, DefaultFunction, IdentitySql, IndexSyntax, MethodPlacement, RenderHooks,
    Renderer,
};
