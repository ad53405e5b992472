//! Conditional-logic rule management: builder-local rule state, the commit
//! and delete engine, and the expression-compiler seam.

pub mod builder;
pub mod engine;
pub mod expression;

pub use builder::RuleBuilder;
pub use engine::RuleEngine;
pub use expression::{CanonicalCompiler, ExpressionCompiler};
