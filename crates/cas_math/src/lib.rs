//! Pure helpers over `cas_ast` expressions: structural predicates, builders,
//! f64 evaluation and integer root extraction.

pub mod build;
pub mod expr_predicates;
pub mod numeric;
pub mod root_forms;
