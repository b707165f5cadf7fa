//! # einsor-planner
//!
//! Index-expression compiler for the einsor stack.
//!
//! This crate turns compact einsum-style strings into reusable execution
//! plans that the kernel engine walks as plain data:
//!
//! - **Contraction** (`"ijk->jk"`) → [`ContractionPlan`]
//! - **Permutation** (`"ij->ji"`) → [`PermutationPlan`]
//! - **Inner / outer product** (`"ij,jk->ik"`, `"i,j->ij"`) →
//!   [`InnerProductPlan`]
//!
//! ## Compile-time parsing
//!
//! Every parser is a `const fn`. Binding a plan to a `const` item makes the
//! parse part of compilation, so a malformed expression literal fails the
//! build rather than the run:
//!
//! ```
//! use einsor_planner::{contraction_parse, ContractionPlan};
//!
//! // Evaluated by the compiler; "ijk→typo" here would be a build error.
//! const PLAN: ContractionPlan<3, 2> = contraction_parse("ijk->ij");
//! assert_eq!(PLAN.rhs, [0, 1]);
//! ```
//!
//! Expressions only known at runtime go through the `try_*` siblings, which
//! report [`PlanError`] instead:
//!
//! ```
//! use einsor_planner::try_permutate_parse;
//!
//! let plan = try_permutate_parse::<2>("ij->ji").unwrap();
//! assert_eq!(plan, [1, 0]);
//! assert!(try_permutate_parse::<2>("ij->ik").is_err());
//! ```
//!
//! ## Grammar
//!
//! Indices are single ASCII letters (`A-Z` / `a-z`, case-sensitive), the
//! side separator is the literal `->`, two-operand forms separate operands
//! with a single `,`. No whitespace is tolerated.

#![deny(warnings)]

pub mod error;
pub mod parse;
pub mod plan;


pub use error::{PlanError, PlanResult};
pub use parse::{
    contracted_rank, contraction_parse, inner_product_parse, outer_product_parse, permutate_parse,
    try_contraction_parse, try_inner_product_parse, try_outer_product_parse, try_permutate_parse,
};
pub use plan::{
    ContractionPlan, InnerProductPlan, PermutationPlan, MAX_LEVELS, PASS, TRIP_FROM_X, TRIP_FROM_Y,
};
