#![warn(missing_docs)]

//! Boolean minimization of cell rules for the halfspace CSG kernel.
//!
//! Builders produce rules with redundant surfaces and deep nesting. This
//! crate reduces a [`HeadRule`](halfspace_rule::HeadRule) to a minimal
//! two-level form with Quine–McCluskey:
//!
//! - [`bnid`] - ternary implicant vectors and the merge step
//! - [`acomp`] - truth tabulation, prime generation, cover selection
//!   and reassembly into a rule tree
//! - [`Algebra`] - the entry point that picks the smaller of the
//!   sum-of-products and product-of-sums forms
//!
//! # Example
//!
//! ```
//! use halfspace_algebra::{Algebra, Simplified};
//!
//! let algebra = Algebra::default();
//! let result = algebra.simplify_str("1 2 + 1 -2").unwrap();
//! match result.outcome {
//!     Simplified::Rule(rule) => assert_eq!(rule.to_string(), "1"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

pub mod acomp;
mod algebra;
pub mod bnid;
pub mod error;

pub use acomp::{Acomp, Form};
pub use algebra::{Algebra, AlgebraConfig, Simplification, Simplified};
pub use bnid::{BnId, Tri};
pub use error::{AlgebraError, Result};
