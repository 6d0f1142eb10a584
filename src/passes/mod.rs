//! Passes over a `TranslationUnit`, each a plain statement + expression
//! visitor.

pub mod census;
pub mod declcheck;
pub mod fold;
pub mod printer;

pub use census::{census, CensusReport, NodeKind};
pub use declcheck::{check, CheckReport, CheckedFunction};
pub use fold::{fold, fold_expr, Folded};
pub use printer::{pretty_print, print_expr};
