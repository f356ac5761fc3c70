pub mod codec;
pub mod executor;
pub mod id;
pub mod intent;
pub mod lint;
pub mod model;
pub mod seed;
pub mod tree;

pub use codec::{flat_to_json, flat_to_tree, parse_flat_json, tree_to_flat};
pub use executor::apply_drop_intent;
pub use id::MenuId;
pub use intent::{DEFAULT_NEST_THRESHOLD_PX, DropSettings, EmptyDropPolicy, classify_drop};
pub use lint::{LintDiagnostic, LintSeverity, is_well_formed, lint_tree};
pub use model::*;
