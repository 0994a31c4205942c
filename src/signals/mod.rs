/**
* filename : mod
* author : HAMA
* date: 2025. 6. 6.
* description:
**/

pub mod rules;
pub mod signal_analyzer;
pub mod signal_types;

pub use rules::*;
pub use signal_analyzer::*;
pub use signal_types::*;
