/**
* filename : mod
* author : HAMA
* date: 2025. 5. 11.
* description: 
**/

pub mod rules;
pub mod signal_analyzer;
pub mod signal_types;

pub use rules::ScoringRules;
pub use signal_analyzer::{Scores, SignalAnalyzer};
pub use signal_types::*;
