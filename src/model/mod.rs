pub mod convert;
pub mod data_core;
pub mod mutation;
pub mod property;
pub mod samples;
pub mod shadow_tree;
