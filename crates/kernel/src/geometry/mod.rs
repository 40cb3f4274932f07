pub mod point;
pub mod predicates;
pub mod vector;
