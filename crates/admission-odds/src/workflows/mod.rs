pub mod admission;
pub mod parcoursup;
