pub mod eligibility;
pub mod screening;
