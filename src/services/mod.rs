pub mod deriver;
pub mod earnings;
pub mod orats;
