pub mod evaluate;
pub mod history;
pub(crate) mod input;
pub mod pre_opening;
pub mod score;
pub mod sectors;
