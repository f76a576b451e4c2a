mod form;
mod list;

pub use form::HabitForm;
pub use list::HabitList;
