mod edit_record;
mod trigger_record;

pub use edit_record::{EditRecord, EditScope};
pub use trigger_record::{TriggerAction, TriggerRecord};
