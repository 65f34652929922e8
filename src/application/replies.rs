//! User-facing reply texts

use crate::domain::entities::ReminderTime;

pub const GREETING: &str = "Hi!\nYou can create a tablet reminder with /create and I will message you every time it is due!";

pub const ASK_NAME: &str = "What is the name of the tablet?";

pub const ASK_TIME: &str = "Great!\nNow tell me what time you take it, in the format '14:30'";

pub const INVALID_TIME: &str = "Enter a valid time in the format '14:30'";

pub const DRAFT_LOST: &str = "I lost track of that tablet, please start again with /create";

pub const BACKEND_FAILED: &str = "Could not save the reminder, please try again later";

pub fn reminder_created(time: ReminderTime) -> String {
    format!("Done! At {} you will get a message reminding you to take it!", time)
}

pub fn reminder_due(name: &str) -> String {
    format!("Time to take '{}'", name)
}
