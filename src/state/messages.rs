//! User-facing texts of the dialogue

pub const CANCEL_LABEL: &str = "/cancel";

pub const START: &str = "Hi, I am FairBooking Bot! \
You can use me to book appointments with the exhibitors of a fair. \
Have a look at /help for a comprehensive command description!";

pub const HELP: &str = "Hi, I am FairBooking Bot!\n\
Here is a list of my commands divided by functions:\n\
\nGeneral information:\n\n\
/fairs: show all the fairs and their descriptions\n\
/events: show all events of a fair and their descriptions\n\
/whoami: show the metadata associated with this chat\n\
\nManage your bookings:\n\n\
/book: book a slot for an event\n\
/unbook: cancel your booking for a slot\n\
/mybookings: show information about all your active bookings\n\
\nManage your events:\n\n\
/publish: create a new event\n\
/changedes: change the description of an event of yours\n\
/newslot: add a new bookable slot to an event of yours\n\
/deleteslot: delete a slot from an event of yours\n\
/deleteevent: delete an event and all associated slots\n\
/myevents: show information about all the events you own";

pub const HELP_ADMIN: &str = "\n\nAdministration:\n\n\
/newfair: create a new fair\n\
/deletefair: delete a fair, keeping its events";

pub const ALREADY_ACTIVE: &str = "Command already active.";
pub const CANCELLED: &str = "Operation cancelled.";
pub const NOTHING_TO_CANCEL: &str = "There is no active command to cancel.";
pub const UNRECOGNIZED: &str = "Unknown input, operation cancelled.";
pub const STALE_SELECTION: &str = "This selection is no longer active, please run the command again.";
pub const STALE_RECORD: &str = "The selected item is no longer available, operation cancelled.";
pub const FREE_TEXT: &str = "I can't answer to free text, please use /help to see the list of available commands!";
pub const ADMIN_ONLY: &str = "This command is reserved to administrators.";
pub const RATE_LIMITED: &str = "You are sending requests too quickly, please wait a moment.";
pub const INTERNAL_ERROR: &str = "Something went wrong, operation cancelled. Please try again later.";

pub const SELECT_FAIR: &str = "Please select a fair:";
pub const SELECT_EVENT: &str = "Please select an event:";
pub const SELECT_OWN_EVENT: &str = "Please select an event of yours:";
pub const SELECT_FAIR_TO_DELETE: &str = "Please select the fair to delete:";
pub const SELECT_BOOKING: &str = "Which booking do you want to cancel:";

pub const NO_FAIRS: &str = "No fairs registered yet.";
pub const NO_FAIRS_CANCELLED: &str = "No fairs registered yet, operation cancelled.";
pub const NO_EVENTS_IN_FAIR: &str = "No events registered in this fair yet.";
pub const NO_OWN_EVENTS: &str = "You have no events yet, operation cancelled.";
pub const NO_BOOKINGS: &str = "You have currently no bookings.";
pub const NO_SLOTS_YET: &str = "No slot available yet.";
pub const NO_DATES: &str = "No dates available for this event.";
pub const NO_TIMES: &str = "No time slots available for this date.";
pub const NO_SLOTS_IN_EVENT: &str = "You have currently no slots in this event.";

pub const ASK_EVENT_NAME: &str = "Please, type the name of your event";
pub const ASK_EVENT_DESCRIPTION: &str = "Please, type the description of your event";
pub const ASK_SLOT_TIMES: &str = "Please, type the time of your event, in the following format:\n\n\
YYYY-MM-DD HH:MM:SS\nYYYY-MM-DD HH:MM:SS\n\n\
Where first row is starting time and second row is end time.";
pub const ASK_FAIR_NAME: &str = "Please, type the name of the fair";
pub const ASK_FAIR_DESCRIPTION: &str = "Please, type the description of the fair";

pub const BAD_SLOT_FORMAT: &str = "The provided date doesn't match the format, operation cancelled.";
pub const BAD_SLOT_RANGE: &str = "The start time must come before the end time, operation cancelled.";
pub const SLOT_TAKEN: &str = "Sorry, this slot has just been taken by someone else, operation cancelled. \
Use /book to choose another one.";
pub const EMPTY_TEXT: &str = "The text cannot be empty, operation cancelled.";

pub const CONFIRM_UNBOOK: &str = "Unbook slot";
pub const CONFIRM_DELETE_SLOT: &str = "Delete slot";
pub const CONFIRM_DELETE_EVENT: &str = "Delete event";
pub const CONFIRM_DELETE_FAIR: &str = "Delete fair";

/// Reply to a command nobody handles
pub fn unknown_command(command: &str) -> String {
    format!(
        "Unrecognized command: {}, please use /help to see the list of available commands!",
        command
    )
}

/// Reply when carried text would not fit in a selection token
pub fn text_too_long(max_bytes: usize) -> String {
    format!(
        "The text is too long to be attached to a selection (at most {} bytes), operation cancelled.",
        max_bytes
    )
}

pub fn all_slots_booked(total: i64) -> String {
    format!("All the {} slots are booked.", total)
}
