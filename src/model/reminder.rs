/// A scheduled note owned by a single group. Reminders carry no id of their
/// own, two reminders are the same entity exactly when every field matches.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reminder {
    pub name: String,
    pub date: String,
}

impl Reminder {
    pub fn new(name: String, date: String) -> Self {
        Reminder { name, date }
    }

    pub fn new_test() -> Self {
        Reminder {
            name: "Collect membership fees".to_string(),
            date: "2024-01-01".to_string(),
        }
    }
}
