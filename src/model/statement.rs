use crate::consts::consts::{Cid, Pid};
use crate::database::registry::view::{GroupQuery, PersonQuery, ReminderQuery};
use crate::model::group::{Group, GroupName};
use crate::model::person::Person;
use crate::model::reminder::Reminder;

/// Statements are the data operations the command layer can run against the
/// registry. Queries only change which entities the views surface, mutations
/// change the dataset itself and are followed by a snapshot write.
#[derive(Clone, Debug)]
pub enum Statement {
    AddPerson(Person),
    /// The registry assigns the next free group id
    AddGroup(GroupName),
    AddReminder(Cid, Reminder),
    RemovePerson(Pid),
    RemoveGroup(Cid),
    RemoveReminder(Cid, Reminder),
    SetPerson(Pid, Person),
    SetGroup(Cid, Group),
    Enrol(Cid, Pid),
    Expel(Cid, Pid),
    FindPeople(PersonQuery),
    FindGroups(GroupQuery),
    FindReminders(ReminderQuery),
    ListMembers(Cid),
    /// Resets every view back to its full canonical collection
    ListAll,
}

impl Statement {
    pub fn is_query(&self) -> bool {
        !self.is_mutation()
    }

    pub fn is_mutation(&self) -> bool {
        match self {
            Statement::AddPerson(_)
            | Statement::AddGroup(_)
            | Statement::AddReminder(_, _)
            | Statement::RemovePerson(_)
            | Statement::RemoveGroup(_)
            | Statement::RemoveReminder(_, _)
            | Statement::SetPerson(_, _)
            | Statement::SetGroup(_, _)
            | Statement::Enrol(_, _)
            | Statement::Expel(_, _) => true,
            Statement::FindPeople(_)
            | Statement::FindGroups(_)
            | Statement::FindReminders(_)
            | Statement::ListMembers(_)
            | Statement::ListAll => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StatementResult {
    /// Used for status messages with no entity payload
    SuccessStatus(String),
    SinglePerson(Person),
    SingleGroup(Group),
    /// Whether an enrol/expel actually changed the membership set
    MembershipChanged(bool),
    People(Vec<Person>),
    Groups(Vec<Group>),
    Reminders(Vec<Reminder>),
}

impl StatementResult {
    pub fn single_person(self) -> Person {
        if let StatementResult::SinglePerson(p) = self {
            p
        } else {
            panic!("Statement result is not of type SinglePerson")
        }
    }

    pub fn single_group(self) -> Group {
        if let StatementResult::SingleGroup(g) = self {
            g
        } else {
            panic!("Statement result is not of type SingleGroup")
        }
    }

    pub fn membership_changed(self) -> bool {
        if let StatementResult::MembershipChanged(changed) = self {
            changed
        } else {
            panic!("Statement result is not of type MembershipChanged")
        }
    }

    pub fn people(self) -> Vec<Person> {
        if let StatementResult::People(p) = self {
            p
        } else {
            panic!("Statement result is not of type People")
        }
    }

    #[allow(dead_code)]
    pub fn groups(self) -> Vec<Group> {
        if let StatementResult::Groups(g) = self {
            g
        } else {
            panic!("Statement result is not of type Groups")
        }
    }

    #[allow(dead_code)]
    pub fn reminders(self) -> Vec<Reminder> {
        if let StatementResult::Reminders(r) = self {
            r
        } else {
            panic!("Statement result is not of type Reminders")
        }
    }

    #[allow(dead_code)]
    pub fn success_status(self) -> String {
        if let StatementResult::SuccessStatus(s) = self {
            s
        } else {
            panic!("Statement result is not of type SuccessStatus")
        }
    }
}
