use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::consts::consts::{Cid, Pid};
use crate::model::reminder::Reminder;

// The first character must not be a whitespace, otherwise " " (a blank
// string) becomes a valid name
static VALID_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[[:alnum:]][[:alnum:] ]*$").expect("name pattern compiles"));

#[derive(Error, Debug, PartialEq)]
pub enum GroupNameError {
    #[error(
        "Names should only contain alphanumeric characters and spaces, and it should not be blank"
    )]
    Invalid,
}

/// A group's display name, validated at construction so an invalid name can
/// never enter the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupName(String);

impl GroupName {
    pub fn new(name: &str) -> Result<Self, GroupNameError> {
        if !GroupName::is_valid(name) {
            return Err(GroupNameError::Invalid);
        }

        Ok(GroupName(name.to_string()))
    }

    pub fn is_valid(name: &str) -> bool {
        VALID_NAME.is_match(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A group holds its membership as a set of person ids. Member data always
/// resolves through the registry's canonical person collection, so a group
/// can never carry a stale copy of a member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub cid: Cid,
    pub name: GroupName,
    members: BTreeSet<Pid>,
    reminders: BTreeSet<Reminder>,
}

impl Group {
    pub fn new(cid: Cid, name: GroupName) -> Self {
        Group {
            cid,
            name,
            members: BTreeSet::new(),
            reminders: BTreeSet::new(),
        }
    }

    pub fn with_members(
        cid: Cid,
        name: GroupName,
        members: BTreeSet<Pid>,
        reminders: BTreeSet<Reminder>,
    ) -> Self {
        Group {
            cid,
            name,
            members,
            reminders,
        }
    }

    pub fn new_test() -> Self {
        Group::new(
            Cid(1),
            GroupName::new("Chess Club").expect("test name is valid"),
        )
    }

    /// Returns true if the person was newly added, false if they were
    /// already a member.
    pub fn enrol(&mut self, pid: Pid) -> bool {
        self.members.insert(pid)
    }

    /// Returns true if the person was a member and has been removed.
    pub fn expel(&mut self, pid: &Pid) -> bool {
        self.members.remove(pid)
    }

    pub fn is_member(&self, pid: &Pid) -> bool {
        self.members.contains(pid)
    }

    pub fn members(&self) -> impl Iterator<Item = &Pid> {
        self.members.iter()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn add_reminder(&mut self, reminder: Reminder) -> bool {
        self.reminders.insert(reminder)
    }

    pub fn remove_reminder(&mut self, reminder: &Reminder) -> bool {
        self.reminders.remove(reminder)
    }

    pub fn has_reminder(&self, reminder: &Reminder) -> bool {
        self.reminders.contains(reminder)
    }

    pub fn reminders(&self) -> impl Iterator<Item = &Reminder> {
        self.reminders.iter()
    }

    pub fn reminder_count(&self) -> usize {
        self.reminders.len()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    mod name_validation {
        use super::*;

        #[rstest]
        #[case("Chess Club")]
        #[case("a")]
        #[case("2nd Badminton Team")]
        #[case("Chess  Club")]
        fn valid_names_are_accepted(#[case] name: &str) {
            assert_eq!(
                GroupName::new(name),
                Ok(GroupName(name.to_string())),
                "name should be accepted: {:?}",
                name
            );
        }

        #[rstest]
        #[case("")]
        #[case(" ")]
        #[case(" Chess Club")]
        #[case("Chess-Club")]
        #[case("Chess Club!")]
        fn invalid_names_are_rejected(#[case] name: &str) {
            assert_eq!(
                GroupName::new(name),
                Err(GroupNameError::Invalid),
                "name should be rejected: {:?}",
                name
            );
        }
    }

    mod membership {
        use super::*;

        #[test]
        fn enrolling_twice_is_idempotent() {
            // Given a group with one member
            let mut group = Group::new_test();

            assert!(group.enrol(Pid(10)));

            // When we enrol the same person again
            let newly_added = group.enrol(Pid(10));

            // Then the set is unchanged and the caller is told so
            assert!(!newly_added);
            assert_eq!(group.member_count(), 1);
        }

        #[test]
        fn expelling_a_non_member_is_a_no_op() {
            // Given a group with no members
            let mut group = Group::new_test();

            // When we expel someone who was never enrolled
            let removed = group.expel(&Pid(10));

            // Then nothing changed
            assert!(!removed);
            assert_eq!(group.member_count(), 0);
        }
    }
}
