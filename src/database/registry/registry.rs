use std::collections::BTreeMap;

use thiserror::Error;

use crate::consts::consts::{Cid, Pid};
use crate::model::group::Group;
use crate::model::person::Person;
use crate::model::reminder::Reminder;

#[derive(Error, Debug, PartialEq)]
pub enum ApplyErrors {
    // CRUD - CREATE
    #[error("Cannot add, a person already exists with this id: {0}")]
    DuplicatePerson(Pid),

    #[error("Cannot add, a group already exists with this id: {0}")]
    DuplicateGroup(Cid),

    #[error("Cannot add, the group already has this reminder: {0}")]
    DuplicateReminder(String),

    // CRUD - GET / UPDATE / DELETE
    #[error("Not found, no person exists with this id: {0}")]
    PersonNotFound(Pid),

    #[error("Not found, no group exists with this id: {0}")]
    GroupNotFound(Cid),

    #[error("Not found, the group does not have this reminder: {0}")]
    ReminderNotFound(String),
}

/// The canonical, uniqueness-enforcing store of every entity. People and
/// groups are keyed by id, so the iteration order of each collection is
/// ascending id. Reminders live inside their owning group; the registry's
/// reminder collection is the concatenation of every group's set.
///
/// Every operation checks its constraints before touching any collection, a
/// failed call leaves the registry exactly as it was.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AddressBook {
    people: BTreeMap<Pid, Person>,
    groups: BTreeMap<Cid, Group>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    // -- People

    pub fn add_person(&mut self, person: Person) -> Result<(), ApplyErrors> {
        if self.people.contains_key(&person.pid) {
            return Err(ApplyErrors::DuplicatePerson(person.pid));
        }

        self.people.insert(person.pid, person);

        Ok(())
    }

    /// Existence by identity-and-value: the person at this id must match
    /// every field, a same-id person with edited fields does not count.
    pub fn has_person(&self, person: &Person) -> bool {
        self.people.get(&person.pid) == Some(person)
    }

    /// Also expels the person from every group's membership set, membership
    /// must never reference an unregistered id.
    pub fn remove_person(&mut self, pid: &Pid) -> Result<Person, ApplyErrors> {
        let removed = self
            .people
            .remove(pid)
            .ok_or(ApplyErrors::PersonNotFound(*pid))?;

        for group in self.groups.values_mut() {
            group.expel(pid);
        }

        Ok(removed)
    }

    /// Replace-by-identity, returns the previous person. The replacement may
    /// carry a new id, in which case every membership set is re-keyed.
    pub fn set_person(&mut self, pid: &Pid, person: Person) -> Result<Person, ApplyErrors> {
        if !self.people.contains_key(pid) {
            return Err(ApplyErrors::PersonNotFound(*pid));
        }

        if person.pid != *pid && self.people.contains_key(&person.pid) {
            return Err(ApplyErrors::DuplicatePerson(person.pid));
        }

        let previous = self
            .people
            .remove(pid)
            .expect("Checked above, the person exists");

        if person.pid != *pid {
            for group in self.groups.values_mut() {
                if group.expel(pid) {
                    group.enrol(person.pid);
                }
            }
        }

        self.people.insert(person.pid, person);

        Ok(previous)
    }

    pub fn find_person_from_pid(&self, pid: &Pid) -> Result<&Person, ApplyErrors> {
        self.people
            .get(pid)
            .ok_or(ApplyErrors::PersonNotFound(*pid))
    }

    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.people.values()
    }

    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    pub fn next_pid(&self) -> Pid {
        Pid(self.people.keys().next_back().map_or(0, |pid| pid.0) + 1)
    }

    // -- Groups

    pub fn add_group(&mut self, group: Group) -> Result<(), ApplyErrors> {
        if self.groups.contains_key(&group.cid) {
            return Err(ApplyErrors::DuplicateGroup(group.cid));
        }

        for pid in group.members() {
            if !self.people.contains_key(pid) {
                return Err(ApplyErrors::PersonNotFound(*pid));
            }
        }

        self.groups.insert(group.cid, group);

        Ok(())
    }

    pub fn has_group(&self, group: &Group) -> bool {
        self.groups.get(&group.cid) == Some(group)
    }

    pub fn remove_group(&mut self, cid: &Cid) -> Result<Group, ApplyErrors> {
        self.groups
            .remove(cid)
            .ok_or(ApplyErrors::GroupNotFound(*cid))
    }

    /// Replace-by-identity, returns the previous group. The replacement's
    /// membership set must only reference registered people.
    pub fn set_group(&mut self, cid: &Cid, group: Group) -> Result<Group, ApplyErrors> {
        if !self.groups.contains_key(cid) {
            return Err(ApplyErrors::GroupNotFound(*cid));
        }

        if group.cid != *cid && self.groups.contains_key(&group.cid) {
            return Err(ApplyErrors::DuplicateGroup(group.cid));
        }

        for pid in group.members() {
            if !self.people.contains_key(pid) {
                return Err(ApplyErrors::PersonNotFound(*pid));
            }
        }

        let previous = self
            .groups
            .remove(cid)
            .expect("Checked above, the group exists");

        self.groups.insert(group.cid, group);

        Ok(previous)
    }

    pub fn find_group_from_cid(&self, cid: &Cid) -> Result<&Group, ApplyErrors> {
        self.groups.get(cid).ok_or(ApplyErrors::GroupNotFound(*cid))
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn next_cid(&self) -> Cid {
        Cid(self.groups.keys().next_back().map_or(0, |cid| cid.0) + 1)
    }

    // -- Reminders

    pub fn add_reminder(&mut self, cid: &Cid, reminder: Reminder) -> Result<(), ApplyErrors> {
        let group = self
            .groups
            .get_mut(cid)
            .ok_or(ApplyErrors::GroupNotFound(*cid))?;

        let name = reminder.name.clone();

        if !group.add_reminder(reminder) {
            return Err(ApplyErrors::DuplicateReminder(name));
        }

        Ok(())
    }

    pub fn has_reminder(&self, reminder: &Reminder) -> bool {
        self.groups.values().any(|group| group.has_reminder(reminder))
    }

    pub fn remove_reminder(&mut self, cid: &Cid, reminder: &Reminder) -> Result<(), ApplyErrors> {
        let group = self
            .groups
            .get_mut(cid)
            .ok_or(ApplyErrors::GroupNotFound(*cid))?;

        if !group.remove_reminder(reminder) {
            return Err(ApplyErrors::ReminderNotFound(reminder.name.clone()));
        }

        Ok(())
    }

    pub fn reminders(&self) -> impl Iterator<Item = &Reminder> {
        self.groups.values().flat_map(|group| group.reminders())
    }

    pub fn reminder_count(&self) -> usize {
        self.groups.values().map(|group| group.reminder_count()).sum()
    }

    // -- Membership

    /// Returns whether the person was newly added to the group's set.
    /// Both the group and the person must already be registered.
    pub fn enrol(&mut self, cid: &Cid, pid: &Pid) -> Result<bool, ApplyErrors> {
        if !self.people.contains_key(pid) {
            return Err(ApplyErrors::PersonNotFound(*pid));
        }

        let group = self
            .groups
            .get_mut(cid)
            .ok_or(ApplyErrors::GroupNotFound(*cid))?;

        Ok(group.enrol(*pid))
    }

    /// Returns whether the person was a member and has been removed.
    pub fn expel(&mut self, cid: &Cid, pid: &Pid) -> Result<bool, ApplyErrors> {
        if !self.people.contains_key(pid) {
            return Err(ApplyErrors::PersonNotFound(*pid));
        }

        let group = self
            .groups
            .get_mut(cid)
            .ok_or(ApplyErrors::GroupNotFound(*cid))?;

        Ok(group.expel(pid))
    }

    /// A group's members resolved to the canonical person records, in
    /// ascending id order.
    pub fn members_of(&self, cid: &Cid) -> Result<Vec<&Person>, ApplyErrors> {
        let group = self.find_group_from_cid(cid)?;

        Ok(group
            .members()
            .map(|pid| {
                self.people
                    .get(pid)
                    .expect("Membership should only reference registered people")
            })
            .collect())
    }

    // -- Lifecycle

    pub fn reset(&mut self) {
        self.people.clear();
        self.groups.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::model::group::GroupName;

    use super::*;

    fn add_test_person(address_book: &mut AddressBook, pid: u32, name: &str) -> Person {
        let person = Person::new(Pid(pid), name.to_string(), None, None);

        address_book
            .add_person(person.clone())
            .expect("id should be free");

        person
    }

    fn add_test_group(address_book: &mut AddressBook, cid: u32, name: &str) -> Group {
        let group = Group::new(Cid(cid), GroupName::new(name).expect("test name is valid"));

        address_book
            .add_group(group.clone())
            .expect("id should be free");

        group
    }

    mod add {
        use super::*;

        #[test]
        fn adding_a_person_with_a_taken_id_fails() {
            // Given a registry with one person
            let mut address_book = AddressBook::new();

            add_test_person(&mut address_book, 10, "Alice");

            // When we add another person under the same id
            let result =
                address_book.add_person(Person::new(Pid(10), "Mallory".to_string(), None, None));

            // Then the add is rejected and the original is untouched
            assert_eq!(result, Err(ApplyErrors::DuplicatePerson(Pid(10))));
            assert_eq!(
                address_book
                    .find_person_from_pid(&Pid(10))
                    .expect("original person should remain")
                    .name,
                "Alice"
            );
        }

        #[test]
        fn adding_a_group_with_a_taken_id_fails() {
            let mut address_book = AddressBook::new();

            add_test_group(&mut address_book, 1, "Chess Club");

            let duplicate = Group::new(Cid(1), GroupName::new("Go Club").expect("valid"));

            assert_eq!(
                address_book.add_group(duplicate),
                Err(ApplyErrors::DuplicateGroup(Cid(1)))
            );
        }

        #[test]
        fn adding_a_group_with_unregistered_members_fails() {
            let mut address_book = AddressBook::new();

            let group = Group::with_members(
                Cid(1),
                GroupName::new("Chess Club").expect("valid"),
                BTreeSet::from([Pid(99)]),
                BTreeSet::new(),
            );

            assert_eq!(
                address_book.add_group(group),
                Err(ApplyErrors::PersonNotFound(Pid(99)))
            );
            assert_eq!(address_book.group_count(), 0);
        }

        #[test]
        fn adding_the_same_reminder_twice_fails() {
            let mut address_book = AddressBook::new();

            add_test_group(&mut address_book, 1, "Chess Club");

            let reminder = Reminder::new_test();

            address_book
                .add_reminder(&Cid(1), reminder.clone())
                .expect("first add should succeed");

            assert_eq!(
                address_book.add_reminder(&Cid(1), reminder.clone()),
                Err(ApplyErrors::DuplicateReminder(reminder.name))
            );
        }
    }

    mod has {
        use super::*;

        #[test]
        fn has_person_requires_every_field_to_match() {
            let mut address_book = AddressBook::new();

            let person = add_test_person(&mut address_book, 10, "Alice");

            // Same id, different fields, is a different person
            let edited = Person::new(Pid(10), "Alice".to_string(), Some("999".to_string()), None);

            assert!(address_book.has_person(&person));
            assert!(!address_book.has_person(&edited));
        }

        #[test]
        fn has_group_requires_every_field_to_match() {
            let mut address_book = AddressBook::new();

            let group = add_test_group(&mut address_book, 1, "Chess Club");

            let renamed = Group::new(Cid(1), GroupName::new("Go Club").expect("valid"));

            assert!(address_book.has_group(&group));
            assert!(!address_book.has_group(&renamed));
        }

        #[test]
        fn has_reminder_searches_every_group() {
            let mut address_book = AddressBook::new();

            add_test_group(&mut address_book, 1, "Chess Club");
            add_test_group(&mut address_book, 2, "Go Club");

            let reminder = Reminder::new_test();

            address_book
                .add_reminder(&Cid(2), reminder.clone())
                .expect("group exists");

            assert!(address_book.has_reminder(&reminder));
            assert!(!address_book.has_reminder(&Reminder::new(
                "Unknown".to_string(),
                "2024-01-01".to_string()
            )));
        }
    }

    mod remove {
        use super::*;

        #[test]
        fn removing_an_absent_person_fails() {
            let mut address_book = AddressBook::new();

            assert_eq!(
                address_book.remove_person(&Pid(10)),
                Err(ApplyErrors::PersonNotFound(Pid(10)))
            );
        }

        #[test]
        fn removing_a_person_expels_them_from_every_group() {
            // Given a person enrolled in two groups
            let mut address_book = AddressBook::new();

            let person = add_test_person(&mut address_book, 10, "Alice");
            add_test_group(&mut address_book, 1, "Chess Club");
            add_test_group(&mut address_book, 2, "Go Club");

            address_book.enrol(&Cid(1), &person.pid).expect("both exist");
            address_book.enrol(&Cid(2), &person.pid).expect("both exist");

            // When the person is removed from the registry
            address_book
                .remove_person(&person.pid)
                .expect("person exists");

            // Then no group still lists them
            for cid in [Cid(1), Cid(2)] {
                let group = address_book
                    .find_group_from_cid(&cid)
                    .expect("group exists");

                assert!(!group.is_member(&person.pid));
            }
        }

        #[test]
        fn removing_an_absent_reminder_fails() {
            let mut address_book = AddressBook::new();

            add_test_group(&mut address_book, 1, "Chess Club");

            let reminder = Reminder::new_test();

            assert_eq!(
                address_book.remove_reminder(&Cid(1), &reminder),
                Err(ApplyErrors::ReminderNotFound(reminder.name))
            );
        }
    }

    mod set {
        use super::*;

        #[test]
        fn set_person_replaces_under_the_same_id() {
            let mut address_book = AddressBook::new();

            let person = add_test_person(&mut address_book, 10, "Alice");

            let edited = Person::new(
                Pid(10),
                "Alice".to_string(),
                None,
                Some("alice@example.com".to_string()),
            );

            let previous = address_book
                .set_person(&person.pid, edited.clone())
                .expect("person exists");

            assert_eq!(previous, person);
            assert_eq!(
                address_book.find_person_from_pid(&Pid(10)),
                Ok(&edited)
            );
        }

        #[test]
        fn set_person_with_a_new_id_rekeys_membership() {
            // Given an enrolled person
            let mut address_book = AddressBook::new();

            let person = add_test_person(&mut address_book, 10, "Alice");
            add_test_group(&mut address_book, 1, "Chess Club");
            address_book.enrol(&Cid(1), &person.pid).expect("both exist");

            // When the replacement carries a new id
            let renumbered = Person::new(Pid(20), "Alice".to_string(), None, None);

            address_book
                .set_person(&Pid(10), renumbered)
                .expect("person exists");

            // Then the group tracks the new id and the old id is gone
            let group = address_book
                .find_group_from_cid(&Cid(1))
                .expect("group exists");

            assert!(group.is_member(&Pid(20)));
            assert!(!group.is_member(&Pid(10)));
            assert_eq!(
                address_book.find_person_from_pid(&Pid(10)),
                Err(ApplyErrors::PersonNotFound(Pid(10)))
            );
        }

        #[test]
        fn set_person_to_a_taken_id_fails() {
            let mut address_book = AddressBook::new();

            add_test_person(&mut address_book, 10, "Alice");
            add_test_person(&mut address_book, 20, "Bob");

            let onto_bob = Person::new(Pid(20), "Alice".to_string(), None, None);

            assert_eq!(
                address_book.set_person(&Pid(10), onto_bob),
                Err(ApplyErrors::DuplicatePerson(Pid(20)))
            );
        }

        #[test]
        fn set_group_replaces_under_the_same_id() {
            let mut address_book = AddressBook::new();

            add_test_group(&mut address_book, 1, "Chess Club");

            let renamed = Group::new(Cid(1), GroupName::new("Chess Society").expect("valid"));

            address_book
                .set_group(&Cid(1), renamed.clone())
                .expect("group exists");

            assert_eq!(address_book.find_group_from_cid(&Cid(1)), Ok(&renamed));
        }
    }

    mod membership {
        use super::*;

        #[test]
        fn enrol_requires_a_registered_person() {
            let mut address_book = AddressBook::new();

            add_test_group(&mut address_book, 1, "Chess Club");

            assert_eq!(
                address_book.enrol(&Cid(1), &Pid(10)),
                Err(ApplyErrors::PersonNotFound(Pid(10)))
            );
        }

        #[test]
        fn enrol_requires_a_registered_group() {
            let mut address_book = AddressBook::new();

            add_test_person(&mut address_book, 10, "Alice");

            assert_eq!(
                address_book.enrol(&Cid(1), &Pid(10)),
                Err(ApplyErrors::GroupNotFound(Cid(1)))
            );
        }

        #[test]
        fn enrolling_twice_reports_already_a_member() {
            let mut address_book = AddressBook::new();

            add_test_person(&mut address_book, 10, "Alice");
            add_test_group(&mut address_book, 1, "Chess Club");

            assert_eq!(address_book.enrol(&Cid(1), &Pid(10)), Ok(true));
            assert_eq!(address_book.enrol(&Cid(1), &Pid(10)), Ok(false));

            let group = address_book
                .find_group_from_cid(&Cid(1))
                .expect("group exists");

            assert_eq!(group.member_count(), 1);
        }

        #[test]
        fn expelling_a_non_member_reports_no_change() {
            let mut address_book = AddressBook::new();

            add_test_person(&mut address_book, 10, "Alice");
            add_test_group(&mut address_book, 1, "Chess Club");

            assert_eq!(address_book.expel(&Cid(1), &Pid(10)), Ok(false));
        }

        #[test]
        fn members_resolve_to_the_canonical_person() {
            // Given an enrolled person
            let mut address_book = AddressBook::new();

            let person = add_test_person(&mut address_book, 10, "Alice");
            add_test_group(&mut address_book, 1, "Chess Club");
            address_book.enrol(&Cid(1), &person.pid).expect("both exist");

            // When the person is edited under the same id
            let edited = Person::new(Pid(10), "Alice Smith".to_string(), None, None);

            address_book
                .set_person(&Pid(10), edited.clone())
                .expect("person exists");

            // Then the group's members reflect the edit with no extra work
            let members = address_book.members_of(&Cid(1)).expect("group exists");

            assert_eq!(members, vec![&edited]);
        }
    }

    mod ids {
        use super::*;

        #[test]
        fn next_ids_start_at_one_and_follow_the_maximum() {
            let mut address_book = AddressBook::new();

            assert_eq!(address_book.next_pid(), Pid(1));
            assert_eq!(address_book.next_cid(), Cid(1));

            add_test_person(&mut address_book, 10, "Alice");
            add_test_group(&mut address_book, 3, "Chess Club");

            assert_eq!(address_book.next_pid(), Pid(11));
            assert_eq!(address_book.next_cid(), Cid(4));
        }
    }
}
