use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::consts::{Cid, Pid};
use crate::database::registry::registry::AddressBook;
use crate::model::group::{Group, GroupName};
use crate::model::person::Person;
use crate::model::reminder::Reminder;

use super::storage::StorageError;

#[derive(Error, Debug)]
pub enum RestoreError {
    #[error("Unable to parse the dataset document: {0}")]
    UnableToParseDocument(#[from] serde_json::Error),

    #[error("Group {group_index}: invalid '{field}' field: {reason}")]
    MalformedField {
        group_index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("Person {0} appears with conflicting fields across groups")]
    ConflictingPerson(Pid),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The on-disk shape of the dataset. The document lists groups only; each
/// group embeds a full copy of every member's record, so a person appears
/// once per group that contains them and a person belonging to zero groups
/// is not representable. Group ids are not part of the format either: on
/// load, groups are numbered 1..n in document order.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Document {
    pub groups: Vec<GroupRecord>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GroupRecord {
    pub name: String,
    pub members: Vec<PersonRecord>,
    pub reminders: Vec<ReminderRecord>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PersonRecord {
    pub pid: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ReminderRecord {
    pub name: String,
    pub date: String,
}

impl Document {
    /// Denormalizes the registry: every group's membership ids are joined
    /// against the canonical person collection and written out by value.
    pub fn from_registry(address_book: &AddressBook) -> Self {
        let groups = address_book
            .groups()
            .map(|group| GroupRecord {
                name: group.name.to_string(),
                members: group
                    .members()
                    .map(|pid| {
                        let person = address_book
                            .find_person_from_pid(pid)
                            .expect("Membership should only reference registered people");

                        PersonRecord::from_person(person)
                    })
                    .collect(),
                reminders: group
                    .reminders()
                    .map(ReminderRecord::from_reminder)
                    .collect(),
            })
            .collect();

        Document { groups }
    }

    /// Reconciles the duplicated person copies back into one canonical
    /// record per id, then rebuilds the graph around those records. Any
    /// invalid field, or one id embedded with two different sets of field
    /// values, fails the whole load; no partially populated registry can
    /// escape this function.
    pub fn into_registry(self) -> Result<AddressBook, RestoreError> {
        // Pass one: collect the canonical person per id across every group,
        // rejecting conflicts. Identical copies collapse, whether they
        // appear twice under one group or once per group.
        let mut canonical_people: BTreeMap<Pid, Person> = BTreeMap::new();

        for (group_index, group_record) in self.groups.iter().enumerate() {
            for member in &group_record.members {
                let person = member.to_person(group_index)?;

                match canonical_people.get(&person.pid) {
                    Some(existing) if existing != &person => {
                        return Err(RestoreError::ConflictingPerson(person.pid));
                    }
                    Some(_) => {}
                    None => {
                        canonical_people.insert(person.pid, person);
                    }
                }
            }
        }

        // Pass two: register the canonical people, then attach each group's
        // membership by id only.
        let mut address_book = AddressBook::new();

        for person in canonical_people.into_values() {
            address_book
                .add_person(person)
                .expect("Canonical people are keyed by id and cannot collide");
        }

        for (group_index, group_record) in self.groups.into_iter().enumerate() {
            let cid = Cid(group_index as u32 + 1);
            let group = group_record.into_group(group_index, cid)?;

            address_book
                .add_group(group)
                .expect("Group ids are sequential and members were registered in pass one");
        }

        Ok(address_book)
    }
}

impl GroupRecord {
    fn into_group(self, group_index: usize, cid: Cid) -> Result<Group, RestoreError> {
        let name = GroupName::new(&self.name).map_err(|e| RestoreError::MalformedField {
            group_index,
            field: "name",
            reason: e.to_string(),
        })?;

        let members: BTreeSet<Pid> = self
            .members
            .iter()
            .map(|member| member.validated_pid(group_index))
            .collect::<Result<_, _>>()?;

        let reminders: BTreeSet<Reminder> = self
            .reminders
            .into_iter()
            .map(ReminderRecord::into_reminder)
            .collect();

        Ok(Group::with_members(cid, name, members, reminders))
    }
}

impl PersonRecord {
    fn from_person(person: &Person) -> Self {
        PersonRecord {
            pid: person.pid.to_number() as i64,
            name: person.name.clone(),
            phone: person.phone.clone(),
            email: person.email.clone(),
        }
    }

    fn validated_pid(&self, group_index: usize) -> Result<Pid, RestoreError> {
        Pid::try_from(self.pid).map_err(|e| RestoreError::MalformedField {
            group_index,
            field: "pid",
            reason: e.to_string(),
        })
    }

    fn to_person(&self, group_index: usize) -> Result<Person, RestoreError> {
        Ok(Person {
            pid: self.validated_pid(group_index)?,
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        })
    }
}

impl ReminderRecord {
    fn from_reminder(reminder: &Reminder) -> Self {
        ReminderRecord {
            name: reminder.name.clone(),
            date: reminder.date.clone(),
        }
    }

    fn into_reminder(self) -> Reminder {
        Reminder {
            name: self.name,
            date: self.date,
        }
    }
}
