use std::time::Instant;

use num_format::{Locale, ToFormattedString};

use crate::database::commands::{CommandResponse, Control, RegistryCommand};
use crate::database::options::DatabaseOptions;
use crate::database::registry::registry::{AddressBook, ApplyErrors};
use crate::database::registry::view::Views;
use crate::model::group::Group;
use crate::model::person::Person;
use crate::model::reminder::Reminder;
use crate::model::statement::{Statement, StatementResult};
use crate::persistence::snapshot::SnapshotManager;
use crate::persistence::storage::file::FileStorage;

/// Owns the canonical registry, the live views over it, and the snapshot
/// manager. Commands run one at a time: the in-memory mutation settles
/// first, then the dataset is written to disk, then the response goes back
/// to the caller.
pub struct Database {
    address_book: AddressBook,
    views: Views,
    snapshot_manager: SnapshotManager,
    options: DatabaseOptions,
}

impl Database {
    pub fn open(options: DatabaseOptions) -> Self {
        let storage = FileStorage::new(options.data_directory.clone());

        let mut database = Self {
            address_book: AddressBook::new(),
            views: Views::new(),
            snapshot_manager: SnapshotManager::new(Box::new(storage)),
            options,
        };

        if database.options.restore {
            database.restore();
        }

        database
    }

    #[cfg(test)]
    pub fn new_test() -> Self {
        Database::open(DatabaseOptions::new_test())
    }

    /// A restore that fails for any reason falls back to an empty, valid
    /// dataset; a broken document on disk must not take the application down.
    fn restore(&mut self) {
        let now = Instant::now();

        match self.snapshot_manager.restore_registry() {
            Ok(address_book) => {
                self.address_book = address_book;

                log::info!(
                    "✅ Successful Restore [Duration: {}ms]",
                    now.elapsed().as_millis(),
                );

                log::info!(
                    "📀 Data               [People: {}, Groups: {}, Reminders: {}]",
                    self.address_book
                        .person_count()
                        .to_formatted_string(&Locale::en),
                    self.address_book
                        .group_count()
                        .to_formatted_string(&Locale::en),
                    self.address_book
                        .reminder_count()
                        .to_formatted_string(&Locale::en),
                );
            }
            Err(err) => {
                log::warn!("⚠️  Starting with an empty dataset, restore failed: {}", err);

                self.address_book = AddressBook::new();
            }
        }
    }

    pub fn execute(&mut self, command: RegistryCommand) -> CommandResponse {
        log::info!("Received command: {:?}", command);

        match command {
            RegistryCommand::Statement(statement) => {
                let is_mutation = statement.is_mutation();

                let result = match self.apply_statement(statement) {
                    Ok(result) => result,
                    Err(err) => return CommandResponse::error(&format!("{}", err)),
                };

                // Persistence happens strictly after the mutation has
                // settled, never interleaved with it
                if is_mutation {
                    if let Err(err) = self.snapshot_manager.create_snapshot(&self.address_book) {
                        return CommandResponse::error(&format!(
                            "Applied in memory but unable to persist the dataset: {}",
                            err
                        ));
                    }
                }

                CommandResponse::Statement(result)
            }
            RegistryCommand::Control(control) => self.apply_control(control),
        }
    }

    fn apply_statement(&mut self, statement: Statement) -> Result<StatementResult, ApplyErrors> {
        let statement_result = match statement {
            Statement::AddPerson(person) => {
                self.address_book.add_person(person.clone())?;
                self.views.people.reset();

                StatementResult::SinglePerson(person)
            }
            Statement::AddGroup(name) => {
                let group = Group::new(self.address_book.next_cid(), name);

                self.address_book.add_group(group.clone())?;
                self.views.groups.reset();

                StatementResult::SingleGroup(group)
            }
            Statement::AddReminder(cid, reminder) => {
                self.address_book.add_reminder(&cid, reminder)?;
                self.views.reminders.reset();

                StatementResult::SuccessStatus(format!("Added reminder to group {}", cid))
            }
            Statement::RemovePerson(pid) => {
                let removed = self.address_book.remove_person(&pid)?;

                StatementResult::SinglePerson(removed)
            }
            Statement::RemoveGroup(cid) => {
                let removed = self.address_book.remove_group(&cid)?;

                StatementResult::SingleGroup(removed)
            }
            Statement::RemoveReminder(cid, reminder) => {
                self.address_book.remove_reminder(&cid, &reminder)?;

                StatementResult::SuccessStatus(format!("Removed reminder from group {}", cid))
            }
            Statement::SetPerson(pid, person) => {
                let current = person.clone();

                self.address_book.set_person(&pid, person)?;

                StatementResult::SinglePerson(current)
            }
            Statement::SetGroup(cid, group) => {
                let current = group.clone();

                self.address_book.set_group(&cid, group)?;

                StatementResult::SingleGroup(current)
            }
            Statement::Enrol(cid, pid) => {
                let newly_added = self.address_book.enrol(&cid, &pid)?;

                StatementResult::MembershipChanged(newly_added)
            }
            Statement::Expel(cid, pid) => {
                let removed = self.address_book.expel(&cid, &pid)?;

                StatementResult::MembershipChanged(removed)
            }
            Statement::FindPeople(query) => {
                self.views
                    .people
                    .update(Box::new(move |person| query.matches(person)));

                StatementResult::People(self.filtered_people().into_iter().cloned().collect())
            }
            Statement::FindGroups(query) => {
                self.views
                    .groups
                    .update(Box::new(move |group| query.matches(group)));

                StatementResult::Groups(self.filtered_groups().into_iter().cloned().collect())
            }
            Statement::FindReminders(query) => {
                self.views
                    .reminders
                    .update(Box::new(move |reminder| query.matches(reminder)));

                StatementResult::Reminders(self.filtered_reminders().into_iter().cloned().collect())
            }
            Statement::ListMembers(cid) => {
                let members = self.address_book.members_of(&cid)?;

                StatementResult::People(members.into_iter().cloned().collect())
            }
            Statement::ListAll => {
                self.views.reset_all();

                StatementResult::SuccessStatus(
                    "Listed all people, groups and reminders".to_string(),
                )
            }
        };

        Ok(statement_result)
    }

    fn apply_control(&mut self, control: Control) -> CommandResponse {
        match control {
            Control::Save => match self.snapshot_manager.create_snapshot(&self.address_book) {
                Ok(()) => CommandResponse::control_success("Successfully saved the dataset"),
                Err(err) => {
                    CommandResponse::error(&format!("Unable to save the dataset: {}", err))
                }
            },
            Control::Reset => {
                self.address_book.reset();
                self.views.reset_all();

                match self.snapshot_manager.create_snapshot(&self.address_book) {
                    Ok(()) => CommandResponse::control_success("Successfully reset the dataset"),
                    Err(err) => CommandResponse::error(&format!(
                        "Reset in memory but unable to persist the dataset: {}",
                        err
                    )),
                }
            }
            Control::Shutdown => CommandResponse::control_exit("Shutting down"),
        }
    }

    // -- Read-only accessors for the presentation layer

    pub fn filtered_people(&self) -> Vec<&Person> {
        self.views.people.read(self.address_book.people())
    }

    pub fn filtered_groups(&self) -> Vec<&Group> {
        self.views.groups.read(self.address_book.groups())
    }

    pub fn filtered_reminders(&self) -> Vec<&Reminder> {
        self.views.reminders.read(self.address_book.reminders())
    }

    pub fn address_book(&self) -> &AddressBook {
        &self.address_book
    }
}
