use crate::model::group::Group;
use crate::model::person::Person;
use crate::model::reminder::Reminder;

pub type Predicate<T> = Box<dyn Fn(&T) -> bool>;

/// A live, predicate-restricted projection of a canonical collection. The
/// view owns only its predicate, never a copy of the data: `read` filters
/// whatever the backing collection holds at that moment, so registry
/// mutations are visible on the next read without a refresh call.
pub struct FilteredView<T> {
    predicate: Option<Predicate<T>>,
}

impl<T> FilteredView<T> {
    pub fn new() -> Self {
        Self { predicate: None }
    }

    pub fn update(&mut self, predicate: Predicate<T>) {
        self.predicate = Some(predicate);
    }

    /// Back to matching the full canonical collection
    pub fn reset(&mut self) {
        self.predicate = None;
    }

    #[tracing::instrument(skip_all)]
    pub fn read<'a>(&self, items: impl Iterator<Item = &'a T>) -> Vec<&'a T>
    where
        T: 'a,
    {
        match &self.predicate {
            Some(predicate) => items.filter(|item| predicate(item)).collect(),
            None => items.collect(),
        }
    }
}

impl<T> Default for FilteredView<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One view per canonical collection
#[derive(Default)]
pub struct Views {
    pub people: FilteredView<Person>,
    pub groups: FilteredView<Group>,
    pub reminders: FilteredView<Reminder>,
}

impl Views {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_all(&mut self) {
        self.people.reset();
        self.groups.reset();
        self.reminders.reset();
    }
}

#[derive(Clone, Debug)]
pub enum QueryMatch {
    Value(String),
    Null,
    NotNull,
    Any,
}

impl QueryMatch {
    fn matches_required(&self, value: &str) -> bool {
        match self {
            QueryMatch::Value(expected) => value == expected,
            // Required fields are never null, these checks are static
            QueryMatch::NotNull => true,
            QueryMatch::Null => false,
            QueryMatch::Any => true,
        }
    }

    fn matches_optional(&self, value: &Option<String>) -> bool {
        match self {
            QueryMatch::Value(expected) => value.as_deref() == Some(expected.as_str()),
            QueryMatch::Null => value.is_none(),
            QueryMatch::NotNull => value.is_some(),
            QueryMatch::Any => true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PersonQuery {
    pub name: QueryMatch,
    pub phone: QueryMatch,
    pub email: QueryMatch,
}

impl PersonQuery {
    pub fn match_all() -> Self {
        PersonQuery {
            name: QueryMatch::Any,
            phone: QueryMatch::Any,
            email: QueryMatch::Any,
        }
    }

    pub fn matches(&self, person: &Person) -> bool {
        self.name.matches_required(&person.name)
            && self.phone.matches_optional(&person.phone)
            && self.email.matches_optional(&person.email)
    }
}

#[derive(Clone, Debug)]
pub struct GroupQuery {
    pub name: QueryMatch,
}

impl GroupQuery {
    pub fn match_all() -> Self {
        GroupQuery {
            name: QueryMatch::Any,
        }
    }

    pub fn matches(&self, group: &Group) -> bool {
        self.name.matches_required(group.name.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct ReminderQuery {
    pub name: QueryMatch,
    pub date: QueryMatch,
}

impl ReminderQuery {
    pub fn match_all() -> Self {
        ReminderQuery {
            name: QueryMatch::Any,
            date: QueryMatch::Any,
        }
    }

    pub fn matches(&self, reminder: &Reminder) -> bool {
        self.name.matches_required(&reminder.name)
            && self.date.matches_required(&reminder.date)
    }
}
