pub mod consts {
    pub mod consts;
}

pub mod model {
    pub mod group;
    pub mod person;
    pub mod reminder;
    pub mod statement;
}

pub mod database {
    pub mod commands;
    pub mod database;
    pub mod options;

    pub mod registry {
        pub mod registry;
        pub mod view;
    }
}

pub mod persistence;
