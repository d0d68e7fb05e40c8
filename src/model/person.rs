use crate::consts::consts::Pid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Person {
    pub pid: Pid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Person {
    pub fn new(pid: Pid, name: String, phone: Option<String>, email: Option<String>) -> Self {
        Person {
            pid,
            name,
            phone,
            email,
        }
    }

    pub fn new_test() -> Self {
        Person {
            pid: Pid(1),
            name: "Full Name".to_string(),
            phone: None,
            email: Some("Email".to_string()),
        }
    }
}
