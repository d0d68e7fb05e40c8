use std::fmt;

use thiserror::Error;

// New Type Pattern -- https://doc.rust-lang.org/rust-by-example/generics/new_types.html
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pid(pub u32);

impl Pid {
    pub fn to_number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum PidValidationError {
    #[error("Person ids must be a positive integer, got: {0}")]
    NegativeOrZero(i64),

    #[error("Person ids must fit within a u32, got: {0}")]
    TooLarge(i64),
}

impl TryFrom<i64> for Pid {
    type Error = PidValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(PidValidationError::NegativeOrZero(value));
        }

        if value > u32::MAX as i64 {
            return Err(PidValidationError::TooLarge(value));
        }

        Ok(Pid(value
            .try_into()
            .expect("Validation should have caught this")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cid(pub u32);

impl Cid {
    pub fn to_number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum CidValidationError {
    #[error("Group ids must be a positive integer, got: {0}")]
    NegativeOrZero(i64),

    #[error("Group ids must fit within a u32, got: {0}")]
    TooLarge(i64),
}

impl TryFrom<i64> for Cid {
    type Error = CidValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(CidValidationError::NegativeOrZero(value));
        }

        if value > u32::MAX as i64 {
            return Err(CidValidationError::TooLarge(value));
        }

        Ok(Cid(value
            .try_into()
            .expect("Validation should have caught this")))
    }
}
