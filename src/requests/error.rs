use thiserror::Error;

use crate::ident::DeskId;

/// Requests that cannot be tied to the desk table.
///
/// Referential errors reject the whole run: dropping the request silently
/// would change who gets scheduled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("request from {student} names unknown desk {desk}")]
    UnknownDesk { student: String, desk: DeskId },

    #[error("request for desk {0} has an empty student name")]
    EmptyStudentName(DeskId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_desk_display() {
        let e = RequestError::UnknownDesk {
            student: "ada".to_string(),
            desk: DeskId::from("999"),
        };
        assert_eq!(e.to_string(), "request from ada names unknown desk 999");
    }
}
