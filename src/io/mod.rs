//! Input loading and report output for the command-line tool.
//!
//! None of this is needed to use the engine; it adapts the desk CSV, the
//! requests JSON and the parameters YAML to engine types, and turns a
//! [`SchedulePlan`](crate::SchedulePlan) back into files.

mod error;
mod load;
mod report;

pub use error::LoadError;
pub use load::{
    floor_of_office, load_desks, load_parameters, load_requests, read_desks, read_parameters,
    read_requests,
};
pub use report::{office_report, run_summary, student_report, write_csv, write_reports};
