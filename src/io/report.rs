use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::floor_plan::FloorPlan;
use crate::ident::{DeskId, TimeBlock};
use crate::schedule::{Assignment, SchedulePlan};

#[derive(Serialize)]
struct ScheduleRow<'a> {
    student: &'a str,
    office: &'a str,
    desk: &'a str,
    block: &'a str,
}

/// Writes the schedule as CSV with header `student,office,desk,block`.
///
/// Rows are ordered by office, then block, desk and student.
pub fn write_csv<W: Write>(
    plan: &SchedulePlan,
    floor_plan: &FloorPlan,
    writer: W,
) -> Result<(), csv::Error> {
    // header written by hand so an empty schedule still gets one
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(["student", "office", "desk", "block"])?;
    for (office, assignments) in plan.schedule().by_office(floor_plan) {
        for assignment in assignments {
            csv.serialize(ScheduleRow {
                student: &assignment.student,
                office,
                desk: assignment.desk.as_str(),
                block: assignment.time_block.as_str(),
            })?;
        }
    }
    csv.flush()?;
    Ok(())
}

/// Plain-text notice for one student listing, per desk, the blocks they may
/// use it.
pub fn student_report(student: &str, assignments: &[&Assignment], floor_plan: &FloorPlan) -> String {
    let mut by_desk: BTreeMap<&DeskId, Vec<&TimeBlock>> = BTreeMap::new();
    for assignment in assignments {
        by_desk
            .entry(&assignment.desk)
            .or_default()
            .push(&assignment.time_block);
    }

    let mut out = format!("Desk use assignments for {student}\n");
    for (desk, blocks) in by_desk {
        let office = floor_plan
            .desk(desk)
            .map(|desk| desk.office.as_str())
            .unwrap_or("");
        let _ = writeln!(
            out,
            "\nYou may use desk {desk} in room {office} during the following time blocks:"
        );
        for block in blocks {
            let _ = writeln!(out, "  - {block}");
        }
    }
    out
}

/// Plain-text notice for one office listing who sits where in each block.
pub fn office_report(office: &str, assignments: &[&Assignment]) -> String {
    let mut by_block: BTreeMap<&TimeBlock, Vec<&Assignment>> = BTreeMap::new();
    for &assignment in assignments {
        by_block.entry(&assignment.time_block).or_default().push(assignment);
    }

    let mut out = format!("Desk use assignments for room {office}\n");
    for (block, seated) in by_block {
        let _ = writeln!(out, "\nBlock {block}:");
        for assignment in seated {
            let _ = writeln!(out, "  desk {}: {}", assignment.desk, assignment.student);
        }
    }
    out
}

/// Writes `student-<name>.txt` and `room-<office>.txt` notices into `dir`.
///
/// Names that map to the same file name get a `-2`, `-3`, ... suffix in
/// name order, so every student and office keeps its own file. Returns
/// the number of files written.
pub fn write_reports(plan: &SchedulePlan, floor_plan: &FloorPlan, dir: &Path) -> io::Result<usize> {
    fs::create_dir_all(dir)?;
    let mut used = BTreeSet::new();

    for (student, assignments) in plan.schedule().by_student() {
        let path = unique_path(dir, "student", student, &mut used);
        fs::write(&path, student_report(student, &assignments, floor_plan))?;
        debug!(path = %path.display(), "wrote student report");
    }
    for (office, assignments) in plan.schedule().by_office(floor_plan) {
        let path = unique_path(dir, "room", office, &mut used);
        fs::write(&path, office_report(office, &assignments))?;
        debug!(path = %path.display(), "wrote office report");
    }
    Ok(used.len())
}

/// Picks a file name under `dir` not yet in `used`. Names are compared
/// case-insensitively so `Amy` and `amy` stay apart on every filesystem.
fn unique_path(dir: &Path, prefix: &str, name: &str, used: &mut BTreeSet<String>) -> PathBuf {
    let stem = file_stem(name);
    let mut file_name = format!("{prefix}-{stem}.txt");
    let mut n = 2;
    while used.contains(&file_name.to_lowercase()) {
        file_name = format!("{prefix}-{stem}-{n}.txt");
        n += 1;
    }
    used.insert(file_name.to_lowercase());
    dir.join(file_name)
}

/// Short human summary of a run: counts, unserved students and warnings.
pub fn run_summary(plan: &SchedulePlan) -> String {
    let mut out = format!(
        "{} assignments across {} blocks; {} of {} students served\n",
        plan.schedule().len(),
        plan.blocks().len(),
        plan.served_count(),
        plan.students().len()
    );
    let unserved: Vec<&str> = plan.unserved().collect();
    if !unserved.is_empty() {
        let _ = writeln!(out, "unserved: {}", unserved.join(", "));
    }
    for (student, block) in plan.rescues() {
        let _ = writeln!(out, "rescued: {student} in block {block}");
    }
    for warning in plan.warnings() {
        let _ = writeln!(out, "warning: {warning}");
    }
    out
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        format!("_{stem}")
    } else {
        stem
    }
}
