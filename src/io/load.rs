use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::config::{cap_from_i64, ConflictScope, FairnessPolicy, Parameters};
use crate::floor_plan::Desk;
use crate::ident::DeskId;
use crate::requests::Request;

use super::LoadError;

/// Floor of a room number: the digits above the last two (`4140` is on
/// floor 41, `101` on floor 1).
pub fn floor_of_office(office: &str) -> Option<u32> {
    office.trim().parse::<u32>().ok().map(|room| room / 100)
}

#[derive(Debug, Deserialize)]
struct DeskRecord {
    desk_id: DeskId,
    office: String,
    x: f64,
    y: f64,
}

/// Parses a desk table with header `desk_id,office,x,y`.
pub fn read_desks<R: Read>(reader: R) -> Result<Vec<Desk>, LoadError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut desks = Vec::new();
    for record in csv.deserialize::<DeskRecord>() {
        let record = record?;
        let floor = floor_of_office(&record.office).ok_or_else(|| LoadError::NonNumericOffice {
            desk: record.desk_id.clone(),
            office: record.office.clone(),
        })?;
        desks.push(Desk::new(record.desk_id, record.office, floor, record.x, record.y));
    }
    Ok(desks)
}

/// Parses the requests JSON: a list of `{desk, student_name, available_times}`.
pub fn read_requests<R: Read>(reader: R) -> Result<Vec<Request>, LoadError> {
    Ok(serde_json::from_reader(reader)?)
}

#[derive(Debug, Deserialize)]
struct ParameterFile {
    safety_distance: f64,
    office_occupancy_cap: i64,
    floor_occupancy_cap: i64,
    #[serde(default)]
    fairness: FairnessPolicy,
    #[serde(default)]
    conflict_scope: ConflictScope,
    #[serde(default)]
    block_timeout_ms: Option<u64>,
}

/// Parses and validates the parameters YAML. Unknown keys are ignored.
pub fn read_parameters<R: Read>(reader: R) -> Result<Parameters, LoadError> {
    let file: ParameterFile = serde_yaml::from_reader(reader)?;
    let mut params = Parameters::new(
        file.safety_distance,
        cap_from_i64("office_occupancy_cap", file.office_occupancy_cap)?,
        cap_from_i64("floor_occupancy_cap", file.floor_occupancy_cap)?,
    )
    .with_fairness(file.fairness)
    .with_conflict_scope(file.conflict_scope);
    if let Some(ms) = file.block_timeout_ms {
        params = params.with_block_timeout(Duration::from_millis(ms));
    }
    params.validate()?;
    Ok(params)
}

pub fn load_desks(path: &Path) -> Result<Vec<Desk>, LoadError> {
    read_desks(BufReader::new(File::open(path)?))
}

pub fn load_requests(path: &Path) -> Result<Vec<Request>, LoadError> {
    read_requests(BufReader::new(File::open(path)?))
}

pub fn load_parameters(path: &Path) -> Result<Parameters, LoadError> {
    read_parameters(BufReader::new(File::open(path)?))
}
