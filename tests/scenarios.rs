//! End-to-end scenarios through the public API and the file formats.

use pretty_assertions::assert_eq;

use deskplan::config::{ConfigError, FairnessPolicy, Parameters};
use deskplan::floor_plan::Desk;
use deskplan::requests::{Request, RequestError};
use deskplan::schedule::{Assignment, PlanError};
use deskplan::DeskPlanner;

fn plan(params: Parameters, desks: Vec<Desk>, requests: &[Request]) -> deskplan::SchedulePlan {
    DeskPlanner::new(params).unwrap().plan(desks, requests).unwrap()
}

#[test]
fn close_desks_seat_one_student() {
    let desks = vec![Desk::new("1", "101", 1, 0.0, 0.0), Desk::new("2", "101", 1, 3.0, 0.0)];
    let requests = vec![Request::new("bob", "1", ["am"]), Request::new("amy", "2", ["am"])];
    let plan = plan(Parameters::new(5.0, 10, 10), desks, &requests);

    let assignments: Vec<_> = plan.schedule().iter().cloned().collect();
    assert_eq!(assignments, vec![Assignment::new("amy", "2", "am")]);
    assert_eq!(plan.unserved().collect::<Vec<_>>(), vec!["bob"]);
}

#[test]
fn office_cap_of_one_seats_one_student() {
    let desks = vec![Desk::new("1", "101", 1, 0.0, 0.0), Desk::new("2", "101", 1, 30.0, 0.0)];
    let requests = vec![Request::new("amy", "1", ["am"]), Request::new("bob", "2", ["am"])];
    let plan = plan(Parameters::new(5.0, 1, 10), desks, &requests);
    assert_eq!(plan.schedule().len(), 1);
}

#[test]
fn empty_availability_is_unserved() {
    let desks = vec![Desk::new("1", "101", 1, 0.0, 0.0)];
    let requests = vec![Request::new("amy", "1", Vec::<&str>::new())];
    let plan = plan(Parameters::new(5.0, 10, 10), desks, &requests);
    assert!(plan.schedule().is_empty());
    assert!(plan.blocks().is_empty());
    assert_eq!(plan.unserved().collect::<Vec<_>>(), vec!["amy"]);
}

#[test]
fn nothing_to_plan_gives_empty_schedule() {
    let no_desks = plan(Parameters::new(5.0, 10, 10), Vec::new(), &[]);
    assert!(no_desks.schedule().is_empty());

    let no_requests = plan(
        Parameters::new(5.0, 10, 10),
        vec![Desk::new("1", "101", 1, 0.0, 0.0)],
        &[],
    );
    assert!(no_requests.schedule().is_empty());
    assert!(no_requests.warnings().is_empty());
}

#[test]
fn fatal_errors_abort_the_run() {
    let err = DeskPlanner::new(Parameters::new(-1.0, 1, 1)).unwrap_err();
    assert!(matches!(err, ConfigError::NegativeSafetyDistance(_)));

    let planner = DeskPlanner::new(Parameters::new(1.0, 1, 1)).unwrap();
    let err = planner
        .plan(
            vec![Desk::new("1", "101", 1, 0.0, 0.0)],
            &[Request::new("amy", "9", ["am"])],
        )
        .unwrap_err();
    assert!(matches!(err, PlanError::Request(RequestError::UnknownDesk { .. })));
    assert_eq!(
        err.to_string(),
        "invalid request: request from amy names unknown desk 9"
    );
}

#[test]
fn rescue_policy_trades_a_block_to_serve_everyone() {
    // Desks 1 and 2 conflict. amy takes desk 1 on "mon" and abe takes desk 2 on
    // "tue", which leaves bob with nothing; abe still has "wed" on their own.
    let desks = vec![
        Desk::new("1", "101", 1, 0.0, 0.0),
        Desk::new("2", "101", 1, 2.0, 0.0),
    ];
    let requests = vec![
        Request::new("amy", "1", ["mon"]),
        Request::new("bob", "1", ["mon", "tue"]),
        Request::new("abe", "2", ["tue", "wed"]),
    ];

    let per_block = plan(Parameters::new(5.0, 10, 10), desks.clone(), &requests);
    assert_eq!(per_block.unserved().collect::<Vec<_>>(), vec!["bob"]);

    let rescued = plan(
        Parameters::new(5.0, 10, 10).with_fairness(FairnessPolicy::RescueUnserved),
        desks,
        &requests,
    );
    assert_eq!(rescued.unserved().count(), 0);
    assert_eq!(rescued.rescues().len(), 1);
    assert!(rescued.schedule().contains(&Assignment::new("bob", "1", "tue")));
    assert!(rescued.schedule().contains(&Assignment::new("abe", "2", "wed")));
}

#[cfg(feature = "cli")]
mod files {
    use super::*;
    use pretty_assertions::assert_eq;
    use deskplan::floor_plan::FloorPlan;
    use deskplan::io;

    const DESKS: &str = "desk_id,office,x,y\n\
        1,101,0,0\n\
        2,101,3,0\n\
        3,101,10,0\n\
        4,205,0,0\n";

    const PARAMETERS: &str = "safety_distance: 5\n\
        office_occupancy_cap: 2\n\
        floor_occupancy_cap: 3\n\
        conflict_scope: same_office\n";

    #[test]
    fn pipeline_from_inputs_to_csv() {
        let requests = serde_json::json!([
            {"desk": 1, "student_name": "amy", "available_times": [1, 2]},
            {"desk": 2, "student_name": "bob", "available_times": [1]},
            {"desk": 3, "student_name": "cat", "available_times": [1, 2]},
            {"desk": 4, "student_name": "dan", "available_times": [2]}
        ])
        .to_string();

        let desks = io::read_desks(DESKS.as_bytes()).unwrap();
        let requests = io::read_requests(requests.as_bytes()).unwrap();
        let params = io::read_parameters(PARAMETERS.as_bytes()).unwrap();
        assert_eq!(desks[3].floor, 2);

        let floor_plan = FloorPlan::new(desks, &params).unwrap();
        let plan = DeskPlanner::new(params)
            .unwrap()
            .plan_on(&floor_plan, &requests)
            .unwrap();

        let mut out = Vec::new();
        io::write_csv(&plan, &floor_plan, &mut out).unwrap();
        // desk 4 shares desk 1's coordinates but sits in another office
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "student,office,desk,block\n\
             amy,101,1,1\n\
             cat,101,3,1\n\
             amy,101,1,2\n\
             cat,101,3,2\n\
             dan,205,4,2\n"
        );
        assert_eq!(plan.unserved().collect::<Vec<_>>(), vec!["bob"]);
    }

    #[test]
    fn notices_are_written_per_student_and_office() {
        let desks = io::read_desks(DESKS.as_bytes()).unwrap();
        let params = io::read_parameters(PARAMETERS.as_bytes()).unwrap();
        let requests = vec![
            Request::new("amy", "1", ["1"]),
            Request::new("dan", "4", ["1"]),
        ];
        let floor_plan = FloorPlan::new(desks, &params).unwrap();
        let plan = DeskPlanner::new(params)
            .unwrap()
            .plan_on(&floor_plan, &requests)
            .unwrap();

        let dir = std::env::temp_dir().join(format!("deskplan-{}", deskplan::generate_id()));
        let written = io::write_reports(&plan, &floor_plan, &dir).unwrap();
        assert_eq!(written, 4);
        let amy = std::fs::read_to_string(dir.join("student-amy.txt")).unwrap();
        assert!(amy.contains("desk 1 in room 101"));
        let room = std::fs::read_to_string(dir.join("room-205.txt")).unwrap();
        assert!(room.contains("desk 4: dan"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
