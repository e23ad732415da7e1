//! Rendering of query rows and load reports for terminal output.
//!
//! One comma-joined line per row; an admin's email addresses are joined
//! with `;` inside their single field.

use labtrack_db::query::{AdminContact, CoursePopularity, CourseRow, MachineUsage, StudentRow};
use labtrack_db::LoadReport;

pub fn load_report_line(report: &LoadReport) -> String {
    format!("{},{},{}", report.users, report.machines, report.courses)
}

pub fn course_line(row: &CourseRow) -> String {
    format!("{},{},{}", row.course_id, row.title, row.quarter)
}

pub fn popularity_line(row: &CoursePopularity) -> String {
    format!("{},{},{}", row.course_id, row.title, row.use_count)
}

pub fn admin_line(row: &AdminContact) -> String {
    format!(
        "{},{},{},{},{}",
        row.ucinetid,
        row.first_name,
        row.middle_name,
        row.last_name,
        row.emails.join(";")
    )
}

pub fn student_line(row: &StudentRow) -> String {
    format!(
        "{},{},{},{}",
        row.ucinetid, row.first_name, row.middle_name, row.last_name
    )
}

pub fn machine_usage_line(row: &MachineUsage) -> String {
    format!(
        "{},{},{},{}",
        row.machine_id, row.hostname, row.ip_address, row.use_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_line_joins_emails_with_semicolons() {
        let row = AdminContact {
            ucinetid: "adm1".into(),
            first_name: "Eva".into(),
            middle_name: "K".into(),
            last_name: "Ng".into(),
            emails: vec!["a@x".into(), "b@x".into()],
        };
        assert_eq!(admin_line(&row), "adm1,Eva,K,Ng,a@x;b@x");
    }

    #[test]
    fn load_report_line_is_comma_joined() {
        let report = LoadReport { users: 10, machines: 4, courses: 3 };
        assert_eq!(load_report_line(&report), "10,4,3");
    }

    #[test]
    fn machine_usage_line_includes_count() {
        let row = MachineUsage {
            machine_id: "M1".into(),
            hostname: "host1.lab".into(),
            ip_address: "10.0.0.1".into(),
            use_count: 0,
        };
        assert_eq!(machine_usage_line(&row), "M1,host1.lab,10.0.0.1,0");
    }
}
