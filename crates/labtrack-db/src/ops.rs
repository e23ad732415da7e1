//! Atomic single-record write operations.
//!
//! Every operation runs inside its own transaction: either all of its
//! statements apply, or none do. An early error return drops the
//! transaction, which rolls it back; no partial effects survive a failure.

use rusqlite::params;
use tracing::debug;

use crate::error::DbError;
use crate::store::Session;

/// Creates the user/student/email triad for a new student.
pub fn create_student(
    session: &mut Session,
    ucinetid: &str,
    email: &str,
    first: &str,
    middle: &str,
    last: &str,
) -> Result<(), DbError> {
    let tx = session.conn.transaction()?;
    tx.execute(
        "INSERT INTO users (ucinetid, first_name, middle_name, last_name) \
         VALUES (?1, ?2, ?3, ?4)",
        params![ucinetid, first, middle, last],
    )?;
    tx.execute("INSERT INTO students (ucinetid) VALUES (?1)", params![ucinetid])?;
    tx.execute(
        "INSERT INTO emails (ucinetid, address) VALUES (?1, ?2)",
        params![ucinetid, email],
    )?;
    tx.commit()?;
    debug!(ucinetid, "student created");
    Ok(())
}

/// Adds an email address to an existing user.
pub fn add_email(session: &mut Session, ucinetid: &str, email: &str) -> Result<(), DbError> {
    let tx = session.conn.transaction()?;
    tx.execute(
        "INSERT INTO emails (ucinetid, address) VALUES (?1, ?2)",
        params![ucinetid, email],
    )?;
    tx.commit()?;
    Ok(())
}

/// Deletes a student together with their user row.
///
/// The students row goes first: its foreign key into users would otherwise
/// block the user delete. Email rows cascade with the user. Touching zero
/// rows overall means the id did not exist and the operation fails.
pub fn delete_student(session: &mut Session, ucinetid: &str) -> Result<(), DbError> {
    let tx = session.conn.transaction()?;
    let students = tx.execute("DELETE FROM students WHERE ucinetid = ?1", params![ucinetid])?;
    let users = tx.execute("DELETE FROM users WHERE ucinetid = ?1", params![ucinetid])?;
    if students + users == 0 {
        return Err(DbError::NotFound {
            entity: "student",
            key: ucinetid.to_string(),
        });
    }
    tx.commit()?;
    debug!(ucinetid, "student deleted");
    Ok(())
}

/// Registers a new machine.
pub fn create_machine(
    session: &mut Session,
    machine_id: &str,
    hostname: &str,
    ip_address: &str,
    operational_status: &str,
    location: &str,
) -> Result<(), DbError> {
    let tx = session.conn.transaction()?;
    tx.execute(
        "INSERT INTO machines (machine_id, hostname, ip_address, operational_status, location) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![machine_id, hostname, ip_address, operational_status, location],
    )?;
    tx.commit()?;
    Ok(())
}

/// Records that a student used a machine for a project over a date range.
pub fn record_usage(
    session: &mut Session,
    project_id: &str,
    ucinetid: &str,
    machine_id: &str,
    start_date: &str,
    end_date: &str,
) -> Result<(), DbError> {
    let tx = session.conn.transaction()?;
    tx.execute(
        "INSERT INTO usage (project_id, ucinetid, machine_id, start_date, end_date) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![project_id, ucinetid, machine_id, start_date, end_date],
    )?;
    tx.commit()?;
    Ok(())
}

/// Retitles a course. Matching zero rows is still success; only an
/// execution error fails the operation.
pub fn update_course_title(
    session: &mut Session,
    course_id: &str,
    title: &str,
) -> Result<(), DbError> {
    let tx = session.conn.transaction()?;
    tx.execute(
        "UPDATE courses SET title = ?1 WHERE course_id = ?2",
        params![title, course_id],
    )?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::schema;

    fn email_count(session: &Session, ucinetid: &str) -> i64 {
        session
            .conn
            .query_row(
                "SELECT COUNT(*) FROM emails WHERE ucinetid = ?1",
                [ucinetid],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn create_student_inserts_triad() {
        let mut session = fixtures::loaded_session();
        create_student(&mut session, "stu9", "stu9@uci.edu", "Gil", "", "Hart").unwrap();

        assert_eq!(session.table_count(&schema::USERS).unwrap(), 7);
        assert_eq!(email_count(&session, "stu9"), 1);
    }

    #[test]
    fn duplicate_create_student_fails_atomically() {
        let mut session = fixtures::loaded_session();
        create_student(&mut session, "stu9", "stu9@uci.edu", "Gil", "", "Hart").unwrap();

        let err = create_student(&mut session, "stu9", "other@uci.edu", "Gil", "", "Hart");
        assert!(err.is_err());

        // Exactly the first triad survives: one user row, one email row.
        assert_eq!(session.table_count(&schema::USERS).unwrap(), 7);
        assert_eq!(email_count(&session, "stu9"), 1);
    }

    #[test]
    fn add_email_accumulates_addresses() {
        let mut session = fixtures::loaded_session();
        add_email(&mut session, "stu1", "stu1.alt@uci.edu").unwrap();
        assert_eq!(email_count(&session, "stu1"), 2);
    }

    #[test]
    fn add_email_rejects_duplicates_and_unknown_users() {
        let mut session = fixtures::loaded_session();
        assert!(add_email(&mut session, "stu1", "stu1@uci.edu").is_err());
        assert!(add_email(&mut session, "ghost", "g@uci.edu").is_err());
    }

    #[test]
    fn delete_student_cascades_emails() {
        let mut session = fixtures::loaded_session();
        // stu2 has usage rows referencing it; delete a freshly created
        // student instead so only the triad is involved.
        create_student(&mut session, "stu9", "stu9@uci.edu", "Gil", "", "Hart").unwrap();
        add_email(&mut session, "stu9", "stu9.alt@uci.edu").unwrap();

        delete_student(&mut session, "stu9").unwrap();

        assert_eq!(session.table_count(&schema::USERS).unwrap(), 6);
        assert_eq!(email_count(&session, "stu9"), 0);

        // The id is gone, so new addresses have nothing to attach to.
        assert!(add_email(&mut session, "stu9", "late@uci.edu").is_err());
    }

    #[test]
    fn delete_unknown_student_reports_not_found() {
        let mut session = fixtures::loaded_session();
        let err = delete_student(&mut session, "ghost").unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn create_machine_rejects_duplicate_id() {
        let mut session = fixtures::loaded_session();
        create_machine(&mut session, "M9", "host9.lab", "10.0.0.9", "Active", "Room 303").unwrap();
        assert!(
            create_machine(&mut session, "M9", "other.lab", "10.0.0.10", "Active", "Room 303")
                .is_err()
        );
    }

    #[test]
    fn record_usage_enforces_referents_and_key() {
        let mut session = fixtures::loaded_session();
        record_usage(&mut session, "P3", "stu4", "M1", "2023-05-01", "2023-05-02").unwrap();

        // Same (student, project, machine) again.
        assert!(
            record_usage(&mut session, "P3", "stu4", "M1", "2023-06-01", "2023-06-02").is_err()
        );
        // Unknown project.
        assert!(
            record_usage(&mut session, "P9", "stu4", "M1", "2023-05-01", "2023-05-02").is_err()
        );
    }

    #[test]
    fn update_course_title_applies_change() {
        let mut session = fixtures::loaded_session();
        update_course_title(&mut session, "CS1", "Advanced Databases").unwrap();

        let title: String = session
            .conn
            .query_row("SELECT title FROM courses WHERE course_id = 'CS1'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(title, "Advanced Databases");
    }

    #[test]
    fn update_absent_course_is_still_success() {
        let mut session = fixtures::loaded_session();
        update_course_title(&mut session, "CS9", "Ghost Course").unwrap();
    }
}
