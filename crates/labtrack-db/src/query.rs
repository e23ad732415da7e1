//! Read-only reporting queries over the entity graph.
//!
//! Each function is a pure read of current table contents and returns a
//! typed row vector. An execution error returns `Err` with no partial rows.

use rusqlite::params;

use crate::error::DbError;
use crate::store::Session;

/// One course a student worked in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRow {
    pub course_id: String,
    pub title: String,
    pub quarter: String,
}

/// A course ranked by how many usage records its projects accumulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoursePopularity {
    pub course_id: String,
    pub title: String,
    pub use_count: i64,
}

/// An admin with every email address on file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContact {
    pub ucinetid: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub emails: Vec<String>,
}

/// A student row as reported by [`active_students`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    pub ucinetid: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
}

/// A machine annotated with its usage count for one course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineUsage {
    pub machine_id: String,
    pub hostname: String,
    pub ip_address: String,
    pub use_count: i64,
}

/// Distinct courses the student has usage records for, course_id ascending.
pub fn list_courses_for_student(
    session: &Session,
    ucinetid: &str,
) -> Result<Vec<CourseRow>, DbError> {
    let mut stmt = session.conn.prepare(
        "SELECT DISTINCT c.course_id, c.title, c.quarter \
         FROM courses c \
         JOIN projects p ON p.course_id = c.course_id \
         JOIN usage u ON u.project_id = p.project_id \
         WHERE u.ucinetid = ?1 \
         ORDER BY c.course_id ASC",
    )?;
    let rows = stmt.query_map(params![ucinetid], |row| {
        Ok(CourseRow {
            course_id: row.get(0)?,
            title: row.get(1)?,
            quarter: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// The `limit` courses with the most usage records (one per usage row, not
/// per distinct student), count descending, course_id descending on ties.
pub fn most_popular_courses(
    session: &Session,
    limit: i64,
) -> Result<Vec<CoursePopularity>, DbError> {
    if limit < 0 {
        return Err(DbError::InvalidArgument(format!(
            "course limit must be non-negative, got {limit}"
        )));
    }
    let mut stmt = session.conn.prepare(
        "SELECT c.course_id, c.title, COUNT(*) AS use_count \
         FROM courses c \
         JOIN projects p ON p.course_id = c.course_id \
         JOIN usage u ON u.project_id = p.project_id \
         GROUP BY c.course_id, c.title \
         ORDER BY use_count DESC, c.course_id DESC \
         LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], |row| {
        Ok(CoursePopularity {
            course_id: row.get(0)?,
            title: row.get(1)?,
            use_count: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Admins managing the machine, with their email addresses, ucinetid
/// ascending. Admins with no email rows do not appear.
pub fn admins_for_machine(
    session: &Session,
    machine_id: &str,
) -> Result<Vec<AdminContact>, DbError> {
    let mut stmt = session.conn.prepare(
        "SELECT a.ucinetid, u.first_name, u.middle_name, u.last_name, \
                GROUP_CONCAT(e.address, ';') AS addresses \
         FROM admins a \
         JOIN users u ON u.ucinetid = a.ucinetid \
         JOIN emails e ON e.ucinetid = a.ucinetid \
         WHERE a.ucinetid IN ( \
             SELECT m.admin_ucinetid FROM management m WHERE m.machine_id = ?1 \
         ) \
         GROUP BY a.ucinetid \
         ORDER BY a.ucinetid ASC",
    )?;
    let rows = stmt.query_map(params![machine_id], |row| {
        let joined: String = row.get(4)?;
        Ok(AdminContact {
            ucinetid: row.get(0)?,
            first_name: row.get(1)?,
            middle_name: row.get(2)?,
            last_name: row.get(3)?,
            emails: joined.split(';').map(str::to_owned).collect(),
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Students with at least `min_uses` usage records on the machine whose
/// interval lies within `[start_date, end_date]`, provided the machine's
/// operational status is `Active`. Ordered ucinetid ascending.
pub fn active_students(
    session: &Session,
    machine_id: &str,
    start_date: &str,
    end_date: &str,
    min_uses: i64,
) -> Result<Vec<StudentRow>, DbError> {
    let mut stmt = session.conn.prepare(
        "SELECT u.ucinetid, u.first_name, u.middle_name, u.last_name \
         FROM users u \
         JOIN students s ON s.ucinetid = u.ucinetid \
         JOIN usage su ON su.ucinetid = u.ucinetid \
         JOIN machines m ON m.machine_id = su.machine_id \
         WHERE su.machine_id = ?1 \
           AND su.start_date >= ?2 \
           AND su.end_date <= ?3 \
           AND m.operational_status = 'Active' \
         GROUP BY u.ucinetid \
         HAVING COUNT(*) >= ?4 \
         ORDER BY u.ucinetid ASC",
    )?;
    let rows = stmt.query_map(params![machine_id, start_date, end_date, min_uses], |row| {
        Ok(StudentRow {
            ucinetid: row.get(0)?,
            first_name: row.get(1)?,
            middle_name: row.get(2)?,
            last_name: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Every machine (zero-usage ones included) with the count of usage
/// records tied to the course's projects, machine_id descending.
pub fn machine_usage_for_course(
    session: &Session,
    course_id: &str,
) -> Result<Vec<MachineUsage>, DbError> {
    let mut stmt = session.conn.prepare(
        "SELECT m.machine_id, m.hostname, m.ip_address, COUNT(su.machine_id) AS use_count \
         FROM machines m \
         LEFT JOIN ( \
             SELECT u.machine_id \
             FROM usage u \
             JOIN projects p ON p.project_id = u.project_id \
             WHERE p.course_id = ?1 \
         ) su ON su.machine_id = m.machine_id \
         GROUP BY m.machine_id \
         ORDER BY m.machine_id DESC",
    )?;
    let rows = stmt.query_map(params![course_id], |row| {
        Ok(MachineUsage {
            machine_id: row.get(0)?,
            hostname: row.get(1)?,
            ip_address: row.get(2)?,
            use_count: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
