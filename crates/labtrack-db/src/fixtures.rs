//! Shared test fixture: a small but complete dataset exercising every
//! relationship, written as the CSV files the bulk loader consumes.
//!
//! Usage-count shape: course CS1 has 5 usage records, CS2 has 5, CS3 has 3.
//! Machine M2 is Retired; M1 and M3 are Active. On machine M1 within
//! 2023-01-01..2023-06-01, stu1 and stu3 each have two usage records while
//! stu2 and stu4 have one.

use tempfile::TempDir;

use crate::loader::{load_all, CsvDirSource};
use crate::store::Session;

const FILES: &[(&str, &str)] = &[
    (
        "users.csv",
        "stu1,Ana,Marie,Lee\n\
         stu2,Ben,J,Kim\n\
         stu3,Cal,,Roe\n\
         stu4,Dee,A,Fox\n\
         adm1,Eva,K,Ng\n\
         adm2,Finn,,Ode\n",
    ),
    ("admins.csv", "adm1\nadm2\n"),
    ("students.csv", "stu1\nstu2\nstu3\nstu4\n"),
    (
        "emails.csv",
        "stu1,stu1@uci.edu\n\
         stu2,stu2@uci.edu\n\
         adm1,adm1@uci.edu\n\
         adm1,adm1.alt@uci.edu\n\
         adm2,adm2@uci.edu\n",
    ),
    (
        "courses.csv",
        "CS1,Databases,Fall 2023\n\
         CS2,Operating Systems,Fall 2023\n\
         CS3,Networks,Winter 2023\n",
    ),
    (
        "projects.csv",
        "P1,Indexer,BTree indexing,CS1\n\
         P2,Scheduler,CPU scheduling,CS2\n\
         P3,Router,Packet routing,CS3\n",
    ),
    (
        "machines.csv",
        "M1,host1.lab,10.0.0.1,Active,Room 101\n\
         M2,host2.lab,10.0.0.2,Retired,Room 101\n\
         M3,host3.lab,10.0.0.3,Active,Room 202\n",
    ),
    (
        "usage.csv",
        "P1,stu1,M1,2023-01-10,2023-01-20\n\
         P1,stu2,M1,2023-01-05,2023-01-15\n\
         P1,stu3,M1,2023-02-01,2023-02-08\n\
         P1,stu4,M1,2023-03-01,2023-03-05\n\
         P1,stu1,M2,2023-01-12,2023-01-25\n\
         P2,stu1,M1,2023-02-01,2023-02-10\n\
         P2,stu2,M1,2023-07-01,2023-07-10\n\
         P2,stu3,M1,2023-02-02,2023-02-12\n\
         P2,stu4,M1,2023-08-01,2023-08-09\n\
         P2,stu1,M2,2023-02-05,2023-02-15\n\
         P3,stu1,M3,2023-04-01,2023-04-03\n\
         P3,stu2,M3,2023-04-02,2023-04-06\n\
         P3,stu3,M2,2023-03-01,2023-03-09\n",
    ),
    (
        "management.csv",
        "adm1,M1\n\
         adm2,M1\n\
         adm1,M2\n",
    ),
];

/// Writes the fixture CSV files into a fresh temporary directory.
pub(crate) fn fixture_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in FILES {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

/// An in-memory session with the fixture fully loaded.
pub(crate) fn loaded_session() -> Session {
    let dir = fixture_dir();
    let mut session = Session::open_memory().unwrap();
    session.reset_schema().unwrap();
    load_all(&mut session, &mut CsvDirSource::new(dir.path())).unwrap();
    session
}
