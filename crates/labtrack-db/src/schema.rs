//! Canonical table definitions for the lab-usage dataset.
//!
//! [`ENTITIES`] is the single source of truth for the schema. It is declared
//! in foreign-key dependency order: creating tables front-to-back and
//! dropping them back-to-front is always constraint-safe. Column order is
//! fixed here at definition time and doubles as the field order of bulk-load
//! source rows.

/// Logical column types used by the schema.
///
/// Both map to SQLite TEXT: identifiers and attributes are opaque strings,
/// and dates are stored as ISO-8601 `YYYY-MM-DD`, whose lexicographic order
/// equals chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Date,
}

impl ColumnType {
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Date => "TEXT",
        }
    }
}

/// A single column in a table definition.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub col_type: ColumnType,
}

/// A foreign key from local columns to the primary key of another table.
#[derive(Debug, Clone, Copy)]
pub struct ForeignKey {
    pub columns: &'static [&'static str],
    pub table: &'static str,
    pub references: &'static [&'static str],
    /// Delete the referencing rows together with the referenced row.
    pub cascade_delete: bool,
}

/// A table definition: name, ordered columns, primary key, foreign keys.
#[derive(Debug, Clone, Copy)]
pub struct EntityDef {
    pub table: &'static str,
    pub columns: &'static [ColumnDef],
    pub primary_key: &'static [&'static str],
    pub foreign_keys: &'static [ForeignKey],
}

const fn text(name: &'static str) -> ColumnDef {
    ColumnDef { name, col_type: ColumnType::Text }
}

const fn date(name: &'static str) -> ColumnDef {
    ColumnDef { name, col_type: ColumnType::Date }
}

pub const USERS: EntityDef = EntityDef {
    table: "users",
    columns: &[text("ucinetid"), text("first_name"), text("middle_name"), text("last_name")],
    primary_key: &["ucinetid"],
    foreign_keys: &[],
};

pub const ADMINS: EntityDef = EntityDef {
    table: "admins",
    columns: &[text("ucinetid")],
    primary_key: &["ucinetid"],
    foreign_keys: &[ForeignKey {
        columns: &["ucinetid"],
        table: "users",
        references: &["ucinetid"],
        cascade_delete: false,
    }],
};

pub const STUDENTS: EntityDef = EntityDef {
    table: "students",
    columns: &[text("ucinetid")],
    primary_key: &["ucinetid"],
    foreign_keys: &[ForeignKey {
        columns: &["ucinetid"],
        table: "users",
        references: &["ucinetid"],
        cascade_delete: false,
    }],
};

pub const EMAILS: EntityDef = EntityDef {
    table: "emails",
    columns: &[text("ucinetid"), text("address")],
    primary_key: &["ucinetid", "address"],
    foreign_keys: &[ForeignKey {
        columns: &["ucinetid"],
        table: "users",
        references: &["ucinetid"],
        cascade_delete: true,
    }],
};

pub const COURSES: EntityDef = EntityDef {
    table: "courses",
    columns: &[text("course_id"), text("title"), text("quarter")],
    primary_key: &["course_id"],
    foreign_keys: &[],
};

pub const PROJECTS: EntityDef = EntityDef {
    table: "projects",
    columns: &[text("project_id"), text("name"), text("description"), text("course_id")],
    primary_key: &["project_id"],
    foreign_keys: &[ForeignKey {
        columns: &["course_id"],
        table: "courses",
        references: &["course_id"],
        cascade_delete: false,
    }],
};

pub const MACHINES: EntityDef = EntityDef {
    table: "machines",
    columns: &[
        text("machine_id"),
        text("hostname"),
        text("ip_address"),
        text("operational_status"),
        text("location"),
    ],
    primary_key: &["machine_id"],
    foreign_keys: &[],
};

pub const USAGE: EntityDef = EntityDef {
    table: "usage",
    columns: &[
        text("project_id"),
        text("ucinetid"),
        text("machine_id"),
        date("start_date"),
        date("end_date"),
    ],
    primary_key: &["ucinetid", "project_id", "machine_id"],
    foreign_keys: &[
        ForeignKey {
            columns: &["ucinetid"],
            table: "users",
            references: &["ucinetid"],
            cascade_delete: false,
        },
        ForeignKey {
            columns: &["project_id"],
            table: "projects",
            references: &["project_id"],
            cascade_delete: false,
        },
        ForeignKey {
            columns: &["machine_id"],
            table: "machines",
            references: &["machine_id"],
            cascade_delete: false,
        },
    ],
};

pub const MANAGEMENT: EntityDef = EntityDef {
    table: "management",
    columns: &[text("admin_ucinetid"), text("machine_id")],
    primary_key: &["admin_ucinetid", "machine_id"],
    foreign_keys: &[
        ForeignKey {
            columns: &["admin_ucinetid"],
            table: "admins",
            references: &["ucinetid"],
            cascade_delete: false,
        },
        ForeignKey {
            columns: &["machine_id"],
            table: "machines",
            references: &["machine_id"],
            cascade_delete: false,
        },
    ],
};

/// All entities in foreign-key dependency order: every table appears after
/// the tables its foreign keys reference.
pub const ENTITIES: [EntityDef; 9] = [
    USERS, ADMINS, STUDENTS, EMAILS, COURSES, PROJECTS, MACHINES, USAGE, MANAGEMENT,
];

impl EntityDef {
    /// Number of declared columns; bulk-load rows must match it exactly.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether a column must be NOT NULL: key and foreign-key columns are,
    /// plain attributes are nullable.
    fn is_required(&self, column: &str) -> bool {
        self.primary_key.contains(&column)
            || self.foreign_keys.iter().any(|fk| fk.columns.contains(&column))
    }

    /// Render `CREATE TABLE IF NOT EXISTS` for this entity.
    pub fn create_sql(&self) -> String {
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(|col| {
                let mut def = format!("\"{}\" {}", col.name, col.col_type.sql_type());
                if self.is_required(col.name) {
                    def.push_str(" NOT NULL");
                }
                def
            })
            .collect();

        parts.push(format!("PRIMARY KEY ({})", quote_list(self.primary_key)));

        for fk in self.foreign_keys {
            let mut clause = format!(
                "FOREIGN KEY ({}) REFERENCES \"{}\" ({})",
                quote_list(fk.columns),
                fk.table,
                quote_list(fk.references),
            );
            if fk.cascade_delete {
                clause.push_str(" ON DELETE CASCADE");
            }
            parts.push(clause);
        }

        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
            self.table,
            parts.join(", ")
        )
    }

    /// Render `DROP TABLE IF EXISTS` for this entity.
    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS \"{}\"", self.table)
    }

    /// Render a positional INSERT covering every declared column, in order.
    pub fn insert_sql(&self) -> String {
        let placeholders: Vec<String> =
            (1..=self.columns.len()).map(|i| format!("?{i}")).collect();
        let names: Vec<&str> = self.columns.iter().map(|c| c.name).collect();
        format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            self.table,
            quote_list(&names),
            placeholders.join(", ")
        )
    }
}

fn quote_list(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
