use chrono::{Local, NaiveDate};
use sql_request::prelude::*;
use tracing::{info, warn};

/// Statements whose syntax differs between backends.
struct Dialect {
    create_table: &'static str,
    insert_returning_id: &'static str,
    delete_returning_id: &'static str,
    full_name_by_id: &'static str,
}

fn dialect(db_type: DatabaseType) -> Dialect {
    match db_type {
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => Dialect {
            create_table: "CREATE TABLE IF NOT EXISTS Test (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                prenom TEXT NOT NULL,
                nom TEXT NOT NULL,
                inscription TEXT NOT NULL
            )",
            insert_returning_id: "INSERT INTO Test (inscription, prenom, nom) VALUES (@ins, @pre, @nom) RETURNING id",
            delete_returning_id: "DELETE FROM Test WHERE id=@0 RETURNING id",
            full_name_by_id: "SELECT prenom || ' ' || nom AS prenom_nom, inscription FROM Test WHERE id=@0",
        },
        #[cfg(feature = "mssql")]
        DatabaseType::Mssql => Dialect {
            create_table: "IF OBJECT_ID(N'Test', N'U') IS NULL CREATE TABLE Test (
                id INT IDENTITY(1,1) PRIMARY KEY,
                prenom NVARCHAR(100) NOT NULL,
                nom NVARCHAR(100) NOT NULL,
                inscription DATETIME2 NOT NULL
            )",
            insert_returning_id: "INSERT INTO Test (inscription, prenom, nom) OUTPUT INSERTED.id VALUES (@ins, @pre, @nom)",
            delete_returning_id: "DELETE FROM Test OUTPUT DELETED.id WHERE id=@0",
            full_name_by_id: "SELECT prenom + ' ' + nom AS prenom_nom, inscription FROM Test WHERE id=@0",
        },
    }
}

fn returned_id(value: Option<RowValues>) -> Result<i64, SqlRequestError> {
    match value {
        Some(RowValues::Int(id)) => Ok(id),
        Some(other) => Err(SqlRequestError::ExecutionError(format!(
            "expected an integer id, got {other:?}"
        ))),
        None => Err(SqlRequestError::ExecutionError("no id returned".into())),
    }
}

fn print_person(row: &SqlRow) -> Result<(), SqlRequestError> {
    println!(
        "\t{}, {} {}, {}",
        row.get_int(0)?,
        row.get_text(1)?,
        row.get_text(2)?,
        row.get_timestamp(3)?.date()
    );
    Ok(())
}

/// Create the demo table and seed it when empty.
pub(crate) fn prepare_table(target: &ConnectionTarget) -> Result<(), SqlRequestError> {
    let mut request = SqlRequest::connect(target)?;
    let sql = dialect(request.database_type());
    request.execute(sql.create_table, &[])?;

    let count = request.scalar("SELECT COUNT(*) FROM Test", &[])?;
    if count.as_ref().and_then(RowValues::as_int).copied().unwrap_or(0) > 0 {
        return Ok(());
    }
    for (prenom, nom, (y, m, d)) in [
        ("Ada", "Lovelace", (1843, 7, 1)),
        ("Alan", "Turing", (1936, 11, 12)),
        ("Grace", "Hopper", (1952, 5, 3)),
    ] {
        let inscription = NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| SqlRequestError::ExecutionError("invalid seed date".into()))?;
        request.execute_named(
            "INSERT INTO Test (prenom, nom, inscription) VALUES (@pre, @nom, @ins)",
            &[
                Placeholder::new("pre", prenom),
                Placeholder::new("nom", nom),
                Placeholder::new("ins", inscription),
            ],
        )?;
    }
    info!("seeded the Test table");
    request.close()
}

/// A.1: a target that cannot be reached fails at construction.
pub(crate) fn check_connection(target: &ConnectionTarget) -> Result<(), SqlRequestError> {
    match SqlRequest::connect(&unreachable_target(target)) {
        Ok(_) => warn!("unreachable target unexpectedly connected"),
        Err(err) => println!("\tConnection error\n\t{err}"),
    }
    let _request = SqlRequest::connect(target)?;
    println!("\tConnection established");
    Ok(())
}

fn unreachable_target(target: &ConnectionTarget) -> ConnectionTarget {
    match target {
        #[cfg(feature = "sqlite")]
        ConnectionTarget::Sqlite(_) => ConnectionTarget::Sqlite(
            SqliteOptions::new("/nonexistent/sql_request/demo.db").with_create_if_missing(false),
        ),
        #[cfg(feature = "mssql")]
        ConnectionTarget::Mssql(opts) => {
            let mut bad = opts.clone();
            bad.server = "unreachable.invalid".into();
            ConnectionTarget::Mssql(bad)
        }
    }
}

/// A.2: a malformed query surfaces the driver error.
pub(crate) fn check_query(target: &ConnectionTarget) -> Result<(), SqlRequestError> {
    let mut request = SqlRequest::connect(target)?;
    let id = 1;
    match request.scalar(
        "SELECT prenom FROM Test WHERE xxxNIMPORTEQUOIxxx=@0",
        &[RowValues::Int(id)],
    ) {
        Ok(value) => warn!("bad query returned {value:?}"),
        Err(err) => println!("\tQuery error\n\t{err}"),
    }
    Ok(())
}

/// B.1: read every row, no parameters.
pub(crate) fn select_all(target: &ConnectionTarget) -> Result<(), SqlRequestError> {
    let mut request = SqlRequest::connect(target)?;
    request.read_rows(
        "SELECT id, prenom, nom, inscription FROM Test",
        print_person,
        &[],
    )
}

/// B.2: read one row by positional parameter.
pub(crate) fn select_by_id(target: &ConnectionTarget) -> Result<(), SqlRequestError> {
    let mut request = SqlRequest::connect(target)?;
    request.read_rows(
        "SELECT id, prenom, nom, inscription FROM Test WHERE id=@0",
        print_person,
        &[RowValues::Int(2)],
    )
}

/// C.1: insert with named placeholders, then read the new row back.
pub(crate) fn insert(target: &ConnectionTarget) -> Result<(), SqlRequestError> {
    let mut request = SqlRequest::connect(target)?;
    let sql = dialect(request.database_type());
    let inscription = NaiveDate::from_ymd_opt(3000, 12, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| SqlRequestError::ExecutionError("invalid date".into()))?;

    let id = returned_id(request.scalar_named(
        sql.insert_returning_id,
        &[
            Placeholder::new("ins", inscription),
            Placeholder::new("pre", "Youpi"),
            Placeholder::new("nom", "Lavie"),
        ],
    )?)?;
    println!("\tInserted. Row id: {id}.");

    request.read_rows(
        "SELECT id, prenom, nom, inscription FROM Test WHERE id=@0",
        print_person,
        &[RowValues::Int(id)],
    )
}

/// C.2: read the last row, update it, read it again.
pub(crate) fn update(target: &ConnectionTarget) -> Result<(), SqlRequestError> {
    let mut request = SqlRequest::connect(target)?;
    let id = returned_id(request.scalar("SELECT MAX(id) FROM Test", &[])?)?;
    println!("\tLast id in the table: {id}. Current values:");

    let show = |row: &SqlRow| -> Result<(), SqlRequestError> {
        println!(
            "\t{id}, {}, {}, {}",
            row.get_text(1)?,
            row.get_text(0)?,
            row.get_timestamp(2)?.date()
        );
        Ok(())
    };

    request.read_rows_named(
        "SELECT nom, prenom, inscription FROM Test WHERE id=@intID",
        show,
        &[Placeholder::new("intID", id)],
    )?;

    let lines = request.execute_named(
        "UPDATE Test SET nom=@nom, prenom=@prenom, inscription=@inscription WHERE id=@id",
        &[
            Placeholder::new("id", id),
            Placeholder::new("inscription", Local::now().naive_local()),
            Placeholder::new("prenom", "MODIF"),
            Placeholder::new("nom", "MODIF"),
        ],
    )?;
    println!("\n\t{lines} row(s) updated. New values:");

    request.read_rows(
        "SELECT nom, prenom, inscription FROM Test WHERE id=@0",
        show,
        &[RowValues::Int(id)],
    )
}

/// C.3: insert a row, show it, delete it through a returning clause.
pub(crate) fn delete(target: &ConnectionTarget) -> Result<(), SqlRequestError> {
    let mut request = SqlRequest::connect(target)?;
    let sql = dialect(request.database_type());

    let id = returned_id(request.scalar_named(
        sql.insert_returning_id,
        &[
            Placeholder::new("ins", Local::now().naive_local()),
            Placeholder::new("pre", "Last"),
            Placeholder::new("nom", "NotLeast"),
        ],
    )?)?;
    println!("\tInserted. New row id: {id}.\n\n\tStored values:");

    request.read_rows(
        sql.full_name_by_id,
        |row| {
            println!(
                "\t{id}, {}, {}",
                row.get_text(0)?,
                row.get_timestamp(1)?.date()
            );
            Ok(())
        },
        &[RowValues::Int(id)],
    )?;

    let deleted = returned_id(request.scalar(sql.delete_returning_id, &[RowValues::Int(id)])?)?;
    println!("\n\tRow {deleted} deleted.");
    request.close()
}
