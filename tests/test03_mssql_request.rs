#![cfg(feature = "mssql")]

//! Runs against a live SQL Server when `SQL_REQUEST_MSSQL_SERVER` and the
//! other `SQL_REQUEST_MSSQL_*` variables are set; otherwise every test returns
//! early.

use sql_request::prelude::*;

fn live_target() -> Option<ConnectionTarget> {
    std::env::var("SQL_REQUEST_MSSQL_SERVER").ok()?;
    ConnectionTarget::from_lookup(|key| {
        if key == "SQL_REQUEST_BACKEND" {
            Some("mssql".to_string())
        } else {
            std::env::var(key).ok()
        }
    })
    .ok()
}

#[test]
fn mssql_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let Some(target) = live_target() else {
        eprintln!("SQL_REQUEST_MSSQL_SERVER not set; skipping");
        return Ok(());
    };
    let mut request = SqlRequest::connect(&target)?;
    assert_eq!(request.database_type(), DatabaseType::Mssql);

    request.execute(
        "IF OBJECT_ID(N'sql_request_people', N'U') IS NOT NULL DROP TABLE sql_request_people;
         CREATE TABLE sql_request_people (id INT IDENTITY(1,1) PRIMARY KEY, prenom NVARCHAR(50) NOT NULL, nom NVARCHAR(50) NOT NULL)",
        &[],
    )?;

    let id = request.scalar_named(
        "INSERT INTO sql_request_people (prenom, nom) OUTPUT INSERTED.id VALUES (@pre, @nom)",
        &[Placeholder::new("nom", "Lavie"), Placeholder::new("pre", "Youpi")],
    )?;
    assert_eq!(id, Some(RowValues::Int(1)));

    let mut names = Vec::new();
    request.read_rows(
        "SELECT prenom + ' ' + nom FROM sql_request_people WHERE id = @0",
        |row| {
            names.push(row.get_text(0)?.to_string());
            Ok(())
        },
        &[RowValues::Int(1)],
    )?;
    assert_eq!(names, vec!["Youpi Lavie".to_string()]);

    let updated = request.execute(
        "UPDATE sql_request_people SET nom = @0 WHERE id = @1",
        &[RowValues::Text("MODIF".into()), RowValues::Int(1)],
    )?;
    assert_eq!(updated, 1);
    assert_eq!(
        request.execute("UPDATE sql_request_people SET nom = 'x' WHERE id = @0", &[RowValues::Int(99)])?,
        0
    );

    assert_eq!(request.scalar("SELECT MAX(id) FROM sql_request_people WHERE id > 10", &[])?, None);

    let deleted = request.scalar(
        "DELETE FROM sql_request_people OUTPUT DELETED.id WHERE id = @0",
        &[RowValues::Int(1)],
    )?;
    assert_eq!(deleted, Some(RowValues::Int(1)));

    request.execute("DROP TABLE sql_request_people", &[])?;
    request.close()?;
    request.close()?;
    assert!(matches!(
        request.scalar("SELECT 1", &[]),
        Err(SqlRequestError::ConnectionClosed)
    ));
    Ok(())
}

#[test]
fn unreachable_server_fails_at_construction() {
    let opts = MssqlOptions::new("unreachable.invalid", "master", "sa", "nope").with_port(Some(1));
    assert!(SqlRequest::open_mssql(&opts).is_err());
}
