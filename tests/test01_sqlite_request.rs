#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use sql_request::prelude::*;
use tempfile::TempDir;

fn open_request(dir: &TempDir) -> Result<SqlRequest, SqlRequestError> {
    let path = dir.path().join("request.db");
    SqlRequest::sqlite_builder(path.to_string_lossy()).build()
}

/// The `Test` table used by the walkthrough, seeded with three people.
fn seeded(dir: &TempDir) -> Result<SqlRequest, SqlRequestError> {
    let mut request = open_request(dir)?;
    request.execute(
        "CREATE TABLE Test (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            prenom TEXT NOT NULL,
            nom TEXT NOT NULL,
            inscription TEXT NOT NULL
        )",
        &[],
    )?;
    for (prenom, nom) in [("Ada", "Lovelace"), ("Alan", "Turing"), ("Grace", "Hopper")] {
        request.execute_named(
            "INSERT INTO Test (prenom, nom, inscription) VALUES (@pre, @nom, @ins)",
            &[
                Placeholder::new("pre", prenom),
                Placeholder::new("nom", nom),
                Placeholder::new("ins", "2020-01-01 00:00:00"),
            ],
        )?;
    }
    Ok(request)
}

#[test]
fn handler_sees_every_row_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut request = seeded(&dir)?;

    let mut seen = Vec::new();
    request.read_rows(
        "SELECT id, prenom FROM Test ORDER BY id",
        |row| {
            assert_eq!(row.column_names(), ["id", "prenom"]);
            seen.push((row.get_int(0)?, row.get_text(1)?.to_string()));
            Ok(())
        },
        &[],
    )?;
    assert_eq!(
        seen,
        vec![
            (1, "Ada".to_string()),
            (2, "Alan".to_string()),
            (3, "Grace".to_string())
        ]
    );

    let mut calls = 0;
    request.read_rows(
        "SELECT id FROM Test WHERE id > @0",
        |_| {
            calls += 1;
            Ok(())
        },
        &[RowValues::Int(100)],
    )?;
    assert_eq!(calls, 0);
    Ok(())
}

#[test]
fn rows_are_readable_by_name() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut request = seeded(&dir)?;

    let mut inscriptions = Vec::new();
    request.read_rows(
        "SELECT nom, inscription FROM Test WHERE id = @0",
        |row| {
            assert_eq!(row.get("nom").and_then(RowValues::as_text), Some("Turing"));
            assert!(row.get("missing").is_none());
            inscriptions.push(row.get_timestamp(1)?);
            Ok(())
        },
        &[RowValues::Int(2)],
    )?;
    let expected = NaiveDate::from_ymd_opt(2020, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or("bad date")?;
    assert_eq!(inscriptions, vec![expected]);
    Ok(())
}

#[test]
fn execute_reports_affected_rows() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut request = seeded(&dir)?;

    let updated = request.execute("UPDATE Test SET nom = @0 WHERE id < @1", &[
        RowValues::Text("X".into()),
        RowValues::Int(3),
    ])?;
    assert_eq!(updated, 2);

    let none = request.execute("UPDATE Test SET nom = 'Y' WHERE id = @0", &[RowValues::Int(999)])?;
    assert_eq!(none, 0);

    let deleted = request.execute("DELETE FROM Test", &[])?;
    assert_eq!(deleted, 3);
    Ok(())
}

#[test]
fn execute_count_covers_only_the_current_statement() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut request = seeded(&dir)?;

    assert_eq!(request.execute("UPDATE Test SET nom = nom || '!'", &[])?, 3);
    assert_eq!(request.execute("CREATE TABLE other (x INTEGER)", &[])?, 0);
    assert_eq!(
        request.execute("SELECT id FROM Test WHERE id > @0", &[RowValues::Int(100)])?,
        0
    );
    assert_eq!(request.execute("DROP TABLE other", &[])?, 0);
    Ok(())
}

#[test]
fn execute_steps_returning_statements_to_completion() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut request = seeded(&dir)?;

    let inserted = request.execute_named(
        "INSERT INTO Test (prenom, nom, inscription) VALUES (@pre, @nom, @ins) RETURNING id",
        &[
            Placeholder::new("pre", "Last"),
            Placeholder::new("nom", "NotLeast"),
            Placeholder::new("ins", "2021-06-01 00:00:00"),
        ],
    )?;
    assert_eq!(inserted, 1);
    assert_eq!(
        request.scalar("SELECT COUNT(*) FROM Test", &[])?,
        Some(RowValues::Int(4))
    );

    let deleted = request.execute("DELETE FROM Test WHERE id <= @0 RETURNING id", &[RowValues::Int(2)])?;
    assert_eq!(deleted, 2);
    assert_eq!(
        request.scalar("SELECT COUNT(*) FROM Test", &[])?,
        Some(RowValues::Int(2))
    );
    Ok(())
}

#[test]
fn read_rows_named_filters_by_placeholder() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut request = seeded(&dir)?;

    let mut names = Vec::new();
    request.read_rows_named(
        "SELECT prenom FROM Test WHERE id = @id",
        |row| {
            names.push(row.get_text(0)?.to_string());
            Ok(())
        },
        &[Placeholder::new("id", 3)],
    )?;
    assert_eq!(names, vec!["Grace".to_string()]);

    let mut calls = 0;
    request.read_rows_named(
        "SELECT prenom FROM Test WHERE id >= @low AND id <= @high ORDER BY id",
        |_| {
            calls += 1;
            Ok(())
        },
        &[Placeholder::new("high", 2), Placeholder::new("low", 1)],
    )?;
    assert_eq!(calls, 2);
    Ok(())
}

#[test]
fn scalar_returns_first_cell_or_none() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut request = seeded(&dir)?;

    assert_eq!(
        request.scalar("SELECT COUNT(*) FROM Test", &[])?,
        Some(RowValues::Int(3))
    );
    assert_eq!(
        request.scalar("SELECT prenom FROM Test WHERE id = @0", &[RowValues::Int(3)])?,
        Some(RowValues::Text("Grace".into()))
    );
    assert_eq!(
        request.scalar("SELECT prenom FROM Test WHERE id = @0", &[RowValues::Int(42)])?,
        None
    );

    request.execute("DELETE FROM Test", &[])?;
    // MAX over an empty table yields one NULL row.
    assert_eq!(request.scalar("SELECT MAX(id) FROM Test", &[])?, None);
    Ok(())
}

#[test]
fn positional_arguments_bind_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut request = open_request(&dir)?;

    let value = request.scalar(
        "SELECT @0 || '-' || @1 || '-' || @2",
        &[
            RowValues::Text("a".into()),
            RowValues::Text("b".into()),
            RowValues::Text("c".into()),
        ],
    )?;
    assert_eq!(value, Some(RowValues::Text("a-b-c".into())));

    // The same position may appear more than once.
    let doubled = request.scalar("SELECT @0 + @0", &[RowValues::Int(21)])?;
    assert_eq!(doubled, Some(RowValues::Int(42)));
    Ok(())
}

#[test]
fn named_arguments_ignore_declaration_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut request = open_request(&dir)?;

    let value = request.scalar_named(
        "SELECT @first || ' ' || @second",
        &[
            Placeholder::new("second", "world"),
            Placeholder::new("first", "hello"),
        ],
    )?;
    assert_eq!(value, Some(RowValues::Text("hello world".into())));
    Ok(())
}

#[test]
fn binding_mismatches_are_parameter_errors() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut request = open_request(&dir)?;

    let unknown = request.scalar_named("SELECT @a", &[
        Placeholder::new("a", 1),
        Placeholder::new("b", 2),
    ]);
    assert!(matches!(unknown, Err(SqlRequestError::ParameterError(_))));

    let unbound = request.scalar("SELECT @0 + @1", &[RowValues::Int(1)]);
    assert!(matches!(unbound, Err(SqlRequestError::ParameterError(_))));

    let duplicate = request.scalar_named("SELECT @a", &[
        Placeholder::new("a", 1),
        Placeholder::new("a", 2),
    ]);
    assert!(matches!(duplicate, Err(SqlRequestError::ParameterError(_))));

    let prefixed = request.execute_named("SELECT @a", &[Placeholder::new("@a", 1)]);
    assert!(matches!(prefixed, Err(SqlRequestError::ParameterError(_))));

    // The request is still usable afterwards.
    assert_eq!(request.scalar("SELECT 1", &[])?, Some(RowValues::Int(1)));
    Ok(())
}

#[test]
fn insert_read_update_delete_walkthrough() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut request = seeded(&dir)?;
    let inscription = NaiveDate::from_ymd_opt(3000, 12, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or("bad date")?;

    // Insert through a returning clause and read the new row back.
    let id = request.scalar_named(
        "INSERT INTO Test (inscription, prenom, nom) VALUES (@ins, @pre, @nom) RETURNING id",
        &[
            Placeholder::new("ins", inscription),
            Placeholder::new("pre", "Youpi"),
            Placeholder::new("nom", "Lavie"),
        ],
    )?;
    assert_eq!(id, Some(RowValues::Int(4)));

    let mut rows = Vec::new();
    request.read_rows(
        "SELECT prenom, nom, inscription FROM Test WHERE id = @0",
        |row| {
            rows.push((
                row.get_text(0)?.to_string(),
                row.get_text(1)?.to_string(),
                row.get_timestamp(2)?,
            ));
            Ok(())
        },
        &[RowValues::Int(4)],
    )?;
    assert_eq!(
        rows,
        vec![("Youpi".to_string(), "Lavie".to_string(), inscription)]
    );

    // Update the last row.
    let last = request.scalar("SELECT MAX(id) FROM Test", &[])?;
    assert_eq!(last, Some(RowValues::Int(4)));
    let changed = request.execute_named(
        "UPDATE Test SET nom=@nom, prenom=@prenom WHERE id=@id",
        &[
            Placeholder::new("id", 4),
            Placeholder::new("prenom", "MODIF"),
            Placeholder::new("nom", "MODIF"),
        ],
    )?;
    assert_eq!(changed, 1);
    assert_eq!(
        request.scalar_named(
            "SELECT prenom || nom FROM Test WHERE id=@intID",
            &[Placeholder::new("intID", 4)]
        )?,
        Some(RowValues::Text("MODIFMODIF".into()))
    );

    // Delete through a returning clause.
    let deleted = request.scalar("DELETE FROM Test WHERE id=@0 RETURNING id", &[RowValues::Int(4)])?;
    assert_eq!(deleted, Some(RowValues::Int(4)));
    let mut after_delete = 0;
    request.read_rows(
        "SELECT id FROM Test WHERE id=@0",
        |_| {
            after_delete += 1;
            Ok(())
        },
        &[RowValues::Int(4)],
    )?;
    assert_eq!(after_delete, 0);
    assert_eq!(
        request.scalar("SELECT COUNT(*) FROM Test", &[])?,
        Some(RowValues::Int(3))
    );
    request.close()?;
    Ok(())
}

#[test]
fn values_round_trip_through_the_driver() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut request = open_request(&dir)?;
    request.execute(
        "CREATE TABLE kinds (i INTEGER, f REAL, t TEXT, b INTEGER, n TEXT, x BLOB)",
        &[],
    )?;
    request.execute(
        "INSERT INTO kinds VALUES (@0, @1, @2, @3, @4, @5)",
        &[
            RowValues::Int(-7),
            RowValues::Float(2.5),
            RowValues::Text("été".into()),
            RowValues::Bool(true),
            RowValues::Null,
            RowValues::Blob(vec![0, 1, 255]),
        ],
    )?;

    request.read_rows(
        "SELECT i, f, t, b, n, x FROM kinds",
        |row| {
            assert_eq!(row.get_int(0)?, -7);
            assert!((row.get_float(1)? - 2.5).abs() < f64::EPSILON);
            assert_eq!(row.get_text(2)?, "été");
            assert!(row.get_bool(3)?);
            assert!(row.is_null(4)?);
            assert_eq!(row.get_blob(5)?, &[0u8, 1, 255]);
            assert!(matches!(
                row.get_int(2),
                Err(SqlRequestError::TypeMismatch { index: 2, .. })
            ));
            assert!(matches!(
                row.value(6),
                Err(SqlRequestError::ColumnIndexOutOfRange { index: 6, len: 6 })
            ));
            Ok(())
        },
        &[],
    )?;
    Ok(())
}
